use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::roster::{Category, Roster};
use crate::youtube::{VideoMeta, YouTubeApi, fetch_from_feed, iso_timestamp, thumbnail_url, watch_url};

/// Synthesized publish dates fall within this many days before now.
const FALLBACK_MAX_AGE_DAYS: i64 = 365;

/// A fully resolved catalog entry. Built once per load and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
  pub id: String,
  pub video_id: String,
  pub title: String,
  pub description: String,
  pub thumbnail_url: String,
  pub views: u64,
  pub published_at: String,
  pub duration: String,
  pub url: String,
  pub category: Category,
}

/// Category tab. `All` disables category filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Tab {
  #[default]
  All,
  Basics,
  Intermediate,
  Advanced,
}

impl Tab {
  pub const ALL: [Tab; 4] = [Tab::All, Tab::Basics, Tab::Intermediate, Tab::Advanced];

  pub fn label(self) -> &'static str {
    match self {
      Tab::All => "All",
      Tab::Basics => "Basics",
      Tab::Intermediate => "Intermediate",
      Tab::Advanced => "Advanced",
    }
  }

  /// The category this tab selects, or `None` for `All`.
  pub fn category(self) -> Option<Category> {
    match self {
      Tab::All => None,
      Tab::Basics => Some(Category::Basics),
      Tab::Intermediate => Some(Category::Intermediate),
      Tab::Advanced => Some(Category::Advanced),
    }
  }

  pub fn next(self) -> Tab {
    let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Tab::ALL[(idx + 1) % Tab::ALL.len()]
  }

  pub fn prev(self) -> Tab {
    let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
  }
}

/// Records in `tab`, in their original order.
pub fn filter_by_category(records: &[VideoRecord], tab: Tab) -> Vec<&VideoRecord> {
  category_indices(records, tab).into_iter().map(|i| &records[i]).collect()
}

/// Positions in `records` of the entries in `tab`, ascending.
pub fn category_indices(records: &[VideoRecord], tab: Tab) -> Vec<usize> {
  records
    .iter()
    .enumerate()
    .filter(|(_, r)| tab.category().is_none_or(|c| r.category == c))
    .map(|(i, _)| i)
    .collect()
}

/// Placeholder metadata for a video the provider couldn't resolve.
///
/// Duration is 5:00–19:59, views 1,000–50,999 and the publish date lies
/// within the year before `now`.
pub fn synthesize_meta<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> VideoMeta {
  let minutes = rng.random_range(5..=19u32);
  let seconds = rng.random_range(0..60u32);
  let views = rng.random_range(1_000..51_000u64);
  let age_ms = rng.random_range(0..FALLBACK_MAX_AGE_DAYS * 24 * 60 * 60 * 1000);
  let published = now - TimeDelta::milliseconds(age_ms);

  VideoMeta { duration: format!("{}:{:02}", minutes, seconds), views, published_at: iso_timestamp(published) }
}

/// Everything the catalog source needs from the outside world.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
  pub roster: Roster,
  pub api_key: Option<String>,
}

/// Turns the roster into a list of [`VideoRecord`]s, resolving live metadata
/// where possible and synthesizing it where not.
pub struct CatalogSource<R: Rng> {
  roster: Roster,
  api: YouTubeApi,
  rng: R,
}

impl<R: Rng> CatalogSource<R> {
  pub fn new(config: CatalogConfig, client: Client, rng: R) -> Self {
    let api = YouTubeApi::new(client, config.roster.api_base_url.clone(), config.api_key);
    Self { roster: config.roster, api, rng }
  }

  pub fn roster(&self) -> &Roster {
    &self.roster
  }

  /// Load the catalog. Network problems never surface here; only a roster
  /// that can't be turned into records is an error.
  pub async fn load(&mut self) -> Result<Vec<VideoRecord>> {
    self.load_at(Utc::now()).await
  }

  /// [`load`](Self::load) with an explicit clock for synthesized dates.
  pub async fn load_at(&mut self, now: DateTime<Utc>) -> Result<Vec<VideoRecord>> {
    self.validate_roster()?;

    let ids = self.roster.video_ids();
    info!(count = ids.len(), "catalog: resolving video metadata");

    let mut details = self.api.fetch_video_details(&ids).await;
    if details.is_empty() {
      info!("catalog: metadata API resolved nothing, trying feed fallback");
      details = fetch_from_feed(&ids).await;
    }

    let records = self.build_records(&details, now);
    info!(count = records.len(), resolved = details.len(), "catalog: loaded videos");
    Ok(records)
  }

  fn validate_roster(&self) -> Result<()> {
    for (index, entry) in self.roster.videos.iter().enumerate() {
      if entry.video_id.trim().is_empty() {
        return Err(anyhow!("Roster entry {} has an empty video id", index));
      }
      if entry.title.trim().is_empty() {
        return Err(anyhow!("Roster entry {} ({}) has an empty title", index, entry.video_id));
      }
    }
    Ok(())
  }

  fn build_records(&mut self, details: &HashMap<String, VideoMeta>, now: DateTime<Utc>) -> Vec<VideoRecord> {
    let mut records = Vec::with_capacity(self.roster.videos.len());
    for (index, entry) in self.roster.videos.iter().enumerate() {
      let meta = match details.get(&entry.video_id) {
        Some(meta) => meta.clone(),
        None => {
          debug!(video_id = %entry.video_id, "catalog: synthesizing placeholder metadata");
          synthesize_meta(&mut self.rng, now)
        }
      };
      records.push(VideoRecord {
        id: format!("{}-{}", self.roster.id_prefix, index),
        video_id: entry.video_id.clone(),
        title: entry.title.clone(),
        description: format!(
          "Learn about {} with this comprehensive tutorial from {}.",
          entry.title.to_lowercase(),
          self.roster.academy_name
        ),
        thumbnail_url: thumbnail_url(&entry.video_id),
        views: meta.views,
        published_at: meta.published_at,
        duration: meta.duration,
        url: watch_url(&entry.video_id),
        category: entry.category,
      });
    }
    records
  }
}
