use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, error, info, warn};

/// The `part` list requested from the `videos` endpoint.
const VIDEO_PARTS: &str = "contentDetails,statistics,snippet";

/// Matches the time portion of an ISO 8601 period, e.g. `PT1H5M3S`.
static DURATION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("Invalid duration regex"));

/// Resolved metadata for a single video, ready to go on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMeta {
  /// Already formatted as `M:SS` or `H:MM:SS`.
  pub duration: String,
  pub views: u64,
  /// ISO 8601 timestamp.
  pub published_at: String,
}

pub fn thumbnail_url(video_id: &str) -> String {
  format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

pub fn watch_url(video_id: &str) -> String {
  format!("https://www.youtube.com/watch?v={}&rel=0", video_id)
}

/// Format a timestamp the way browsers print `Date.toISOString()`:
/// `2024-03-01T09:30:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert an ISO 8601 period (`PT#H#M#S`) into `M:SS` or `H:MM:SS`.
/// Input that doesn't contain a `PT` period at all yields `0:00`.
pub fn parse_iso8601_duration(raw: &str) -> String {
  let Some(caps) = DURATION_RE.captures(raw) else {
    return "0:00".to_string();
  };
  let part = |idx: usize| -> u64 { caps.get(idx).and_then(|m| m.as_str().parse().ok()).unwrap_or(0) };
  let (hours, minutes, seconds) = (part(1), part(2), part(3));

  if hours > 0 { format!("{}:{:02}:{:02}", hours, minutes, seconds) } else { format!("{}:{:02}", minutes, seconds) }
}

/// Read the leading decimal digits of a provider count, so `"12abc"` is 12.
/// Anything without leading digits counts as 0.
fn parse_view_count(raw: &str) -> u64 {
  let trimmed = raw.trim_start();
  let end = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
  trimmed[..end].parse().unwrap_or(0)
}

// --- Provider response shape ---

#[derive(Debug, Deserialize)]
struct VideoListResponse {
  #[serde(default)]
  items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
  #[serde(default)]
  id: String,
  content_details: Option<ContentDetails>,
  statistics: Option<Statistics>,
  snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
  duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
  view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
  published_at: Option<String>,
}

impl VideoItem {
  fn into_meta(self, now: DateTime<Utc>) -> (String, VideoMeta) {
    let duration = parse_iso8601_duration(self.content_details.and_then(|c| c.duration).as_deref().unwrap_or(""));
    let views = self.statistics.and_then(|s| s.view_count).map_or(0, |v| parse_view_count(&v));
    let published_at = self.snippet.and_then(|s| s.published_at).unwrap_or_else(|| iso_timestamp(now));
    (self.id, VideoMeta { duration, views, published_at })
  }
}

// --- Client ---

/// Client for the YouTube Data API `videos` endpoint.
#[derive(Debug, Clone)]
pub struct YouTubeApi {
  client: Client,
  base_url: String,
  api_key: Option<String>,
}

impl YouTubeApi {
  pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
    Self { client, base_url: base_url.into(), api_key }
  }

  /// Build the batched `videos` request URL for `ids`.
  pub fn videos_url(&self, ids: &[String], key: &str) -> Result<Url> {
    let endpoint = format!("{}/videos", self.base_url.trim_end_matches('/'));
    let joined = ids.join(",");
    Url::parse_with_params(&endpoint, [("part", VIDEO_PARTS), ("id", joined.as_str()), ("key", key)])
      .with_context(|| format!("Invalid provider base URL: {}", self.base_url))
  }

  /// Resolve metadata for all `ids` with a single request.
  ///
  /// Never fails: any network, status or decoding problem is logged and
  /// reported as an empty map so callers fall through to the next source.
  /// Ids the provider doesn't return are simply absent from the map.
  pub async fn fetch_video_details(&self, ids: &[String]) -> HashMap<String, VideoMeta> {
    if ids.is_empty() {
      return HashMap::new();
    }
    let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
      warn!("youtube: no API key configured, skipping metadata request");
      return HashMap::new();
    };

    info!(count = ids.len(), "youtube: fetching video details");
    match self.request_details(ids, key).await {
      Ok(details) => {
        debug!(resolved = details.len(), requested = ids.len(), "youtube: video details received");
        details
      }
      Err(e) => {
        error!(err = %format!("{:#}", e), "youtube: failed to fetch video details");
        HashMap::new()
      }
    }
  }

  async fn request_details(&self, ids: &[String], key: &str) -> Result<HashMap<String, VideoMeta>> {
    let url = self.videos_url(ids, key)?;
    let response = self.client.get(url).send().await.context("YouTube API request failed")?;

    let status = response.status();
    if !status.is_success() {
      return Err(anyhow!("YouTube API error: {}", status.as_u16()));
    }

    let body: VideoListResponse = response.json().await.context("Malformed YouTube API response")?;
    let now = Utc::now();
    Ok(body.items.into_iter().filter(|item| !item.id.is_empty()).map(|item| item.into_meta(now)).collect())
  }
}

/// Secondary metadata source, tried when the API resolves nothing.
///
/// There is no alternate feed yet: the attempt is logged and nothing is
/// resolved, so every video falls back to placeholder values.
pub async fn fetch_from_feed(ids: &[String]) -> HashMap<String, VideoMeta> {
  info!(count = ids.len(), "youtube: feed fallback not implemented, using default values");
  HashMap::new()
}
