//! The curated tutorial roster, loaded from `roster.ron`.
//!
//! The built-in roster is embedded via `include_str!` so it's always available
//! with no runtime file I/O. A different roster can be read from disk with
//! [`Roster::from_file`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Closed classification tag on every video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Basics,
  Intermediate,
  Advanced,
}

impl Category {
  pub fn label(self) -> &'static str {
    match self {
      Category::Basics => "Basics",
      Category::Intermediate => "Intermediate",
      Category::Advanced => "Advanced",
    }
  }
}

/// A single hand-curated roster line.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
  pub video_id: String,
  pub title: String,
  pub category: Category,
}

/// Everything the catalog needs that isn't fetched: branding, record id
/// prefix, provider endpoint and the videos themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
  pub academy_name: String,
  pub tagline: String,
  pub id_prefix: String,
  pub api_base_url: String,
  pub videos: Vec<RosterEntry>,
}

static BUILTIN: LazyLock<Roster> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time and covered by tests.
  ron::from_str(include_str!("../roster.ron")).expect("roster.ron must be valid RON (embedded at compile time)")
});

impl Roster {
  /// Returns the roster compiled into the binary.
  pub fn builtin() -> &'static Roster {
    &BUILTIN
  }

  /// Read a roster from a RON file with the same shape as `roster.ron`.
  pub fn from_file(path: &Path) -> Result<Roster> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read roster file {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("Failed to parse roster file {}", path.display()))
  }

  /// Ordered external video ids, as sent to the metadata provider.
  pub fn video_ids(&self) -> Vec<String> {
    self.videos.iter().map(|v| v.video_id.clone()).collect()
  }
}
