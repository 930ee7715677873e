//! Two-stage view filter: category tab first, then free-text title search.

use crate::catalog::{Tab, VideoRecord, category_indices, filter_by_category};

/// Why the visible list is empty, when that deserves a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
  /// A search is active and nothing in the tab matches it.
  NoMatches(String),
  /// No search, and the selected category has no videos.
  EmptySection,
}

impl EmptyState {
  pub fn message(&self) -> String {
    match self {
      EmptyState::NoMatches(query) => format!("No tutorials found matching \"{}\"", query),
      EmptyState::EmptySection => "No tutorials available in this section".to_string(),
    }
  }
}

/// Case-insensitive substring match against the title only.
/// A query that is blank after trimming matches everything.
pub fn matches_query(record: &VideoRecord, query: &str) -> bool {
  if query.trim().is_empty() {
    return true;
  }
  record.title.to_lowercase().contains(&query.to_lowercase())
}

/// Indices into `records` that are visible for `tab` and `query`, in order.
pub fn visible_indices(records: &[VideoRecord], tab: Tab, query: &str) -> Vec<usize> {
  category_indices(records, tab).into_iter().filter(|&i| matches_query(&records[i], query)).collect()
}

/// The visible records themselves, for callers that don't track selection.
pub fn visible<'a>(records: &'a [VideoRecord], tab: Tab, query: &str) -> Vec<&'a VideoRecord> {
  filter_by_category(records, tab).into_iter().filter(|r| matches_query(r, query)).collect()
}

/// Pick the empty-state message for a list with `visible_len` entries.
pub fn empty_state(visible_len: usize, tab: Tab, query: &str) -> Option<EmptyState> {
  if visible_len > 0 {
    return None;
  }
  if !query.is_empty() {
    Some(EmptyState::NoMatches(query.to_string()))
  } else if tab != Tab::All {
    Some(EmptyState::EmptySection)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::roster::Category;

  fn record(id: &str, title: &str, category: Category) -> VideoRecord {
    VideoRecord {
      id: id.to_string(),
      video_id: id.to_string(),
      title: title.to_string(),
      description: format!("Learn about {} order", title),
      thumbnail_url: String::new(),
      views: 1_000,
      published_at: String::new(),
      duration: "5:00".to_string(),
      url: String::new(),
      category,
    }
  }

  fn sample() -> Vec<VideoRecord> {
    vec![
      record("0", "Welcome | Create Account, Share & Order Products", Category::Basics),
      record("1", "Pehla Order Kaisay Lagayen?", Category::Basics),
      record("2", "Order Delivery Ki Reattempt", Category::Intermediate),
      record("3", "Return a Product", Category::Intermediate),
      record("4", "Find Sales & Offers", Category::Advanced),
    ]
  }

  // --- matches_query ---

  #[test]
  fn blank_query_matches_all() {
    let r = record("0", "Anything", Category::Basics);
    assert!(matches_query(&r, ""));
    assert!(matches_query(&r, "   "));
  }

  #[test]
  fn query_is_case_insensitive() {
    let r = record("0", "Way To View ORDER Tracking", Category::Basics);
    assert!(matches_query(&r, "order"));
    assert!(matches_query(&r, "Tracking"));
    assert!(!matches_query(&r, "refund"));
  }

  #[test]
  fn query_ignores_description() {
    let r = record("0", "Return a Product", Category::Basics);
    assert!(r.description.contains("order"));
    assert!(!matches_query(&r, "order"));
  }

  // --- visible ---

  #[test]
  fn search_across_all_tabs() {
    let records = sample();
    assert_eq!(visible_indices(&records, Tab::All, "order"), [0, 1, 2]);
    assert_eq!(visible_indices(&records, Tab::All, "ORDER"), [0, 1, 2]);
  }

  #[test]
  fn search_restricted_to_tab() {
    let records = sample();
    assert_eq!(visible_indices(&records, Tab::Intermediate, "order"), [2]);
    assert!(visible_indices(&records, Tab::Advanced, "order").is_empty());
  }

  #[test]
  fn no_query_is_category_filter() {
    let records = sample();
    assert_eq!(visible_indices(&records, Tab::Basics, ""), [0, 1]);
    assert_eq!(visible_indices(&records, Tab::All, "  ").len(), records.len());
  }

  #[test]
  fn visible_matches_indices() {
    let records = sample();
    let ids: Vec<&str> = visible(&records, Tab::All, "order").iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["0", "1", "2"]);
  }

  #[test]
  fn indices_and_records_agree_for_every_tab() {
    let records = sample();
    for tab in Tab::ALL {
      for query in ["", "order", "product", "zzz"] {
        let from_indices: Vec<&str> =
          visible_indices(&records, tab, query).into_iter().map(|i| records[i].id.as_str()).collect();
        let from_records: Vec<&str> = visible(&records, tab, query).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(from_indices, from_records, "tab {:?} query {:?}", tab, query);
      }
    }
  }

  // --- empty_state ---

  #[test]
  fn empty_section_without_query() {
    assert_eq!(empty_state(0, Tab::Intermediate, ""), Some(EmptyState::EmptySection));
    assert_eq!(EmptyState::EmptySection.message(), "No tutorials available in this section");
  }

  #[test]
  fn no_matches_with_query() {
    let state = empty_state(0, Tab::Intermediate, "xyz");
    assert_eq!(state, Some(EmptyState::NoMatches("xyz".to_string())));
    assert_eq!(state.unwrap().message(), "No tutorials found matching \"xyz\"");
  }

  #[test]
  fn no_message_when_results_or_all_tab() {
    assert_eq!(empty_state(3, Tab::Basics, "order"), None);
    assert_eq!(empty_state(0, Tab::All, ""), None);
  }
}
