use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => app.should_quit = true,
      KeyCode::Char('t') => app.next_theme(),
      _ => {}
    }
    return;
  }

  match key.code {
    KeyCode::Enter => app.open_selected(),
    KeyCode::Tab => app.set_tab(app.tab.next()),
    KeyCode::BackTab => app.set_tab(app.tab.prev()),
    KeyCode::Down => app.select_next(),
    KeyCode::Up => app.select_prev(),
    KeyCode::Esc => {
      if app.query.is_empty() {
        app.should_quit = true;
      } else {
        app.query.clear();
        app.cursor_position = 0;
        app.query_scroll = 0;
        app.recompute_visible();
      }
    }
    _ => edit_query(app, key.code),
  }
}

/// Apply a text-editing key to the search query.
fn edit_query(app: &mut App, code: KeyCode) {
  let changed = match code {
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
      app.query.insert(byte_idx, c);
      app.cursor_position += 1;
      true
    }
    KeyCode::Backspace if app.cursor_position > 0 => {
      app.cursor_position -= 1;
      let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
      app.query.remove(byte_idx);
      true
    }
    KeyCode::Delete if app.cursor_position < app.query.chars().count() => {
      let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
      app.query.remove(byte_idx);
      true
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
      false
    }
    KeyCode::Right => {
      if app.cursor_position < app.query.chars().count() {
        app.cursor_position += 1;
      }
      false
    }
    KeyCode::Home => {
      app.cursor_position = 0;
      false
    }
    KeyCode::End => {
      app.cursor_position = app.query.chars().count();
      false
    }
    _ => false,
  };

  if changed {
    app.info_message = None;
    app.recompute_visible();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Tab, VideoRecord};
  use crate::config::Config;
  use crate::roster::{Category, Roster};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn record(id: &str, title: &str, category: Category) -> VideoRecord {
    VideoRecord {
      id: id.to_string(),
      video_id: id.to_string(),
      title: title.to_string(),
      description: String::new(),
      thumbnail_url: String::new(),
      views: 2_000,
      published_at: String::new(),
      duration: "7:10".to_string(),
      url: String::new(),
      category,
    }
  }

  fn loaded_app() -> App {
    let mut app = App::new(Config::default(), Roster::builtin(), Tab::All, String::new());
    app.apply_catalog(Ok(vec![
      record("a", "First Order", Category::Basics),
      record("b", "Returns", Category::Intermediate),
      record("c", "Ads", Category::Advanced),
    ]));
    app
  }

  fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      handle_key_event(app, key(KeyCode::Char(c)));
    }
  }

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  // --- key handling ---

  #[test]
  fn typing_filters_immediately() {
    let mut app = loaded_app();
    type_text(&mut app, "ord");
    assert_eq!(app.query, "ord");
    assert_eq!(app.cursor_position, 3);
    assert_eq!(app.visible, [0]);
  }

  #[test]
  fn backspace_and_delete_edit_at_cursor() {
    let mut app = loaded_app();
    type_text(&mut app, "adsx");
    handle_key_event(&mut app, key(KeyCode::Backspace));
    assert_eq!(app.query, "ads");
    assert_eq!(app.visible, [2]);

    handle_key_event(&mut app, key(KeyCode::Home));
    handle_key_event(&mut app, key(KeyCode::Delete));
    assert_eq!(app.query, "ds");
    assert_eq!(app.cursor_position, 0);
  }

  #[test]
  fn tab_keys_cycle_categories() {
    let mut app = loaded_app();
    handle_key_event(&mut app, key(KeyCode::Tab));
    assert_eq!(app.tab, Tab::Basics);
    assert_eq!(app.visible, [0]);
    handle_key_event(&mut app, key(KeyCode::BackTab));
    handle_key_event(&mut app, key(KeyCode::BackTab));
    assert_eq!(app.tab, Tab::Advanced);
    assert_eq!(app.visible, [2]);
  }

  #[test]
  fn arrows_move_selection() {
    let mut app = loaded_app();
    handle_key_event(&mut app, key(KeyCode::Down));
    assert_eq!(app.list_state.selected(), Some(1));
    handle_key_event(&mut app, key(KeyCode::Up));
    handle_key_event(&mut app, key(KeyCode::Up));
    assert_eq!(app.list_state.selected(), Some(2));
  }

  #[test]
  fn esc_clears_query_then_quits() {
    let mut app = loaded_app();
    type_text(&mut app, "zzz");
    assert!(app.visible.is_empty());
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert!(app.query.is_empty());
    assert_eq!(app.visible.len(), 3);
    assert!(!app.should_quit);
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert!(app.should_quit);
  }

  #[test]
  fn ctrl_c_quits() {
    let mut app = loaded_app();
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
    assert!(app.query.is_empty());
  }
}
