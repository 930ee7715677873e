use chrono::DateTime;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};

use crate::app::App;
use crate::catalog::{Tab, VideoRecord};
use crate::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// `12345` → `12,345`.
pub fn format_views(views: u64) -> String {
  let digits = views.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// Calendar date part of an ISO 8601 timestamp, or the raw string if it doesn't parse.
pub fn format_date(published_at: &str) -> String {
  DateTime::parse_from_rfc3339(published_at)
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|_| published_at.to_string())
}

fn rounded_block<'a>(theme: &Theme, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
  let color = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(color))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, tabs_area, input_area, main_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_tabs(frame, app, tabs_area);
  render_input(frame, app, input_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(vec![
    Span::styled(format!(" ▶ {} ", app.academy_name), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(app.tagline.as_str(), Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(format!(" {} ", t.label()))).collect();
  let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
  let tabs = Tabs::new(titles)
    .select(selected)
    .style(Style::default().fg(theme.tab_fg).bg(theme.tab_bg))
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
    .divider(" ")
    .padding(" ", "");
  frame.render_widget(tabs, area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let input_block = rounded_block(theme, " Search videos ", true).padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.query, app.cursor_position);

  if cursor_col < app.query_scroll {
    app.query_scroll = cursor_col;
  } else if cursor_col >= app.query_scroll + inner_w {
    app.query_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .query
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.query_scroll)
    .take_while(|(start, _, _)| *start < app.query_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block), area);

  if inner_w == 0 {
    return;
  }
  let cursor_x = area.x + 2 + cursor_col.saturating_sub(app.query_scroll) as u16;
  frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  if app.loading {
    render_loading(frame, app, area);
    return;
  }
  if app.visible.is_empty() {
    render_empty(frame, app, area);
    return;
  }

  let [list_area, detail_area] =
    Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);
  render_list(frame, app, list_area);
  render_detail(frame, app, detail_area);
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let tick = (app.started_at.elapsed().as_millis() / 100) as usize % SPINNER.len();
  let text = vec![
    Line::from(""),
    Line::from(Span::styled(format!("{}  Loading videos…", SPINNER[tick]), Style::default().fg(theme.status))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(rounded_block(theme, "", false));
  frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let mut text = vec![Line::from("")];
  if let Some(err) = &app.load_error {
    text.push(Line::from(Span::styled(err.as_str(), Style::default().fg(theme.error))));
  }
  if let Some(state) = app.empty_state() {
    text.push(Line::from(Span::styled(state.message(), Style::default().fg(theme.muted))));
  }
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(rounded_block(theme, " Tutorials ", false));
  frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .visible
    .iter()
    .enumerate()
    .filter_map(|(i, &idx)| app.videos.get(idx).map(|video| (i, video)))
    .map(|(i, video)| {
      let is_selected = Some(i) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      // Reserve space for the duration + 2-char gap
      let right = video.duration.as_str();
      let right_w = right.chars().count();
      let title = truncate_str(&video.title, inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);

      let line = Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let title = format!(" {} — {} videos ", app.tab.label(), app.visible.len());
  let list = List::new(items)
    .block(rounded_block(theme, title, false))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn detail_lines<'a>(video: &'a VideoRecord, theme: &Theme) -> Vec<Line<'a>> {
  let field = |label: &'static str, value: String| {
    Line::from(vec![
      Span::styled(format!("{:<11}", label), Style::default().fg(theme.muted)),
      Span::styled(value, Style::default().fg(theme.fg)),
    ])
  };
  vec![
    Line::from(Span::styled(video.title.as_str(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(""),
    field("Section", video.category.label().to_string()),
    field("Duration", video.duration.clone()),
    field("Views", format_views(video.views)),
    field("Published", format_date(&video.published_at)),
    Line::from(""),
    Line::from(Span::styled(video.description.as_str(), Style::default().fg(theme.muted))),
    Line::from(""),
    Line::from(Span::styled(
      video.url.as_str(),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
  ]
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let block = rounded_block(theme, " Details ", false).padding(Padding::horizontal(1));
  match app.selected_video() {
    Some(video) => {
      let paragraph = Paragraph::new(detail_lines(video, theme)).wrap(Wrap { trim: true }).block(block);
      frame.render_widget(paragraph, area);
    }
    None => frame.render_widget(block, area),
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(err) = &app.load_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(theme.status))
  } else if app.loading {
    (" Loading…".to_string(), Style::default().fg(theme.status))
  } else {
    (format!(" {} of {} tutorials", app.visible.len(), app.videos.len()), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let mut keys: Vec<(&str, &str)> = vec![("Enter", "Open"), ("↑/↓", "Navigate"), ("Tab", "Section"), ("^t", "Theme")];
  keys.push(if app.query.is_empty() { ("Esc", "Quit") } else { ("Esc", "Clear") });

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::roster::{Category, Roster};
  use ratatui::{Terminal, backend::TestBackend};

  fn screen_text(app: &mut App) -> String {
    screen_text_sized(app, 100, 24)
  }

  fn screen_text_sized(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui(frame, app)).unwrap();
    terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
  }

  fn record(id: &str, title: &str, category: Category) -> VideoRecord {
    VideoRecord {
      id: id.to_string(),
      video_id: id.to_string(),
      title: title.to_string(),
      description: String::new(),
      thumbnail_url: String::new(),
      views: 12_345,
      published_at: "2024-02-03T04:05:06.000Z".to_string(),
      duration: "12:34".to_string(),
      url: String::new(),
      category,
    }
  }

  fn app_with(videos: Vec<VideoRecord>) -> App {
    let mut app = App::new(Config::default(), Roster::builtin(), Tab::All, String::new());
    app.apply_catalog(Ok(videos));
    app
  }

  // --- helpers ---

  #[test]
  fn truncate_str_appends_ellipsis() {
    assert_eq!(truncate_str("short", 10), "short");
    assert_eq!(truncate_str("a longer title", 6), "a lon…");
  }

  #[test]
  fn format_views_groups_thousands() {
    assert_eq!(format_views(0), "0");
    assert_eq!(format_views(999), "999");
    assert_eq!(format_views(1_000), "1,000");
    assert_eq!(format_views(50_999), "50,999");
    assert_eq!(format_views(1_234_567), "1,234,567");
  }

  #[test]
  fn format_date_takes_calendar_day() {
    assert_eq!(format_date("2024-02-03T04:05:06.000Z"), "2024-02-03");
    assert_eq!(format_date("2023-05-01T10:00:00Z"), "2023-05-01");
    assert_eq!(format_date("not a date"), "not a date");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("abc", 2), 2);
    assert_eq!(display_width("日本", 2), 4);
  }

  // --- rendering ---

  #[test]
  fn renders_loading_indicator() {
    let mut app = app_with(Vec::new());
    app.loading = true;
    assert!(screen_text(&mut app).contains("Loading videos"));
  }

  #[test]
  fn renders_list_and_details() {
    let mut app = app_with(vec![record("a", "Pehla Order Kaisay Lagayen?", Category::Basics)]);
    let text = screen_text(&mut app);
    assert!(text.contains("Pehla Order"));
    assert!(text.contains("12:34"));
    assert!(text.contains("12,345"));
    assert!(text.contains("2024-02-03"));
  }

  #[test]
  fn renders_empty_section_message() {
    let mut app = app_with(vec![record("a", "Basics only", Category::Basics)]);
    app.set_tab(Tab::Intermediate);
    assert!(screen_text(&mut app).contains("No tutorials available in this section"));
  }

  #[test]
  fn renders_load_error() {
    let mut app = App::new(Config::default(), Roster::builtin(), Tab::All, String::new());
    app.apply_catalog(Err(anyhow::anyhow!("bad roster")));
    assert!(screen_text(&mut app).contains("Failed to load videos"));
  }

  #[test]
  fn narrow_terminal_renders_without_panicking() {
    let mut app = app_with(Vec::new());
    screen_text_sized(&mut app, 4, 24);

    let mut app = app_with(vec![record("a", "Pehla Order", Category::Basics)]);
    app.query = "order".to_string();
    app.cursor_position = 5;
    app.recompute_visible();
    for width in 1..=6 {
      screen_text_sized(&mut app, width, 24);
    }
  }
}
