use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub tab_fg: Color,
  pub tab_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Meadow",
    bg: Color::Rgb(240, 253, 244),
    fg: Color::Rgb(17, 24, 39),
    accent: Color::Rgb(22, 163, 74),
    muted: Color::Rgb(107, 114, 128),
    border: Color::Rgb(187, 247, 208),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(37, 99, 235),
    stripe_bg: Color::Rgb(236, 253, 245),
    tab_fg: Color::Rgb(21, 128, 61),
    tab_bg: Color::Rgb(220, 252, 231),
    status: Color::Rgb(37, 99, 235),
    error: Color::Rgb(185, 28, 28),
    key_fg: Color::Rgb(255, 255, 255),
    key_bg: Color::Rgb(22, 163, 74),
  },
  Theme {
    name: "Night",
    bg: Color::Rgb(15, 17, 21),
    fg: Color::Rgb(240, 242, 245),
    accent: Color::Rgb(99, 140, 255),
    muted: Color::Rgb(130, 138, 150),
    border: Color::Rgb(45, 50, 60),
    highlight_fg: Color::Rgb(15, 17, 21),
    highlight_bg: Color::Rgb(99, 140, 255),
    stripe_bg: Color::Rgb(24, 27, 33),
    tab_fg: Color::Rgb(130, 138, 150),
    tab_bg: Color::Rgb(32, 36, 44),
    status: Color::Rgb(134, 239, 172),
    error: Color::Rgb(248, 113, 113),
    key_fg: Color::Rgb(15, 17, 21),
    key_bg: Color::Rgb(130, 138, 150),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::Green,
    muted: Color::DarkGray,
    border: Color::DarkGray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Green,
    stripe_bg: Color::Reset,
    tab_fg: Color::Gray,
    tab_bg: Color::Reset,
    status: Color::Cyan,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
  },
];

/// Index of the theme called `name`, or the first theme.
pub fn index_of(name: &str) -> usize {
  THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or(0)
}
