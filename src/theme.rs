//! Color themes for the TUI, cycled with Ctrl+T.

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
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "ink",
    bg: Color::Rgb(16, 18, 24),
    fg: Color::Rgb(214, 219, 230),
    accent: Color::Rgb(255, 121, 121),
    muted: Color::Rgb(110, 118, 134),
    border: Color::Rgb(56, 62, 76),
    highlight_fg: Color::Rgb(16, 18, 24),
    highlight_bg: Color::Rgb(255, 121, 121),
    stripe_bg: Color::Rgb(22, 25, 33),
    status: Color::Rgb(139, 199, 156),
    error: Color::Rgb(237, 135, 150),
    key_fg: Color::Rgb(16, 18, 24),
    key_bg: Color::Rgb(110, 118, 134),
  },
  Theme {
    name: "paper",
    bg: Color::Rgb(246, 247, 251),
    fg: Color::Rgb(31, 36, 48),
    accent: Color::Rgb(186, 54, 54),
    muted: Color::Rgb(86, 97, 118),
    border: Color::Rgb(196, 202, 216),
    highlight_fg: Color::Rgb(246, 247, 251),
    highlight_bg: Color::Rgb(186, 54, 54),
    stripe_bg: Color::Rgb(238, 241, 247),
    status: Color::Rgb(34, 112, 64),
    error: Color::Rgb(166, 48, 48),
    key_fg: Color::Rgb(246, 247, 251),
    key_bg: Color::Rgb(86, 97, 118),
  },
  Theme {
    name: "deep",
    bg: Color::Rgb(13, 23, 33),
    fg: Color::Rgb(205, 214, 224),
    accent: Color::Rgb(95, 175, 255),
    muted: Color::Rgb(96, 110, 128),
    border: Color::Rgb(42, 58, 76),
    highlight_fg: Color::Rgb(13, 23, 33),
    highlight_bg: Color::Rgb(95, 175, 255),
    stripe_bg: Color::Rgb(18, 30, 42),
    status: Color::Rgb(120, 190, 170),
    error: Color::Rgb(240, 125, 125),
    key_fg: Color::Rgb(13, 23, 33),
    key_bg: Color::Rgb(96, 110, 128),
  },
];
