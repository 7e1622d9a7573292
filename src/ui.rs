use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Cell, Padding, Paragraph, Row, Table},
};

use crate::app::{FilterField, SortKey};
use crate::theme::Theme;
use crate::{App, AppMode};

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

/// Table columns in display order, paired with the sort key they carry.
const COLUMNS: [(&str, SortKey); 8] = [
  ("Title", SortKey::Title),
  ("Channel", SortKey::Channel),
  ("Type", SortKey::Kind),
  ("Views", SortKey::Views),
  ("Likes", SortKey::Likes),
  ("Comments", SortKey::Comments),
  ("Duration", SortKey::Duration),
  ("Published", SortKey::Published),
];

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ⌕ scout ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  if app.mode == AppMode::Filters {
    render_filters(frame, app, area);
  } else if app.mode == AppMode::Results && !app.rows.is_empty() {
    render_results(frame, app, area);
  } else {
    render_welcome(frame, app.theme(), area);
  }
}

fn render_welcome(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("⌕  Welcome to scout", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Search YouTube. Filter. Export.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Type a query below and press Enter.", Style::default().fg(theme.muted))),
    Line::from(Span::styled("Tab opens the filter panel.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();

  let mut lines = vec![Line::from("")];
  for (i, field) in FilterField::ALL.iter().enumerate() {
    let selected = i == app.form.selected;
    let marker = if selected { "▶ " } else { "  " };
    let label = format!("{}{:<18}", marker, field.label());
    let value = app.form.field_value(*field);
    let (label_style, value_style) = if selected {
      (
        Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD),
        Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg),
      )
    } else {
      (Style::default().fg(theme.muted), Style::default().fg(theme.fg))
    };
    lines.push(Line::from(vec![Span::styled(label, label_style), Span::styled(value, value_style)]));
    lines.push(Line::from(""));
  }
  lines.push(Line::from(Span::styled(
    "h/l cycle · type dates as YYYY-MM-DD · Enter searches",
    Style::default().fg(theme.muted),
  )));

  let paragraph = Paragraph::new(lines).block(
    Block::bordered()
      .title(" Filters ")
      .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border))
      .padding(Padding::horizontal(2)),
  );
  frame.render_widget(paragraph, area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let [table_area, detail_area] =
    Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);

  render_table(frame, app, table_area);
  render_detail(frame, app, detail_area);
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  let header_cells: Vec<Cell> = COLUMNS
    .iter()
    .map(|(name, key)| {
      if *key == app.sort_key {
        let arrow = if app.sort_desc { "▼" } else { "▲" };
        Cell::from(format!("{} {}", name, arrow))
          .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
      } else {
        Cell::from(*name).style(Style::default().fg(theme.muted))
      }
    })
    .collect();
  let header = Row::new(header_cells).height(1);

  let rows: Vec<Row> = app
    .rows
    .iter()
    .enumerate()
    .map(|(i, r)| {
      let bg = if i % 2 == 1 { theme.stripe_bg } else { theme.bg };
      Row::new(vec![
        Cell::from(r.title.clone()),
        Cell::from(r.channel.clone()),
        Cell::from(r.category.label()),
        Cell::from(r.views_display()),
        Cell::from(r.likes_display()),
        Cell::from(r.comments_display()),
        Cell::from(r.duration_display()),
        Cell::from(r.published.clone()),
      ])
      .style(Style::default().fg(theme.fg).bg(bg))
    })
    .collect();

  let widths = [
    Constraint::Min(24),
    Constraint::Length(16),
    Constraint::Length(8),
    Constraint::Length(12),
    Constraint::Length(10),
    Constraint::Length(9),
    Constraint::Length(9),
    Constraint::Length(10),
  ];

  let title = format!(" Results — {} row(s) ", app.rows.len());
  let table = Table::new(rows, widths)
    .header(header)
    .block(
      Block::bordered()
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.border)),
    )
    .column_spacing(1)
    .highlight_symbol("▶ ")
    .row_highlight_style(
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD),
    );

  frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let block = Block::bordered()
    .title(" Selected ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  let Some(row) = app.selected_row() else {
    frame.render_widget(block, area);
    return;
  };

  let inner_w = area.width.saturating_sub(4) as usize;
  let field = |label: &str, value: String| {
    let value_w = inner_w.saturating_sub(label.len());
    Line::from(vec![
      Span::styled(label.to_string(), Style::default().fg(theme.muted)),
      Span::styled(truncate_str(&value, value_w), Style::default().fg(theme.fg)),
    ])
  };

  let mut lines = vec![
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&row.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    field("Channel    ", row.channel.clone()),
    field("Type       ", row.category.label().to_string()),
    field("Views      ", row.views_display()),
    field("Likes      ", row.likes_display()),
    field("Comments   ", row.comments_display()),
    field("Duration   ", row.duration_display()),
    field("Published  ", row.published.clone()),
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&row.url, inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
  ];
  if !row.thumb.is_empty() {
    lines.push(Line::from(Span::styled(truncate_str(&row.thumb, inner_w), Style::default().fg(theme.muted))));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled("Enter opens in browser · e exports CSV", Style::default().fg(theme.muted))));

  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else {
    match &app.summary {
      Some(summary) => (format!(" {}", summary), Style::default().fg(theme.status)),
      None => (" Ready".to_string(), Style::default().fg(theme.muted)),
    }
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Query { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search YouTube ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if app.mode == AppMode::Query {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let has_rows = !app.rows.is_empty();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Query => {
      let mut k = vec![("Enter", "Search"), ("Tab", "Filters"), ("^t", "Theme")];
      if has_rows {
        k.push(("↓", "Results"));
        k.push(("Esc", "Results"));
      } else {
        k.push(("Esc", "Quit"));
      }
      k
    }
    AppMode::Filters => {
      vec![("j/k", "Move"), ("h/l", "Adjust"), ("Enter", "Search"), ("Esc", "Back")]
    }
    AppMode::Results => {
      vec![
        ("Enter", "Open"),
        ("j/k", "Navigate"),
        ("s", "Sort"),
        ("r", "Reverse"),
        ("e", "Export"),
        ("Esc", "Back"),
      ]
    }
  };

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
