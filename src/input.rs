use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode, FilterField};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
    app.export_csv();
    return;
  }

  match app.mode {
    AppMode::Query => handle_query_key(app, key),
    AppMode::Filters => handle_filters_key(app, key),
    AppMode::Results => handle_results_key(app, key),
  }
}

fn handle_query_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Tab => {
      app.mode = AppMode::Filters;
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.input.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else if !app.rows.is_empty() {
        app.mode = AppMode::Results;
      } else {
        app.should_quit = true;
      }
    }
    KeyCode::Down => {
      if !app.rows.is_empty() {
        app.mode = AppMode::Results;
      }
    }
    _ => {}
  }
}

fn handle_filters_key(app: &mut App, key: event::KeyEvent) {
  let field = FilterField::ALL[app.form.selected];

  // Date rows take typed input; everything else cycles in place.
  if field.is_date() {
    match key.code {
      KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
        if let Some(buf) = app.form.date_buffer_mut()
          && buf.chars().count() < 10
        {
          buf.push(c);
        }
        return;
      }
      KeyCode::Backspace => {
        if let Some(buf) = app.form.date_buffer_mut() {
          buf.pop();
        }
        return;
      }
      _ => {}
    }
  }

  match key.code {
    KeyCode::Up | KeyCode::Char('k') => {
      let len = FilterField::ALL.len();
      app.form.selected = if app.form.selected == 0 { len - 1 } else { app.form.selected - 1 };
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.form.selected = (app.form.selected + 1) % FilterField::ALL.len();
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.form.adjust(field, false);
    }
    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
      app.form.adjust(field, true);
    }
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Esc | KeyCode::Tab => {
      app.mode = AppMode::Query;
    }
    _ => {}
  }
}

fn handle_results_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter | KeyCode::Char('o') => {
      app.open_selected();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.select_next();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.select_prev();
    }
    KeyCode::Char('s') => {
      app.cycle_sort();
    }
    KeyCode::Char('r') => {
      app.toggle_sort_direction();
    }
    KeyCode::Char('e') => {
      app.export_csv();
    }
    KeyCode::Tab => {
      app.mode = AppMode::Filters;
    }
    KeyCode::Esc => {
      app.mode = AppMode::Query;
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

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
    assert_eq!(char_to_byte_index(s, 0), 0); // 'a'
    assert_eq!(char_to_byte_index(s, 1), 1); // 'é' starts at byte 1
    assert_eq!(char_to_byte_index(s, 2), 3); // '日' starts at byte 3
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }
}
