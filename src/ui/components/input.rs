use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text editor for one form field.
///
/// Only handles editing keys; Enter, Esc and Tab are form-level
/// concerns, so `handle_key` reports whether the key was consumed and
/// leaves them to the caller.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Input pre-filled with an existing value, cursor at the end.
  pub fn with_value(value: impl Into<String>) -> Self {
    let buffer = value.into();
    let cursor = buffer.chars().count();
    Self { buffer, cursor }
  }

  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Cursor position in characters, for rendering.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  fn byte_index(&self) -> usize {
    self
      .buffer
      .char_indices()
      .nth(self.cursor)
      .map_or(self.buffer.len(), |(i, _)| i)
  }

  /// Handle an editing key. Returns false for keys this input does not
  /// own so the enclosing form can act on them.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let idx = self.byte_index();
          self.buffer.remove(idx);
        }
        true
      }
      KeyCode::Delete => {
        if self.cursor < self.buffer.chars().count() {
          let idx = self.byte_index();
          self.buffer.remove(idx);
        }
        true
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        true
      }
      KeyCode::Right => {
        if self.cursor < self.buffer.chars().count() {
          self.cursor += 1;
        }
        true
      }
      KeyCode::Home => {
        self.cursor = 0;
        true
      }
      KeyCode::End => {
        self.cursor = self.buffer.chars().count();
        true
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Clear everything before the cursor
        let idx = self.byte_index();
        self.buffer = self.buffer[idx..].to_string();
        self.cursor = 0;
        true
      }
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        let idx = self.byte_index();
        self.buffer.insert(idx, c);
        self.cursor += 1;
        true
      }
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(input: &mut TextInput, s: &str) {
    for c in s.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_typing_appends() {
    let mut input = TextInput::new();
    type_str(&mut input, "R&D");
    assert_eq!(input.value(), "R&D");
  }

  #[test]
  fn test_with_value_places_cursor_at_end() {
    let mut input = TextInput::with_value("Ada");
    assert_eq!(input.cursor(), 3);
    type_str(&mut input, "!");
    assert_eq!(input.value(), "Ada!");
  }

  #[test]
  fn test_backspace_and_delete() {
    let mut input = TextInput::with_value("abc");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "ab");

    input.handle_key(key(KeyCode::Home));
    input.handle_key(key(KeyCode::Delete));
    assert_eq!(input.value(), "b");
  }

  #[test]
  fn test_insert_at_cursor() {
    let mut input = TextInput::with_value("ac");
    input.handle_key(key(KeyCode::Left));
    type_str(&mut input, "b");
    assert_eq!(input.value(), "abc");
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = TextInput::with_value("Zoë");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "Zo");
  }

  #[test]
  fn test_ctrl_u_clears_before_cursor() {
    let mut input = TextInput::with_value("hello world");
    for _ in 0..5 {
      input.handle_key(key(KeyCode::Left));
    }
    input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    assert_eq!(input.value(), "world");
  }

  #[test]
  fn test_unowned_keys_are_not_consumed() {
    let mut input = TextInput::new();
    assert!(!input.handle_key(key(KeyCode::Enter)));
    assert!(!input.handle_key(key(KeyCode::Esc)));
    assert!(!input.handle_key(key(KeyCode::Tab)));
  }
}
