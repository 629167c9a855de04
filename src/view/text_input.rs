//! Single-line text input
//!
//! Holds the value and cursor of the search box and renders it as one line:
//! prompt, text (or placeholder) and a blinking block cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

/// Events that can be returned from text input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// Text was changed
    Changed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputState {
    pub value: String,
    /// Byte offset into `value`, always on a char boundary
    pub cursor: usize,
    pub prompt: String,
    pub placeholder: String,
    /// Maximum number of characters, 0 for no limit
    pub char_limit: usize,
    pub focused: bool,
    /// Blink phase of the cursor
    pub cursor_visible: bool,
}

impl TextInputState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            prompt: prompt.into(),
            placeholder: String::new(),
            char_limit: 0,
            focused: false,
            cursor_visible: true,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    /// Set the value, truncated to the char limit, with the cursor at the end
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = match self.char_limit {
            0 => value.to_string(),
            limit => value.chars().take(limit).collect(),
        };
        self.cursor = self.value.len();
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor_visible = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn toggle_blink(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }

    fn insert(&mut self, ch: char) -> bool {
        if self.char_limit > 0 && self.value.chars().count() >= self.char_limit {
            return false;
        }
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        true
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    fn backspace(&mut self) {
        let start = self.prev_boundary();
        self.value.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    fn delete(&mut self) {
        let end = self.next_boundary();
        self.value.replace_range(self.cursor..end, "");
    }

    fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    /// Handle a keyboard event for this text input
    ///
    /// # Returns
    /// * `Some(TextInputEvent)` if the event was consumed
    /// * `None` if the event was not relevant
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<TextInputEvent> {
        if !self.focused {
            return None;
        }

        match key.code {
            KeyCode::Backspace if self.cursor > 0 => {
                self.backspace();
                Some(TextInputEvent::Changed(self.value.clone()))
            }
            KeyCode::Delete if self.cursor < self.value.len() => {
                self.delete();
                Some(TextInputEvent::Changed(self.value.clone()))
            }
            KeyCode::Left => {
                self.move_left();
                None
            }
            KeyCode::Right => {
                self.move_right();
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                None
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if self.insert(c) {
                    Some(TextInputEvent::Changed(self.value.clone()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Render as a single line `width` columns wide. The text scrolls
    /// horizontally so the cursor stays in view.
    pub fn render_line(&self, theme: &Theme, width: usize) -> Line<'static> {
        let prompt_style = theme.fg(theme.green);
        let mut spans = vec![Span::styled(self.prompt.clone(), prompt_style)];
        let inner_width = width.saturating_sub(self.prompt.width());
        if inner_width == 0 {
            return Line::from(spans);
        }

        let show_cursor = self.focused && self.cursor_visible;
        let cursor_style = Style::default()
            .fg(theme.green)
            .add_modifier(Modifier::REVERSED);

        if self.value.is_empty() {
            let mut placeholder = self.placeholder.chars();
            if show_cursor {
                let first = placeholder.next().unwrap_or(' ');
                spans.push(Span::styled(first.to_string(), cursor_style));
            }
            let rest: String = placeholder.collect();
            spans.push(Span::styled(
                truncate_to_width(&rest, inner_width.saturating_sub(1)),
                theme.hint(),
            ));
            return Line::from(spans);
        }

        // Keep one column free for a cursor at the end of the text
        let before_width = self.value[..self.cursor].width();
        let scroll = (before_width + 1).saturating_sub(inner_width);

        let mut col = 0;
        let mut visible_before = String::new();
        let mut visible_after = String::new();
        let mut cursor_char = None;
        for (idx, ch) in self.value.char_indices() {
            let w = ch.width().unwrap_or(0);
            if col < scroll {
                col += w;
                continue;
            }
            if col + w > scroll + inner_width {
                break;
            }
            if idx < self.cursor {
                visible_before.push(ch);
            } else if idx == self.cursor && cursor_char.is_none() {
                cursor_char = Some(ch);
            } else {
                visible_after.push(ch);
            }
            col += w;
        }

        let text_style = theme.fg(theme.text);
        spans.push(Span::styled(visible_before, text_style));
        let under_cursor = cursor_char.unwrap_or(' ').to_string();
        if show_cursor {
            spans.push(Span::styled(under_cursor, cursor_style));
        } else if cursor_char.is_some() {
            spans.push(Span::styled(under_cursor, text_style));
        }
        spans.push(Span::styled(visible_after, text_style));
        Line::from(spans)
    }
}

fn truncate_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::theme::THEME;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn focused() -> TextInputState {
        let mut state = TextInputState::new("/ ").with_char_limit(100);
        state.focus();
        state
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_typing() {
        let mut state = focused();
        let result = state.handle_key(&key(KeyCode::Char('a')));
        assert_eq!(result, Some(TextInputEvent::Changed("a".to_string())));
        state.handle_key(&key(KeyCode::Char('b')));
        assert_eq!(state.value, "ab");
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut state = focused().with_value("abc");
        let result = state.handle_key(&key(KeyCode::Backspace));
        assert_eq!(result, Some(TextInputEvent::Changed("ab".to_string())));

        state.handle_key(&key(KeyCode::Home));
        assert_eq!(
            state.handle_key(&key(KeyCode::Delete)),
            Some(TextInputEvent::Changed("b".to_string()))
        );
        assert_eq!(state.handle_key(&key(KeyCode::Backspace)), None);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = focused().with_value("añb");
        state.handle_key(&key(KeyCode::Left));
        state.handle_key(&key(KeyCode::Backspace));
        assert_eq!(state.value, "ab");
        assert_eq!(state.cursor, 1);
        state.handle_key(&key(KeyCode::Right));
        assert_eq!(state.cursor, 2);
        state.handle_key(&key(KeyCode::Right));
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_char_limit() {
        let mut state = TextInputState::new("/ ").with_char_limit(3);
        state.focus();
        for c in "abcd".chars() {
            state.handle_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(state.value, "abc");
        assert_eq!(state.clone().with_value("wxyz").value, "wxy");
    }

    #[test]
    fn test_enter_and_esc_are_left_to_the_owner() {
        let mut state = focused().with_value("John");
        assert_eq!(state.handle_key(&key(KeyCode::Enter)), None);
        assert_eq!(state.handle_key(&key(KeyCode::Esc)), None);
        assert_eq!(state.value, "John");
        assert!(state.focused);
    }

    #[test]
    fn test_unfocused_ignores_keyboard() {
        let mut state = TextInputState::new("/ ");
        assert!(state.handle_key(&key(KeyCode::Char('a'))).is_none());
        assert!(state.value.is_empty());
    }

    #[test]
    fn test_control_chars_not_inserted() {
        let mut state = focused();
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(state.handle_key(&ctrl_a).is_none());
        assert!(state.value.is_empty());
    }

    #[test]
    fn test_render_placeholder_and_value() {
        let state = TextInputState::new("/ ").with_placeholder("Search articles...");
        assert_eq!(text(&state.render_line(&THEME, 40)), "/ Search articles...");

        let mut state = focused().with_value("radio");
        state.cursor_visible = false;
        assert_eq!(text(&state.render_line(&THEME, 40)), "/ radio");
        state.cursor_visible = true;
        assert_eq!(text(&state.render_line(&THEME, 40)), "/ radio ");
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let state = focused().with_value("abcdefghij");
        let line = text(&state.render_line(&THEME, 8));
        // 6 columns for text: the tail plus the cursor cell
        assert_eq!(line, "/ fghij ");
    }
}
