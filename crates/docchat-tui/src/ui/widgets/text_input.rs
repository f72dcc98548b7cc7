//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Renders a [`TextInputState`] with a prompt and a cursor.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    state: &'a TextInputState,
    enabled: bool,
    placeholder: Option<&'a str>,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Set whether the input accepts submissions. Disabled inputs hide the cursor.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the prompt prefix.
    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }
}

impl Widget for TextInput<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let text_style = if self.enabled {
            Styles::default()
        } else {
            Styles::dim()
        };
        let mut spans = vec![Span::styled(self.prompt, Styles::active())];

        if self.state.is_empty() {
            if self.enabled {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let (before, after) = self.state.split_at_cursor();
        let cursor = if self.enabled {
            if after.is_empty() {
                "_"
            } else {
                "|"
            }
        } else {
            ""
        };

        // Keep the cursor visible by scrolling long input horizontally.
        let budget = usize::from(area.width)
            .saturating_sub(self.prompt.chars().count() + 1)
            .max(1);
        let before_len = before.chars().count();
        let skip = before_len.saturating_sub(budget);
        let before: String = before.chars().skip(skip).collect();

        spans.push(Span::styled(before, text_style));
        spans.push(Span::styled(cursor, Styles::active()));
        spans.push(Span::styled(after.to_string(), text_style));
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Content and cursor of a text input, plus submitted-entry history.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// cleanly.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history; `None` means editing fresh input.
    history_index: Option<usize>,
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content, keeping history.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.history_index = None;
        self.saved_input.clear();
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.byte_offset(self.cursor))
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content, recording it in history when not blank.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        if !content.trim().is_empty() && self.history.last() != Some(&content) {
            self.history.push(content.clone());
        }
        self.clear();
        content
    }

    /// Step back to an older history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(_) => return,
        };
        self.history_index = Some(next);
        self.content = self.history[self.history.len() - 1 - next].clone();
        self.move_end();
    }

    /// Step forward to a newer history entry, restoring the saved input at the end.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.move_end();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.move_end();
            }
        }
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            state: self,
            enabled: true,
            placeholder: None,
            prompt: "> ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        state.move_right();
        state.insert('!');
        assert_eq!(state.content(), "elXlo!");
    }

    #[test]
    fn test_text_input_state_multibyte() {
        let mut state = TextInputState::new();
        state.insert_str("résumé");
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "résué");

        state.move_home();
        state.move_right();
        state.insert('ü');
        assert_eq!(state.content(), "rüésué");
    }

    #[test]
    fn test_text_input_state_history() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.insert_str("draft");
        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");

        state.history_next();
        assert_eq!(state.content(), "draft");
    }

    #[test]
    fn test_blank_submit_skips_history() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        assert_eq!(state.submit(), "   ");

        state.history_prev();
        assert!(state.is_empty());
    }

    #[test]
    fn test_widget_renders_cursor_and_placeholder() {
        let area = Rect::new(0, 0, 30, 1);
        let state = TextInputState::new();

        let mut buf = Buffer::empty(area);
        state.widget().placeholder("Ask").render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> _Ask");

        let mut buf = Buffer::empty(area);
        state
            .widget()
            .enabled(false)
            .placeholder("Ask")
            .render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> Ask");
    }

    #[test]
    fn test_widget_scrolls_long_input() {
        let area = Rect::new(0, 0, 10, 1);
        let mut state = TextInputState::new();
        state.insert_str("abcdefghijklmnop");

        let mut buf = Buffer::empty(area);
        state.widget().render(area, &mut buf);
        insta::assert_snapshot!(buffer_to_string(&buf), @"> jklmnop_");
    }
}
