//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Maximum input length in characters.
pub const MAX_INPUT_CHARS: usize = 500;

/// State for a text input: content, cursor, and submit history.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// The text content.
    content: String,
    /// Cursor as a byte offset, always on a char boundary.
    cursor: usize,
    /// Previously submitted entries, oldest first.
    history: Vec<String>,
    /// Position while browsing history (None = editing fresh input).
    history_pos: Option<usize>,
    /// Fresh input stashed while browsing history.
    stashed: String,
}

impl InputState {
    /// Create an empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear content and cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.history_pos = None;
    }

    /// Insert a character at the cursor. Newlines become spaces; input is
    /// capped at [`MAX_INPUT_CHARS`].
    pub fn insert(&mut self, ch: char) {
        if self.content.chars().count() >= MAX_INPUT_CHARS {
            return;
        }
        let ch = if ch == '\n' { ' ' } else { ch };
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert a string at the cursor, subject to the same cap.
    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.insert(ch);
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.content[..self.cursor].char_indices().next_back() {
            self.content.remove(idx);
            self.cursor = idx;
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    /// Move the cursor one character left.
    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.content[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    /// Move the cursor one character right.
    pub fn move_right(&mut self) {
        if let Some(ch) = self.content[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    /// Move the cursor to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Take the content, recording non-blank entries in history.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        self.history_pos = None;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        content
    }

    /// Replace the content with the previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_pos = match self.history_pos {
            None => {
                self.stashed = std::mem::take(&mut self.content);
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(next_pos);
        self.content = self.history[next_pos].clone();
        self.cursor = self.content.len();
    }

    /// Replace the content with the next history entry, or restore the
    /// stashed fresh input past the newest entry.
    pub fn history_next(&mut self) {
        match self.history_pos {
            None => {}
            Some(p) if p + 1 < self.history.len() => {
                self.history_pos = Some(p + 1);
                self.content = self.history[p + 1].clone();
                self.cursor = self.content.len();
            }
            Some(_) => {
                self.history_pos = None;
                self.content = std::mem::take(&mut self.stashed);
                self.cursor = self.content.len();
            }
        }
    }
}

/// Rendered text input with prompt, placeholder, and cursor.
#[derive(Debug)]
pub struct TextInput<'a> {
    state: &'a InputState,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> TextInput<'a> {
    /// Create a widget over the given state.
    pub fn new(state: &'a InputState) -> Self {
        Self {
            state,
            placeholder: "",
            focused: true,
        }
    }

    /// Set the placeholder shown when empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set focus, which controls the cursor.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 3 {
            return;
        }

        let prompt = "> ";

        if self.state.is_empty() {
            let mut spans = vec![Span::styled(prompt, Styles::highlight())];
            if self.focused {
                spans.push(Span::styled("_", Styles::default()));
            }
            spans.push(Span::styled(self.placeholder, Styles::dim()));
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let before = &self.state.content[..self.state.cursor];
        let after = &self.state.content[self.state.cursor..];

        // Keep the cursor visible: drop leading characters when the text
        // before the cursor outgrows the available width.
        let available = usize::from(area.width).saturating_sub(prompt.len() + 1);
        let mut visible_before = before;
        while visible_before.width() > available {
            let mut chars = visible_before.chars();
            chars.next();
            visible_before = chars.as_str();
        }

        let cursor = if self.focused {
            if after.is_empty() { "_" } else { "|" }
        } else {
            ""
        };

        let line = Line::from(vec![
            Span::styled(prompt, Styles::highlight()),
            Span::styled(visible_before.to_string(), Styles::default()),
            Span::styled(cursor, Styles::highlight()),
            Span::styled(after.to_string(), Styles::default()),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut state = InputState::new();
        state.insert_str("2x = 4");
        assert_eq!(state.content(), "2x = 4");

        state.backspace();
        assert_eq!(state.content(), "2x = ");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "x = ");
    }

    #[test]
    fn test_cursor_respects_char_boundaries() {
        let mut state = InputState::new();
        state.insert_str("x² = 9");
        state.move_left();
        state.move_left();
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "x² 9");
    }

    #[test]
    fn test_newline_becomes_space() {
        let mut state = InputState::new();
        state.insert('a');
        state.insert('\n');
        state.insert('b');
        assert_eq!(state.content(), "a b");
    }

    #[test]
    fn test_length_cap() {
        let mut state = InputState::new();
        for _ in 0..(MAX_INPUT_CHARS + 50) {
            state.insert('x');
        }
        assert_eq!(state.content().chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_submit_records_history() {
        let mut state = InputState::new();
        state.insert_str("first");
        assert_eq!(state.submit(), "first");
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.history_prev();
        assert_eq!(state.content(), "second");
        state.history_prev();
        assert_eq!(state.content(), "first");
        state.history_next();
        assert_eq!(state.content(), "second");
    }

    #[test]
    fn test_history_restores_stashed_input() {
        let mut state = InputState::new();
        state.insert_str("sent");
        state.submit();

        state.insert_str("draft");
        state.history_prev();
        assert_eq!(state.content(), "sent");
        state.history_next();
        assert_eq!(state.content(), "draft");
    }

    #[test]
    fn test_blank_submit_not_recorded() {
        let mut state = InputState::new();
        state.insert_str("   ");
        state.submit();
        state.history_prev();
        assert!(state.is_empty());
    }
}
