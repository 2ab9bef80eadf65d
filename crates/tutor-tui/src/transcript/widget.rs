//! Transcript pane widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};
use tutor_engine::Transcript;

use super::state::TranscriptState;
use super::view;
use crate::ui::theme::Styles;

/// Scrollable view over a transcript, with the loading row and the inline
/// error notice appended after the newest message.
pub struct TranscriptWidget<'a> {
    transcript: &'a Transcript,
    responding: bool,
    show_error: bool,
    tick: usize,
    with_block: bool,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a widget over the transcript.
    pub fn new(transcript: &'a Transcript) -> Self {
        Self {
            transcript,
            responding: false,
            show_error: false,
            tick: 0,
            with_block: true,
        }
    }

    /// Show the "Thinking..." row.
    #[must_use]
    pub fn responding(mut self, responding: bool) -> Self {
        self.responding = responding;
        self
    }

    /// Show the generic failure notice.
    #[must_use]
    pub fn show_error(mut self, show_error: bool) -> Self {
        self.show_error = show_error;
        self
    }

    /// Tick counter for the spinner.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Whether to draw the surrounding block.
    #[must_use]
    pub fn with_block(mut self, with_block: bool) -> Self {
        self.with_block = with_block;
        self
    }

    fn build_lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for message in self.transcript.messages() {
            lines.extend(view::message_lines(message, width));
            lines.push(Line::from(""));
        }
        if self.responding {
            lines.extend(view::loading_lines(self.tick));
            lines.push(Line::from(""));
        }
        if self.show_error {
            lines.extend(view::error_lines(width));
        }
        lines
    }
}

impl StatefulWidget for TranscriptWidget<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if self.with_block {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .style(Styles::default());
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = self.build_lines(inner.width);
        let offset = state.clamp(lines.len(), usize::from(inner.height));

        let visible: Vec<Line<'static>> = lines
            .into_iter()
            .skip(offset)
            .take(usize::from(inner.height))
            .collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_engine::transcript::{Message, Part};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    fn render(widget: TranscriptWidget<'_>, state: &mut TranscriptState) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf, state);
        buffer_text(&buf)
    }

    #[test]
    fn test_renders_messages_and_loading_row() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user_text("I need help...")).unwrap();

        let mut state = TranscriptState::new();
        let content = render(
            TranscriptWidget::new(&transcript).responding(transcript.awaiting_reply()),
            &mut state,
        );
        assert!(content.contains("I need help..."));
        assert!(content.contains("Thinking..."));
    }

    #[test]
    fn test_no_loading_row_after_reply() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user_text("help")).unwrap();
        transcript
            .push(Message::assistant(vec![Part::text("What do you notice?")]))
            .unwrap();

        let mut state = TranscriptState::new();
        let content = render(
            TranscriptWidget::new(&transcript).responding(transcript.awaiting_reply()),
            &mut state,
        );
        assert!(content.contains("What do you notice?"));
        assert!(!content.contains("Thinking..."));
    }

    #[test]
    fn test_error_notice_rendered() {
        let transcript = Transcript::new();
        let mut state = TranscriptState::new();
        let content = render(TranscriptWidget::new(&transcript).show_error(true), &mut state);
        assert!(content.contains("Oops! Something went wrong."));
    }

    #[test]
    fn test_follow_shows_newest_message() {
        let mut transcript = Transcript::new();
        for i in 0..30 {
            transcript
                .push(Message::user_text(format!("message number {i}")))
                .unwrap();
            transcript
                .push(Message::assistant(vec![Part::text(format!("reply number {i}"))]))
                .unwrap();
        }

        let mut state = TranscriptState::new();
        let content = render(TranscriptWidget::new(&transcript), &mut state);
        assert!(content.contains("reply number 29"));
        assert!(!content.contains("message number 0 "));
    }
}
