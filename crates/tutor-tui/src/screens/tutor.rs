//! Tutor screen: the conversation with the agent.

use crate::app::{App, TutorPhase, QUICK_PROMPTS};
use crate::screens::Screen;
use crate::transcript::TranscriptWidget;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar, TextInput};
use crate::ui::{main_layout, split_bottom};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

/// The tutor screen.
pub struct TutorScreen;

impl Screen for TutorScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        if main_area.height < 5 {
            return;
        }

        // Header, transcript, optional quick-action row, input.
        let header_area = Rect::new(main_area.x, main_area.y, main_area.width, 1);
        let body = Rect::new(
            main_area.x,
            main_area.y + 1,
            main_area.width,
            main_area.height - 1,
        );
        let (rest, input_area) = split_bottom(body, 1);
        let (transcript_area, quick_area) = if app.quick_actions_visible() {
            let (t, q) = split_bottom(rest, 1);
            (t, Some(q))
        } else {
            (rest, None)
        };

        render_header(app, header_area, buf);

        // A failed turn leaves the last message user-role; the error notice
        // replaces the thinking row until the next dispatch.
        let responding = app.is_responding() && !app.agent_error;
        let widget = TranscriptWidget::new(&app.session.transcript)
            .responding(responding)
            .show_error(app.agent_error)
            .tick(app.tick);
        widget.render(transcript_area, buf, &mut app.transcript_state);

        if let Some(quick_area) = quick_area {
            render_quick_actions(quick_area, buf);
        }

        TextInput::new(&app.input)
            .placeholder(input_placeholder(app.phase()))
            .focused(!app.send_in_flight)
            .render(input_area, buf);

        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("Esc", "Back"),
            KeyHint::new("?", "Help"),
        ];
        let mut status_bar = StatusBar::new("Tutor").hints(hints);
        let backend = app.chat_model().map(|m| m.name);
        if let Some(notification) = &app.notification {
            status_bar = status_bar.right(notification);
        } else if let Some(backend) = &backend {
            status_bar = status_bar.right(backend);
        }
        status_bar.render(status_area, buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let line = Line::from(vec![
        Span::styled(" \u{2726} ", Styles::highlight()),
        Span::styled("Your Math Companion", Styles::title()),
        Span::styled(
            match app.phase() {
                TutorPhase::Idle => "  waiting for a problem",
                TutorPhase::AwaitingFirstResponse => "  looking at your problem",
                TutorPhase::Conversing => "",
            },
            Styles::dim(),
        ),
    ]);
    Paragraph::new(line).style(Styles::default()).render(area, buf);
}

fn render_quick_actions(area: Rect, buf: &mut Buffer) {
    let keys = ["Ctrl+Y", "Ctrl+E"];
    let mut spans = Vec::new();
    for (prompt, key) in QUICK_PROMPTS.iter().zip(keys) {
        spans.push(Span::styled(format!(" [{key}]"), Styles::key_hint()));
        spans.push(Span::styled(format!(" {}  ", prompt.label), Styles::dim()));
    }
    Paragraph::new(Line::from(spans))
        .style(Styles::default())
        .render(area, buf);
}

/// Placeholder text for the chat input, by phase.
pub fn input_placeholder(phase: TutorPhase) -> &'static str {
    match phase {
        TutorPhase::Idle => "Capture a problem to get started...",
        TutorPhase::AwaitingFirstResponse => "The tutor is looking at your problem...",
        TutorPhase::Conversing => "Type your response...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_screen_to_string};
    use tutor_engine::{Part, SendPayload};

    #[test]
    fn test_tutor_screen_first_exchange() {
        let mut app = create_test_app();
        app.screen = crate::app::Screen::Tutor;
        app.dispatch(SendPayload::text("I need help...")).unwrap();

        let content = render_screen_to_string(&TutorScreen, &mut app);
        assert!(content.contains("Your Math Companion"));
        assert!(content.contains("I need help..."));
        // Loading row while the agent owes a reply; no quick actions yet.
        assert!(content.contains("Thinking..."));
        assert!(!content.contains("Why did we do that?"));
    }

    #[test]
    fn test_tutor_screen_quick_actions_after_reply() {
        let mut app = create_test_app();
        app.screen = crate::app::Screen::Tutor;
        app.dispatch(SendPayload::text("I need help...")).unwrap();
        app.complete_send(Ok(vec![Part::text("What do you notice first?")]));

        let content = render_screen_to_string(&TutorScreen, &mut app);
        assert!(content.contains("What do you notice first?"));
        assert!(!content.contains("Thinking..."));
        assert!(content.contains("Why did we do that?"));
        assert!(content.contains("Explain differently"));
    }

    #[test]
    fn test_tutor_screen_error_notice() {
        let mut app = create_test_app();
        app.screen = crate::app::Screen::Tutor;
        app.dispatch(SendPayload::text("hi")).unwrap();
        app.complete_send(Err(tutor_engine::AgentError::Timeout("claude".into())));

        let content = render_screen_to_string(&TutorScreen, &mut app);
        assert!(content.contains("Oops! Something went wrong."));
        assert!(!content.contains("Thinking..."));
    }

    #[test]
    fn test_placeholders_by_phase() {
        assert_eq!(
            input_placeholder(TutorPhase::Idle),
            "Capture a problem to get started..."
        );
        assert_ne!(
            input_placeholder(TutorPhase::AwaitingFirstResponse),
            input_placeholder(TutorPhase::Conversing)
        );
    }
}
