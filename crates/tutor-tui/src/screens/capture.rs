//! Capture screen: pick the problem photo to tutor from.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::{spinner_frame, Styles};
use crate::ui::widgets::{KeyHint, StatusBar, TextInput};
use crate::ui::{centered_percent, main_layout, split_bottom};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The capture screen.
pub struct CaptureScreen;

impl Screen for CaptureScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        render_capture_content(app, main_area, buf);

        let hints = vec![
            KeyHint::new("Enter", "Capture"),
            KeyHint::new("Esc", "Back"),
            KeyHint::new("?", "Help"),
        ];
        let mut status_bar = StatusBar::new("Capture").hints(hints);
        if let Some(notification) = &app.notification {
            status_bar = status_bar.right(notification);
        }
        status_bar.render(status_area, buf);
    }
}

fn render_capture_content(app: &App, area: Rect, buf: &mut Buffer) {
    let content_area = centered_percent(80, 60, area);

    let block = Block::default()
        .title(" Snap a Problem ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(content_area);
    block.render(content_area, buf);

    if inner.height < 4 {
        return;
    }

    let (guide_area, input_area) = split_bottom(inner, 2);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Position your math problem in the frame:",
            Styles::default(),
        )),
        Line::from(Span::styled(
            "  type the path to a photo (jpg or png) of the problem.",
            Styles::dim(),
        )),
        Line::from(""),
    ];

    if app.capturing {
        lines.push(Line::from(Span::styled(
            format!("  {} reading image...", spinner_frame(app.tick)),
            Styles::loading(),
        )));
    } else if app.problem_image.is_some() {
        lines.push(Line::from(Span::styled(
            "  A problem is already loaded; capturing again replaces it.",
            Styles::dim(),
        )));
    }

    Paragraph::new(lines).style(Styles::default()).render(guide_area, buf);

    TextInput::new(&app.path_input)
        .placeholder("photos/problem.jpg")
        .focused(!app.capturing)
        .render(input_area, buf);
}
