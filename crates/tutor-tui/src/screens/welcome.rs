//! Welcome screen.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{centered_percent, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The welcome screen.
pub struct WelcomeScreen;

impl Screen for WelcomeScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        render_welcome_content(app, main_area, buf);

        let hints = vec![
            KeyHint::new("Enter", "Start"),
            KeyHint::new("?", "Help"),
            KeyHint::new("q", "Quit"),
        ];
        let mut status_bar = StatusBar::new("Welcome").hints(hints);
        if let Some(notification) = &app.notification {
            status_bar = status_bar.right(notification);
        }
        status_bar.render(status_area, buf);
    }
}

fn render_welcome_content(app: &App, area: Rect, buf: &mut Buffer) {
    let content_area = centered_percent(80, 80, area);

    let block = Block::default()
        .title(" Math Companion ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(content_area);
    block.render(content_area, buf);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Your patient guide to understanding math, step by step",
            Styles::highlight(),
        )),
        Line::from(""),
        feature_line("Snap a problem", "point the app at a photo of any algebra or calculus problem"),
        feature_line("Learn by thinking", "the tutor guides each step and never just gives answers"),
        feature_line("Ask why", "stuck? ask why we did something and it gets explained"),
        Line::from(""),
        Line::from(Span::styled("  Tutor backends:", Styles::dim())),
    ];

    if app.models.iter().any(tutor_engine::ModelInfo::ready) {
        for model in &app.models {
            let status = if model.ready() {
                Span::styled("[ok] ready", Styles::success())
            } else {
                Span::styled("[!] not found", Styles::dim())
            };
            let mut spans = vec![
                Span::raw("    "),
                Span::styled(model.name.clone(), Styles::default()),
                Span::raw(" "),
                status,
            ];
            if let Some(version) = &model.version {
                spans.push(Span::styled(format!("  v{version}"), Styles::dim()));
            }
            lines.push(Line::from(spans));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "    none found — install the claude, codex, or gemini CLI",
            Styles::warning(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Styles::dim()),
        Span::styled("[Enter]", Styles::key_hint()),
        Span::styled(" to snap a problem", Styles::dim()),
    ]));

    Paragraph::new(lines).style(Styles::default()).render(inner, buf);
}

fn feature_line(title: &str, detail: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  \u{2022} {title}: "), Styles::default()),
        Span::styled(detail.to_string(), Styles::dim()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_screen_to_string};

    #[test]
    fn test_welcome_lists_features_and_backends() {
        let mut app = create_test_app();
        let content = render_screen_to_string(&WelcomeScreen, &mut app);

        assert!(content.contains("Math Companion"));
        assert!(content.contains("Snap a problem"));
        assert!(content.contains("claude"));
        assert!(content.contains("[ok] ready"));
    }

    #[test]
    fn test_welcome_warns_without_backends() {
        let mut app = create_test_app();
        app.models.clear();
        let content = render_screen_to_string(&WelcomeScreen, &mut app);
        assert!(content.contains("none found"));
    }
}
