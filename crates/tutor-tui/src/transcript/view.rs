//! Pure rendering of transcript messages.
//!
//! Every function here maps message/part state to lines without touching
//! any terminal state, so the rendering rules are unit-testable on their
//! own. Parts render in stored order; unknown tools and non-terminal tool
//! states render nothing.

use ratatui::layout::Alignment;
use ratatui::text::{Line, Span};
use tutor_engine::transcript::{Message, Part, Role, ToolState};
use tutor_engine::CONFIDENCE_TOOL;

use crate::ui::theme::{spinner_frame, Styles};

/// Default encouragement when the tool output carries no usable message.
pub const DEFAULT_ENCOURAGEMENT: &str = "Great job!";

/// Marker rendered once per assistant message.
pub const ASSISTANT_MARKER: &str = "\u{2726} tutor";

/// Generic inline notice for agent/transport failures.
pub const ERROR_NOTICE: &str = "Oops! Something went wrong. Please try again.";

/// Render one message to lines, bounded to `width` columns.
pub fn message_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    match message.role {
        Role::User => user_lines(message, width),
        Role::Assistant => assistant_lines(message, width),
    }
}

fn user_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for part in &message.parts {
        match part {
            Part::Text { text } => {
                for wrapped in wrap_text(text, bubble_width(width)) {
                    lines.push(
                        Line::from(Span::styled(format!(" {wrapped} "), Styles::user_bubble()))
                            .alignment(Alignment::Right),
                    );
                }
            }
            Part::Image { image } => {
                lines.push(
                    Line::from(Span::styled(image_label(image), Styles::dim()))
                        .alignment(Alignment::Right),
                );
            }
            // User messages never carry tool parts; drop anything else.
            Part::Tool { .. } => {}
        }
    }
    lines
}

fn assistant_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        ASSISTANT_MARKER.to_string(),
        Styles::highlight(),
    ))];

    for part in &message.parts {
        match part {
            Part::Text { text } => {
                for wrapped in wrap_text(text, bubble_width(width)) {
                    lines.push(Line::from(Span::styled(
                        format!(" {wrapped} "),
                        Styles::assistant_bubble(),
                    )));
                }
            }
            Part::Tool {
                tool_name,
                state: ToolState::OutputAvailable,
                output,
                ..
            } if tool_name == CONFIDENCE_TOOL => {
                let text = encouragement_text(output.as_ref());
                for (i, wrapped) in wrap_text(&text, bubble_width(width)).into_iter().enumerate() {
                    let prefix = if i == 0 { "\u{2605} " } else { "  " };
                    lines.push(Line::from(Span::styled(
                        format!("{prefix}{wrapped}"),
                        Styles::encouragement(),
                    )));
                }
            }
            // Other tool names and non-terminal states are deliberately
            // invisible.
            Part::Tool { .. } | Part::Image { .. } => {}
        }
    }
    lines
}

/// The encouragement message, or the default when absent or empty.
pub fn encouragement_text(output: Option<&serde_json::Value>) -> String {
    output
        .and_then(|v| v.get("message"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_ENCOURAGEMENT)
        .to_string()
}

/// Bounded label standing in for the image itself.
#[allow(clippy::cast_precision_loss)]
fn image_label(uri: &str) -> String {
    if let Some(rest) = uri.strip_prefix("data:") {
        if let Some((mime, payload)) = rest.split_once(";base64,") {
            let kb = payload.len() as f64 * 3.0 / 4.0 / 1024.0;
            return format!("[ photo \u{b7} {mime} \u{b7} {kb:.1} KB ]");
        }
    }
    let short: String = uri.chars().take(32).collect();
    format!("[ photo \u{b7} {short} ]")
}

/// "Thinking..." row shown while the agent owes a reply.
pub fn loading_lines(tick: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            ASSISTANT_MARKER.to_string(),
            Styles::highlight(),
        )),
        Line::from(Span::styled(
            format!(" {} Thinking... ", spinner_frame(tick)),
            Styles::loading(),
        )),
    ]
}

/// Inline failure notice.
pub fn error_lines(width: u16) -> Vec<Line<'static>> {
    wrap_text(ERROR_NOTICE, bubble_width(width))
        .into_iter()
        .map(|wrapped| Line::from(Span::styled(format!("! {wrapped}"), Styles::error())))
        .collect()
}

fn bubble_width(width: u16) -> usize {
    (usize::from(width) * 3 / 4).max(20)
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}
