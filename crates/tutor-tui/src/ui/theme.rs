//! Theme and styling for the tutor TUI.
//!
//! The palette transposes the app's sky/amber scheme onto a dark terminal
//! background: sky for the student's bubbles and accents, amber for
//! encouragement, red for the error notice.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(15, 23, 42);
    pub const FG: Color = Color::Rgb(226, 232, 240);
    pub const DIM: Color = Color::Rgb(100, 116, 139);

    // Accent (sky)
    pub const ACCENT: Color = Color::Rgb(14, 165, 233);
    pub const ACCENT_DEEP: Color = Color::Rgb(3, 105, 161);

    // Bubbles
    pub const USER_BUBBLE: Color = Color::Rgb(125, 211, 252);
    pub const ASSISTANT_BUBBLE: Color = Color::Rgb(226, 232, 240);

    // Encouragement (amber)
    pub const ENCOURAGE: Color = Color::Rgb(245, 158, 11);

    // Status
    pub const SUCCESS: Color = Color::Rgb(74, 222, 128);
    pub const WARNING: Color = Color::Rgb(250, 204, 21);
    pub const ERROR: Color = Color::Rgb(248, 113, 113);

    // Chrome
    pub const BORDER: Color = Color::Rgb(51, 65, 85);
    pub const BORDER_ACTIVE: Color = Color::Rgb(14, 165, 233);
    pub const STATUS_BG: Color = Color::Rgb(30, 41, 59);
}

/// Common styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted text.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Student (outbound) bubble text.
    pub fn user_bubble() -> Style {
        Style::default()
            .fg(Palette::BG)
            .bg(Palette::USER_BUBBLE)
    }

    /// Tutor (inbound) bubble text.
    pub fn assistant_bubble() -> Style {
        Style::default().fg(Palette::ASSISTANT_BUBBLE).bg(Palette::STATUS_BG)
    }

    /// Encouragement bubble text.
    pub fn encouragement() -> Style {
        Style::default()
            .fg(Palette::ENCOURAGE)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// "Thinking..." row.
    pub fn loading() -> Style {
        Style::default()
            .fg(Palette::DIM)
            .bg(Palette::BG)
            .add_modifier(Modifier::ITALIC)
    }

    /// Success status.
    pub fn success() -> Style {
        Style::default().fg(Palette::SUCCESS).bg(Palette::BG)
    }

    /// Warning status.
    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::BG)
    }

    /// Error notice.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Border for inactive panes.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border for the focused pane.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }

    /// Status bar background.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Key hint in the status bar.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::STATUS_BG)
            .add_modifier(Modifier::BOLD)
    }
}

/// Spinner frames for in-progress indicators.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Pick a spinner frame for a tick counter.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}
