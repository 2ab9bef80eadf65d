//! Screen definitions for the tutor TUI.

pub mod capture;
pub mod tutor;
pub mod welcome;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
///
/// Screens take the app mutably so the transcript pane can resolve its
/// scroll position while rendering.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Welcome       Enter  Snap a problem
  Capture       Enter  Read the photo and start tutoring
  Tutor         Enter  Send your reply
                Ctrl+Y Ask why we did that
                Ctrl+E Ask for a different explanation
                Up/Dn  Scroll the conversation
                End    Jump to the newest message
  Anywhere      Esc    Back   q / Ctrl+C  Quit

  [Press any key to close]
";

    let width = 56.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
