//! Test utilities for tutor-tui rendering and integration tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use ratatui::{buffer::Buffer, layout::Rect};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test app with one ready backend and session saving disabled.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Convert a buffer to a plain string, trimming trailing spaces per row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        let mut row = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                row.push_str(cell.symbol());
            }
        }
        result.push_str(row.trim_end());
        result.push('\n');
    }

    result
}

/// Render a screen at the default test size and return the buffer content.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &mut App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.screen, crate::app::Screen::Welcome);
        assert!(!app.models.is_empty());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert!(result.starts_with("Hello\n"));
    }
}
