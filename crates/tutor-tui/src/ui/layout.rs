//! Layout helpers for the tutor TUI.

use ratatui::layout::Rect;

/// Centered rect with fixed dimensions, clamped to the parent.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

/// Centered rect sized as a percentage of the parent.
pub fn centered_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let w = area.width * percent_x.min(100) / 100;
    let h = area.height * percent_y.min(100) / 100;
    centered_fixed(w, h, area)
}

/// Main area plus a one-line status bar at the bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let (main, bar) = split_bottom(area, 1);
    (main, bar)
}

/// Split a fixed number of lines off the bottom of an area.
pub fn split_bottom(area: Rect, height: u16) -> (Rect, Rect) {
    let h = height.min(area.height);
    let top = Rect::new(area.x, area.y, area.width, area.height - h);
    let bottom = Rect::new(area.x, area.y + area.height - h, area.width, h);
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_fixed(40, 10, area);
        assert_eq!(rect, Rect::new(20, 7, 40, 10));

        // Larger than the parent clamps.
        let clamped = centered_fixed(200, 50, area);
        assert_eq!(clamped, area);
    }

    #[test]
    fn test_split_bottom() {
        let area = Rect::new(0, 0, 80, 24);
        let (top, bottom) = split_bottom(area, 3);
        assert_eq!(top.height, 21);
        assert_eq!(bottom.height, 3);
        assert_eq!(bottom.y, 21);
    }

    #[test]
    fn test_main_layout_reserves_status_line() {
        let (main, bar) = main_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(main.height, 23);
        assert_eq!(bar.height, 1);
    }
}
