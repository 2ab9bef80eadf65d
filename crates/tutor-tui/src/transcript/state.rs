//! Transcript viewport state: scrolling and follow mode.

/// Lines scrolled per key press or wheel tick.
pub const SCROLL_STEP: usize = 3;

/// Scroll state for the transcript pane.
///
/// While following, the viewport pins to the newest line at render time
/// (the widget clamps once line counts are known). Manual scrolling leaves
/// follow mode; a transcript update or an explicit jump re-enters it.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// First visible line.
    offset: usize,
    /// Whether the viewport follows the newest line.
    follow: bool,
}

impl TranscriptState {
    /// Create a following state.
    pub fn new() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }

    /// Whether follow mode is active.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Current first visible line (as of the last render).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll up, leaving follow mode.
    pub fn scroll_up(&mut self, step: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(step);
    }

    /// Scroll down. The widget clamps to the last line at render time.
    pub fn scroll_down(&mut self, step: usize) {
        self.offset = self.offset.saturating_add(step);
    }

    /// Pin the viewport to the newest line.
    pub fn jump_to_latest(&mut self) {
        self.follow = true;
    }

    /// Resolve the effective offset for a render and remember it.
    pub fn clamp(&mut self, total_lines: usize, viewport: usize) -> usize {
        let max = total_lines.saturating_sub(viewport);
        if self.follow {
            self.offset = max;
        } else {
            self.offset = self.offset.min(max);
        }
        self.offset
    }
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_pins_to_bottom() {
        let mut state = TranscriptState::new();
        assert!(state.is_following());
        assert_eq!(state.clamp(100, 20), 80);
        assert_eq!(state.clamp(120, 20), 100);
    }

    #[test]
    fn test_scroll_up_leaves_follow() {
        let mut state = TranscriptState::new();
        state.clamp(100, 20);
        state.scroll_up(SCROLL_STEP);
        assert!(!state.is_following());
        assert_eq!(state.clamp(100, 20), 77);

        // New content does not move the viewport while unfollowed.
        assert_eq!(state.clamp(150, 20), 77);
    }

    #[test]
    fn test_scroll_down_clamps() {
        let mut state = TranscriptState::new();
        state.clamp(100, 20);
        state.scroll_up(10);
        state.scroll_down(500);
        assert_eq!(state.clamp(100, 20), 80);
    }

    #[test]
    fn test_jump_to_latest_restores_follow() {
        let mut state = TranscriptState::new();
        state.scroll_up(5);
        assert!(!state.is_following());

        state.jump_to_latest();
        assert!(state.is_following());
        assert_eq!(state.clamp(60, 20), 40);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut state = TranscriptState::new();
        assert_eq!(state.clamp(5, 20), 0);
        state.scroll_down(10);
        assert_eq!(state.clamp(5, 20), 0);
    }
}
