//! Transcript pane: pure message rendering, scroll state, and the widget.

pub mod state;
pub mod view;
pub mod widget;

pub use state::{TranscriptState, SCROLL_STEP};
pub use view::{DEFAULT_ENCOURAGEMENT, ERROR_NOTICE};
pub use widget::TranscriptWidget;
