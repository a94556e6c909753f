//! Per-view display state, owned by whoever renders and passed in explicitly.

/// Distance from the bottom, in pixels, within which the view still counts
/// as pinned to the latest message.
const PINNED_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    has_user_scrolled: bool,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll event. Scrolling up past the threshold detaches the
    /// view; scrolling back to the bottom re-attaches it.
    pub fn on_scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        self.has_user_scrolled = scroll_top < scroll_height - client_height - PINNED_THRESHOLD;
    }

    pub fn has_user_scrolled(&self) -> bool {
        self.has_user_scrolled
    }

    /// Whether a re-render should jump to the newest message.
    pub fn should_autoscroll(&self, scroll_to_bottom: bool) -> bool {
        scroll_to_bottom && !self.has_user_scrolled
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub title: Option<String>,
    pub scroll_to_bottom: bool,
    pub scroll: ScrollState,
}

impl ViewState {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            scroll_to_bottom: true,
            scroll: ScrollState::new(),
        }
    }
}
