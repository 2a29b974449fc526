//! Header scroll state: marked as scrolled once the page leaves the top

use crate::config::HeaderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderState {
    threshold_px: u32,
    scrolled: bool,
}

impl From<&HeaderConfig> for HeaderState {
    fn from(config: &HeaderConfig) -> Self {
        Self::new(config.scrolled_threshold_px)
    }
}

impl HeaderState {
    pub fn new(threshold_px: u32) -> Self {
        Self {
            threshold_px,
            scrolled: false,
        }
    }

    /// Re-evaluate for a scroll offset; returns `true` if the flag flipped
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > self.threshold_px as f64;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}
