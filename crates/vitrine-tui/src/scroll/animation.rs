//! Scroll animation controller

use std::time::Duration;

use vitrine_core::clock::{is_complete, lerp_u16, progress};
use vitrine_core::{EasingType, ScrollConfig};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Clock reading when the animation began
    start: Duration,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

/// Scroll animation controller
///
/// Call `scroll_by()`/`scroll_to()` to queue movement, then `update()` every
/// frame with the current clock reading to get the interpolated offset.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    /// Reduced motion forces instant jumps regardless of config
    reduced_motion: bool,
    current_scroll: u16,
    /// Pending scroll delta for batching multiple scroll events
    pending_delta: i32,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default(), false)
    }
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig, reduced_motion: bool) -> Self {
        Self {
            animation: None,
            config,
            reduced_motion,
            current_scroll: 0,
            pending_delta: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Whether movement is eased rather than instant
    #[inline]
    pub fn is_smooth(&self) -> bool {
        !self.reduced_motion && self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Check if there's pending work (animation or pending delta)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Final position once the current animation settles
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Set scroll position immediately (no animation)
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    /// Start an animation towards `target`, or jump there when not smooth
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16, now: Duration) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.is_smooth() || self.current_scroll == target {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        self.animation = Some(self.animation_to(target, now));
    }

    /// Scroll by a delta (positive = down)
    ///
    /// Deltas queued before the next `update()` are batched into one animation.
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.is_smooth() {
            self.current_scroll = clamp_scroll(self.current_scroll as i32 + delta, max_scroll);
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll_by(self.config.scroll_lines.max(1) as i32, max_scroll);
    }

    pub fn scroll_up(&mut self, max_scroll: u16) {
        self.scroll_by(-(self.config.scroll_lines.max(1) as i32), max_scroll);
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        let half_page = (viewport_height / 2).max(1) as i32;
        self.scroll_by(half_page, max_scroll);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        let half_page = (viewport_height / 2).max(1) as i32;
        self.scroll_by(-half_page, max_scroll);
    }

    /// Advance to `now` and return the current scroll position
    pub fn update(&mut self, now: Duration, max_scroll: u16) -> u16 {
        if self.pending_delta != 0 {
            let target = clamp_scroll(self.target_scroll() as i32 + self.pending_delta, max_scroll);
            self.pending_delta = 0;

            if target != self.current_scroll {
                self.animation = Some(self.animation_to(target, now));
            }
        }

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.current_scroll = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = progress(anim.start, now, anim.duration);
                let eased_t = anim.easing.apply(t);
                self.current_scroll = lerp_u16(anim.from, anim.to, eased_t).min(max_scroll);
            }
        }

        self.current_scroll
    }

    /// Cancel any active animation and stop at current position
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }

    fn animation_to(&self, target: u16, now: Duration) -> ActiveAnimation {
        ActiveAnimation {
            start: now,
            from: self.current_scroll,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
        }
    }
}

fn clamp_scroll(value: i32, max_scroll: u16) -> u16 {
    value.clamp(0, max_scroll as i32) as u16
}
