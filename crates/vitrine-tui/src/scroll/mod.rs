//! Smooth scrolling for the page preview
//!
//! Easing curves and progress math live in `vitrine_core`; this module only
//! holds the controller that turns key presses into an eased scroll offset.
//!
//! ```ignore
//! use vitrine_tui::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new(config.ui.scroll.clone(), capabilities.reduced_motion());
//! animator.scroll_by(10, max_scroll);
//!
//! // Once per frame
//! let top = animator.update(clock.now(), max_scroll);
//! ```

pub mod animation;

pub use animation::ScrollAnimator;
pub use vitrine_core::{EasingType, ScrollConfig};
