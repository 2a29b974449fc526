//! Cursor follower
//!
//! A decorative dot that trails the pointer, closing a fixed fraction of the
//! remaining distance every frame. Only active with a fine pointer and full
//! motion; otherwise it never moves and never asks for frames.

use crate::capability::Capabilities;
use crate::clock::lerp;

/// Fraction of the remaining distance covered per frame
pub const FOLLOW_FACTOR: f64 = 0.2;
/// Distance under which the follower snaps onto the pointer
pub const SNAP_DISTANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFollower {
    enabled: bool,
    position: (f64, f64),
    target: (f64, f64),
    visible: bool,
}

impl CursorFollower {
    pub fn new(capabilities: &Capabilities) -> Self {
        Self {
            enabled: capabilities.cursor_effect_enabled(),
            position: (0.0, 0.0),
            target: (0.0, 0.0),
            visible: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drawn only once the pointer has been seen
    pub fn is_visible(&self) -> bool {
        self.enabled && self.visible
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Pointer moved; the first move places the follower directly under it
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if !self.enabled {
            return;
        }
        self.target = (x, y);
        if !self.visible {
            self.position = (x, y);
            self.visible = true;
        }
    }

    /// Pointer left the page
    pub fn on_pointer_leave(&mut self) {
        self.visible = false;
    }

    pub fn needs_frame(&self) -> bool {
        self.is_visible() && self.position != self.target
    }

    /// Advance one frame; returns `true` while still catching up
    pub fn step(&mut self) -> bool {
        if !self.needs_frame() {
            return false;
        }
        let (x, y) = self.position;
        let (tx, ty) = self.target;
        let next = (lerp(x, tx, FOLLOW_FACTOR), lerp(y, ty, FOLLOW_FACTOR));

        if (tx - next.0).abs() < SNAP_DISTANCE && (ty - next.1).abs() < SNAP_DISTANCE {
            self.position = self.target;
            false
        } else {
            self.position = next;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follower_converges() {
        let mut cursor = CursorFollower::new(&Capabilities::new(false, true, true));
        cursor.on_pointer_move(0.0, 0.0);
        cursor.on_pointer_move(100.0, 50.0);
        assert!(cursor.needs_frame());

        let mut frames = 0;
        while cursor.step() {
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(cursor.position(), (100.0, 50.0));
        assert!(!cursor.needs_frame());
    }

    #[test]
    fn test_first_move_snaps() {
        let mut cursor = CursorFollower::new(&Capabilities::default());
        cursor.on_pointer_move(40.0, 12.0);
        assert_eq!(cursor.position(), (40.0, 12.0));
        assert!(!cursor.needs_frame());
    }

    #[test]
    fn test_disabled_without_fine_pointer_or_with_reduced_motion() {
        for caps in [
            Capabilities::new(false, false, true),
            Capabilities::new(true, true, true),
        ] {
            let mut cursor = CursorFollower::new(&caps);
            cursor.on_pointer_move(10.0, 10.0);
            cursor.on_pointer_move(90.0, 90.0);
            assert!(!cursor.is_visible());
            assert!(!cursor.needs_frame());
            assert!(!cursor.step());
        }
    }
}
