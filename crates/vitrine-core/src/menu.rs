//! Navigation menu controller
//!
//! Two states, closed and open, starting closed. A toggle click flips the
//! state; a nav-link click, Escape, or a resize above the breakpoint forces it
//! closed. Forcing a closed menu closed has no visible effect.

use tracing::debug;

/// Where the open/closed flag is mirrored
///
/// The toggle control exposes an expanded attribute for assistive technology
/// and the document carries a styling flag; both must always agree with the
/// controller.
pub trait MenuSurface {
    fn set_expanded(&mut self, expanded: bool);
    fn set_menu_open_class(&mut self, open: bool);
}

/// Events the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    ToggleClick,
    NavLinkClick,
    /// Document-level key press, identified by its key name
    KeyDown(String),
    /// Viewport width in logical pixels after a resize
    Resize { width: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Value of the toggle's expanded attribute
    pub fn aria_expanded(self) -> &'static str {
        if self.is_open() {
            "true"
        } else {
            "false"
        }
    }
}

/// Surface that only records the mirrored values
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordedSurface {
    pub expanded: bool,
    pub menu_open_class: bool,
}

impl MenuSurface for RecordedSurface {
    fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    fn set_menu_open_class(&mut self, open: bool) {
        self.menu_open_class = open;
    }
}

#[derive(Debug, Clone)]
pub struct MenuController<S: MenuSurface = RecordedSurface> {
    state: MenuState,
    breakpoint_px: u32,
    surface: Option<S>,
}

impl<S: MenuSurface> MenuController<S> {
    /// `surface` is `None` when the page has no menu toggle; every event is
    /// then ignored.
    pub fn new(surface: Option<S>, breakpoint_px: u32) -> Self {
        Self {
            state: MenuState::Closed,
            breakpoint_px,
            surface,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_enabled(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Apply one event; returns the new state if it changed
    pub fn handle(&mut self, event: &MenuEvent) -> Option<MenuState> {
        if self.surface.is_none() {
            return None;
        }

        let next = match event {
            MenuEvent::ToggleClick => match self.state {
                MenuState::Closed => MenuState::Open,
                MenuState::Open => MenuState::Closed,
            },
            MenuEvent::NavLinkClick => MenuState::Closed,
            MenuEvent::KeyDown(key) if key == "Escape" => MenuState::Closed,
            MenuEvent::KeyDown(_) => return None,
            MenuEvent::Resize { width } if *width > self.breakpoint_px => MenuState::Closed,
            MenuEvent::Resize { .. } => return None,
        };

        if next == self.state {
            return None;
        }
        self.set_state(next);
        debug!(?event, state = ?next, "Menu state changed");
        Some(next)
    }

    pub fn toggle(&mut self) -> Option<MenuState> {
        self.handle(&MenuEvent::ToggleClick)
    }

    pub fn close(&mut self) -> Option<MenuState> {
        self.handle(&MenuEvent::NavLinkClick)
    }

    fn set_state(&mut self, state: MenuState) {
        self.state = state;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_expanded(state.is_open());
            surface.set_menu_open_class(state.is_open());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> MenuController {
        MenuController::new(Some(RecordedSurface::default()), 896)
    }

    fn escape() -> MenuEvent {
        MenuEvent::KeyDown("Escape".to_string())
    }

    #[test]
    fn test_toggle_then_escape() {
        let mut menu = controller();
        assert_eq!(menu.state().aria_expanded(), "false");

        assert_eq!(menu.toggle(), Some(MenuState::Open));
        assert_eq!(menu.state().aria_expanded(), "true");
        assert!(menu.surface().unwrap().expanded);
        assert!(menu.surface().unwrap().menu_open_class);

        assert_eq!(menu.handle(&escape()), Some(MenuState::Closed));
        assert_eq!(menu.state().aria_expanded(), "false");
        assert_eq!(menu.surface().unwrap(), &RecordedSurface::default());
    }

    #[test]
    fn test_nav_link_closes() {
        let mut menu = controller();
        menu.toggle();
        assert_eq!(menu.handle(&MenuEvent::NavLinkClick), Some(MenuState::Closed));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_forced_close_when_closed_is_noop() {
        let mut menu = controller();
        assert_eq!(menu.handle(&escape()), None);
        assert_eq!(menu.handle(&MenuEvent::NavLinkClick), None);
        assert_eq!(menu.handle(&MenuEvent::Resize { width: 1200 }), None);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_resize_respects_breakpoint() {
        let mut menu = controller();
        menu.toggle();
        assert_eq!(menu.handle(&MenuEvent::Resize { width: 896 }), None);
        assert!(menu.is_open());
        assert_eq!(
            menu.handle(&MenuEvent::Resize { width: 897 }),
            Some(MenuState::Closed)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut menu = controller();
        menu.toggle();
        assert_eq!(menu.handle(&MenuEvent::KeyDown("Enter".to_string())), None);
        assert!(menu.is_open());
    }

    #[test]
    fn test_missing_toggle_disables_menu() {
        let mut menu: MenuController = MenuController::new(None, 896);
        assert!(!menu.is_enabled());
        assert_eq!(menu.toggle(), None);
        assert!(!menu.is_open());
    }
}
