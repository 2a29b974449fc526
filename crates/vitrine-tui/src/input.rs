use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use vitrine_core::Clock;

use crate::app::{App, Focus};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    ToggleMenu,
    /// Follow nav link n (zero-based)
    NavLink(usize),
    MenuNext,
    MenuPrev,
    MenuSelect,
    /// Escape key; closes the menu and leaves the form
    Escape,
    FocusNextField,
    FocusPrevField,
    InputChar(char),
    Backspace,
    Submit,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event<C: Clock>(key: KeyEvent, app: &App<C>) -> Action {
    // Global bindings first
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Esc, _) => return Action::Escape,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => return Action::Submit,
        (KeyCode::Tab, _) => return Action::FocusNextField,
        (KeyCode::BackTab, _) => return Action::FocusPrevField,
        _ => {}
    }

    match app.focus {
        Focus::Form => handle_form_mode(key),
        Focus::Menu => handle_menu_mode(key),
        Focus::Page => handle_page_mode(key),
    }
}

fn handle_page_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
            Action::ScrollHalfPageDown
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
            Action::ScrollHalfPageUp
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ToggleMenu,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::NavLink(c as usize - '1' as usize)
        }

        _ => Action::None,
    }
}

fn handle_menu_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::MenuNext,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::MenuPrev,
        (KeyCode::Enter, _) => Action::MenuSelect,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ToggleMenu,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::NavLink(c as usize - '1' as usize)
        }
        _ => Action::None,
    }
}

fn handle_form_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => Action::FocusNextField,
        (KeyCode::Backspace, _) => Action::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InputChar(c)
        }
        _ => Action::None,
    }
}
