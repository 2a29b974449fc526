use std::time::Duration;

use crossterm::event::{MouseEvent, MouseEventKind};
use tracing::debug;
use vitrine_core::form::InquiryPayload;
use vitrine_core::{AppConfig, Clock, ElementId, PageRuntime, SystemClock, Viewport};

use crate::input::Action;
use crate::layout::{layout_page, PageLayout};
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    Menu,
    Form,
}

/// How far along a reveal target's entrance is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Not revealed yet, or waiting out its stagger delay
    Hidden,
    Entering,
    Shown,
}

/// Application state
pub struct App<C: Clock = SystemClock> {
    pub runtime: PageRuntime,
    pub theme: Theme,
    pub layout: PageLayout,
    pub scroll: ScrollAnimator,
    pub focus: Focus,
    pub menu_selection: usize,
    pub field_focus: usize,
    pub status_message: Option<String>,
    pub should_quit: bool,
    clock: C,
    cell_width_px: u32,
    breakpoint_px: u32,
    /// Content area size in cells
    width: u16,
    viewport_height: u16,
    submissions: Vec<InquiryPayload>,
}

impl<C: Clock> App<C> {
    pub fn new(runtime: PageRuntime, config: &AppConfig, theme: Theme, clock: C) -> Self {
        let scroll = ScrollAnimator::new(
            config.ui.scroll.clone(),
            runtime.capabilities().reduced_motion(),
        );
        Self {
            runtime,
            theme,
            layout: PageLayout::default(),
            scroll,
            focus: Focus::Page,
            menu_selection: 0,
            field_focus: 0,
            status_message: None,
            should_quit: false,
            clock,
            cell_width_px: config.menu.cell_width_px.max(1),
            breakpoint_px: config.menu.breakpoint_px,
            width: 0,
            viewport_height: 0,
            submissions: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn width_px(&self) -> u32 {
        self.width as u32 * self.cell_width_px
    }

    /// Narrow enough that navigation lives behind the menu toggle
    pub fn is_compact(&self) -> bool {
        self.width_px() <= self.breakpoint_px
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.scroll.current_scroll() as f64,
            self.viewport_height as f64,
        )
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Resize only if the content area actually changed
    pub fn ensure_size(&mut self, width: u16, height: u16) {
        if width != self.width || height != self.viewport_height || !self.runtime.is_initialized() {
            self.resize(width, height);
        }
    }

    /// Content area changed size: relayout and let the page react
    pub fn resize(&mut self, width: u16, height: u16) {
        let now = self.now();
        self.width = width;
        self.viewport_height = height;

        self.layout = layout_page(self.runtime.page(), self.runtime.elements(), width);
        self.runtime.apply_layout(self.layout.bounds.iter().copied());

        let max_scroll = self.layout.max_scroll(height);
        if self.scroll.target_scroll() > max_scroll {
            self.scroll.set_scroll(max_scroll);
        }

        self.runtime.on_resize(self.width_px());
        if self.focus == Focus::Menu && !self.runtime.menu_state().is_open() {
            self.focus = Focus::Page;
        }

        if self.runtime.is_initialized() {
            self.runtime.on_scroll(self.viewport(), now);
        } else {
            self.runtime.init(self.viewport(), now);
        }
        debug!(width, height, width_px = self.width_px(), "Layout updated");
    }

    /// Advance scroll and page animations to the current clock reading
    pub fn tick(&mut self) {
        let now = self.now();
        let before = self.scroll.current_scroll();
        let after = self
            .scroll
            .update(now, self.layout.max_scroll(self.viewport_height));
        if after != before {
            self.runtime.on_scroll(self.viewport(), now);
        }
        if self.runtime.needs_frame() {
            self.runtime.on_frame(now);
        }
    }

    /// Whether the next poll should use the animation frame rate
    pub fn is_animating(&self) -> bool {
        self.scroll.needs_update() || self.runtime.needs_frame() || self.reveal_in_flight()
    }

    fn reveal_in_flight(&self) -> bool {
        self.runtime
            .reveals()
            .targets()
            .iter()
            .filter(|t| t.is_revealed())
            .any(|t| self.reveal_phase(Some(t.id)) != RevealPhase::Shown)
    }

    /// Entrance phase of a reveal target; untracked content is always shown
    pub fn reveal_phase(&self, id: Option<ElementId>) -> RevealPhase {
        let Some(target) = id.and_then(|id| self.runtime.reveals().target(id)) else {
            return RevealPhase::Shown;
        };
        if !target.is_revealed() {
            return RevealPhase::Hidden;
        }
        let (Some(transition), Some(at)) = (target.transition(), target.revealed_at()) else {
            return RevealPhase::Shown;
        };

        let elapsed = self.now().saturating_sub(at);
        if elapsed < transition.delay {
            RevealPhase::Hidden
        } else if elapsed < transition.end() {
            RevealPhase::Entering
        } else {
            RevealPhase::Shown
        }
    }

    /// Drain inquiries accepted since the last call
    pub fn take_submissions(&mut self) -> Vec<InquiryPayload> {
        std::mem::take(&mut self.submissions)
    }

    pub fn apply(&mut self, action: Action) {
        let before = self.scroll.current_scroll();
        let max_scroll = self.layout.max_scroll(self.viewport_height);
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll.scroll_down(max_scroll),
            Action::ScrollUp => self.scroll.scroll_up(max_scroll),
            Action::ScrollHalfPageDown => {
                self.scroll
                    .scroll_half_page_down(self.viewport_height, max_scroll)
            }
            Action::ScrollHalfPageUp => {
                self.scroll
                    .scroll_half_page_up(self.viewport_height, max_scroll)
            }
            Action::JumpToTop => self.scroll_to_line(0),
            Action::JumpToBottom => self.scroll_to_line(max_scroll),
            Action::ToggleMenu => self.toggle_menu(),
            Action::NavLink(index) => self.follow_nav_link(index),
            Action::MenuNext => {
                let count = self.runtime.page().nav_links().len();
                if count > 0 {
                    self.menu_selection = (self.menu_selection + 1) % count;
                }
            }
            Action::MenuPrev => {
                let count = self.runtime.page().nav_links().len();
                if count > 0 {
                    self.menu_selection = (self.menu_selection + count - 1) % count;
                }
            }
            Action::MenuSelect => self.follow_nav_link(self.menu_selection),
            Action::Escape => {
                self.runtime.on_key("Escape");
                self.focus = Focus::Page;
            }
            Action::FocusNextField => self.cycle_field(1),
            Action::FocusPrevField => self.cycle_field(-1),
            Action::InputChar(c) => {
                if let Some(value) = self.focused_value_mut() {
                    value.push(c);
                }
            }
            Action::Backspace => {
                if let Some(value) = self.focused_value_mut() {
                    value.pop();
                }
            }
            Action::Submit => self.submit(),
            Action::None => {}
        }
        self.sync_scroll(before);
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let before = self.scroll.current_scroll();
        let max_scroll = self.layout.max_scroll(self.viewport_height);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.runtime
                    .on_pointer_move(mouse.column as f64, mouse.row as f64);
            }
            MouseEventKind::ScrollDown => self.scroll.scroll_down(max_scroll),
            MouseEventKind::ScrollUp => self.scroll.scroll_up(max_scroll),
            _ => {}
        }
        self.sync_scroll(before);
    }

    pub fn pointer_leave(&mut self) {
        self.runtime.on_pointer_leave();
    }

    fn scroll_to_line(&mut self, line: u16) {
        let max_scroll = self.layout.max_scroll(self.viewport_height);
        self.scroll.scroll_to(line, max_scroll, self.now());
    }

    /// Instant jumps bypass `tick`, so report them to the page here
    fn sync_scroll(&mut self, before: u16) {
        if self.scroll.current_scroll() != before {
            let now = self.now();
            self.runtime.on_scroll(self.viewport(), now);
        }
    }

    fn toggle_menu(&mut self) {
        if !self.runtime.menu_enabled() {
            return;
        }
        if !self.is_compact() {
            self.set_status("Navigation is shown in the header at this width");
            return;
        }
        self.runtime.on_toggle_click();
        self.menu_selection = 0;
        self.focus = if self.runtime.menu_state().is_open() {
            Focus::Menu
        } else {
            Focus::Page
        };
    }

    fn follow_nav_link(&mut self, index: usize) {
        let target = self.runtime.on_nav_link_click(index);
        if self.focus == Focus::Menu {
            self.focus = Focus::Page;
        }
        if let Some(&line) = target.and_then(|section| self.layout.section_tops.get(section)) {
            self.scroll_to_line(line);
        }
    }

    fn cycle_field(&mut self, step: isize) {
        let count = self.runtime.form().map_or(0, |f| f.fields().len());
        if count == 0 {
            return;
        }
        if self.focus != Focus::Form {
            self.focus = Focus::Form;
            self.field_focus = 0;
        } else {
            let next = (self.field_focus as isize + step).rem_euclid(count as isize);
            self.field_focus = next as usize;
        }
        self.reveal_focused_field();
    }

    /// Scroll just enough to bring the focused field on screen
    fn reveal_focused_field(&mut self) {
        let Some(&line) = self.layout.field_lines.get(self.field_focus) else {
            return;
        };
        let top = self.scroll.target_scroll();
        let height = self.viewport_height.max(1);
        if line < top {
            self.scroll_to_line(line);
        } else if line >= top + height {
            self.scroll_to_line(line + 1 - height);
        }
    }

    fn focused_value_mut(&mut self) -> Option<&mut String> {
        if self.focus != Focus::Form {
            return None;
        }
        let index = self.field_focus;
        self.runtime.form_mut()?.value_at_mut(index)
    }

    fn submit(&mut self) {
        let Some(outcome) = self.runtime.submit_form() else {
            return;
        };

        if let Some(first) = outcome.violations.first() {
            let index = self
                .runtime
                .form()
                .and_then(|f| f.fields().iter().position(|spec| spec.name == first.field));
            if let Some(index) = index {
                self.focus = Focus::Form;
                self.field_focus = index;
                self.reveal_focused_field();
            }
        }

        if let Some(payload) = outcome.payload {
            self.submissions.push(payload);
        }
        self.status_message = Some(outcome.result.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{Capabilities, ManualClock, PageSpec};

    const PAGE: &str = r#"
        title = "App"

        [header]
        brand = "Studio"

        [nav]
        links = [
            { label = "Work", target = "work" },
            { label = "Contact", target = "contact" },
        ]

        [[sections]]
        id = "intro"
        heading = "Intro"
        body = "Hello"

        [[sections]]
        id = "work"
        heading = "Work"
        body = "Things we made"

        [[sections.counters]]
        label = "Projects"
        value = 120

        [[sections]]
        id = "contact"
        heading = "Contact"

        [form]
        fields = [
            { name = "email", type = "email", required = true },
            { name = "project", type = "textarea", required = true },
        ]
    "#;

    fn app_with(caps: Capabilities) -> App<ManualClock> {
        let config = AppConfig::default();
        let page = PageSpec::from_toml_str(PAGE).unwrap();
        let runtime = PageRuntime::new(page, &config, caps);
        App::new(runtime, &config, Theme::default(), ManualClock::new())
    }

    fn settle(app: &mut App<ManualClock>) {
        for _ in 0..200 {
            app.clock.advance_ms(16);
            app.tick();
            if !app.is_animating() {
                break;
            }
        }
    }

    #[test]
    fn test_first_resize_initialises_runtime() {
        let mut app = app_with(Capabilities::default());
        app.ensure_size(80, 6);
        assert!(app.runtime.is_initialized());

        // Intro (lines 0..2) is on screen; its reveal waits for a frame
        assert_eq!(app.reveal_phase(Some(ElementId(0))), RevealPhase::Hidden);
        app.tick();
        assert_eq!(app.reveal_phase(Some(ElementId(0))), RevealPhase::Entering);
        settle(&mut app);
        assert_eq!(app.reveal_phase(Some(ElementId(0))), RevealPhase::Shown);
    }

    #[test]
    fn test_reduced_motion_shows_everything() {
        let mut app = app_with(Capabilities::new(true, true, true));
        app.ensure_size(80, 2);
        for target in app.runtime.reveals().targets() {
            assert_eq!(app.reveal_phase(Some(target.id)), RevealPhase::Shown);
        }
        assert!(!app.is_animating());

        app.apply(Action::ScrollDown);
        assert_eq!(app.scroll.current_scroll(), 1);
        assert!(!app.runtime.header().unwrap().is_scrolled());

        app.apply(Action::JumpToBottom);
        assert!(app.runtime.header().unwrap().is_scrolled());
    }

    #[test]
    fn test_menu_only_toggles_when_compact() {
        let mut app = app_with(Capabilities::default());
        // 200 cells * 8px is wider than the breakpoint
        app.ensure_size(200, 10);
        app.apply(Action::ToggleMenu);
        assert!(!app.runtime.menu_state().is_open());
        assert!(app.status_message.is_some());

        app.ensure_size(60, 10);
        app.apply(Action::ToggleMenu);
        assert!(app.runtime.menu_state().is_open());
        assert_eq!(app.focus, Focus::Menu);

        // Growing past the breakpoint closes it
        app.ensure_size(150, 10);
        assert!(!app.runtime.menu_state().is_open());
        assert_eq!(app.focus, Focus::Page);
    }

    #[test]
    fn test_menu_selection_jumps_to_section() {
        let mut app = app_with(Capabilities::new(true, true, true));
        app.ensure_size(60, 4);
        app.apply(Action::ToggleMenu);
        app.apply(Action::MenuNext);
        app.apply(Action::MenuSelect);

        assert!(!app.runtime.menu_state().is_open());
        let contact_top = app.layout.section_tops[2];
        let max = app.layout.max_scroll(4);
        assert_eq!(app.scroll.current_scroll(), contact_top.min(max));
    }

    #[test]
    fn test_form_typing_and_submit() {
        let mut app = app_with(Capabilities::default());
        app.ensure_size(80, 6);

        app.apply(Action::FocusNextField);
        assert_eq!(app.focus, Focus::Form);
        for c in "a@b.co".chars() {
            app.apply(Action::InputChar(c));
        }
        app.apply(Action::FocusNextField);
        for c in "too short".chars() {
            app.apply(Action::InputChar(c));
        }
        app.apply(Action::Submit);
        assert!(app.take_submissions().is_empty());

        for c in " but now it is long enough".chars() {
            app.apply(Action::InputChar(c));
        }
        app.apply(Action::Submit);
        let submissions = app.take_submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].get("email"), Some("a@b.co"));
        assert_eq!(
            app.runtime.form().unwrap().value("project"),
            Some("")
        );
    }

    #[test]
    fn test_invalid_submit_focuses_first_violation() {
        let mut app = app_with(Capabilities::default());
        app.ensure_size(80, 6);
        app.apply(Action::Submit);
        assert_eq!(app.focus, Focus::Form);
        assert_eq!(app.field_focus, 0);
        assert!(app.status_message.is_some());
    }
}
