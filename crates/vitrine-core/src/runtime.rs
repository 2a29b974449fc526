//! Page runtime
//!
//! Owns every piece of per-page state and is the only thing that mutates it.
//! The host feeds it events (scroll, resize, key, click, pointer, submit) and
//! calls [`PageRuntime::on_frame`] once per animation frame while
//! [`PageRuntime::needs_frame`] is true. Nothing here schedules itself.
//!
//! Capabilities gate everything: with reduced motion or without visibility
//! observation, reveal targets and counters are settled during `init` and the
//! runtime never asks for a frame on their behalf.

use std::time::Duration;

use tracing::{debug, info};

use crate::capability::Capabilities;
use crate::config::AppConfig;
use crate::counter::CounterAnimator;
use crate::cursor::CursorFollower;
use crate::form::{FormRules, InquiryForm, SubmitOutcome};
use crate::format::NumberLocale;
use crate::header::HeaderState;
use crate::menu::{MenuController, MenuEvent, MenuState, RecordedSurface};
use crate::observer::{Bounds, ElementId, Viewport, ViewportObserver};
use crate::page::{ElementKind, PageElement, PageSpec};
use crate::reveal::{RevealAnimator, RevealApplied, RevealTiming};

/// What a frame callback did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Reveal batch flushed during this frame, in arrival order
    pub revealed: Vec<RevealApplied>,
    /// Counters still animating after this frame
    pub counters_running: bool,
}

pub struct PageRuntime {
    page: PageSpec,
    elements: Vec<PageElement>,
    capabilities: Capabilities,
    reveal_observer: ViewportObserver,
    counter_observer: ViewportObserver,
    reveals: RevealAnimator,
    counters: CounterAnimator,
    menu: MenuController<RecordedSurface>,
    header: Option<HeaderState>,
    cursor: CursorFollower,
    form: Option<InquiryForm>,
    /// Logical pixels per viewport unit, for the header threshold
    px_per_unit: f64,
    frame_requested: bool,
    initialized: bool,
}

impl PageRuntime {
    /// Register every element of `page`
    pub fn new(page: PageSpec, config: &AppConfig, capabilities: Capabilities) -> Self {
        let elements = page.elements();

        let mut reveals = RevealAnimator::new(RevealTiming::from(&config.motion));
        let mut counters = CounterAnimator::new(&config.motion, NumberLocale::from(&config.number));
        for element in &elements {
            match element.kind {
                ElementKind::Reveal { .. } => reveals.register(element.id),
                ElementKind::Counter { section, index } => {
                    counters.register(element.id, page.sections[section].counters[index].spec())
                }
            }
        }

        let menu_surface = page.has_menu_toggle().then(RecordedSurface::default);
        let menu = MenuController::new(menu_surface, config.menu.breakpoint_px);
        let header = page.header.as_ref().map(|_| HeaderState::from(&config.header));

        let form = page
            .form
            .as_ref()
            .filter(|form| form.status_region)
            .map(|form| InquiryForm::new(form.fields.clone(), FormRules::from(&config.form)));

        Self {
            page,
            elements,
            capabilities,
            reveal_observer: ViewportObserver::new(config.motion.reveal_threshold),
            counter_observer: ViewportObserver::new(config.motion.counter_threshold),
            reveals,
            counters,
            menu,
            header,
            cursor: CursorFollower::new(&capabilities),
            form,
            px_per_unit: 1.0,
            frame_requested: false,
            initialized: false,
        }
    }

    /// Set how many logical pixels one viewport unit spans
    pub fn with_unit_scale(mut self, px_per_unit: f64) -> Self {
        self.px_per_unit = px_per_unit;
        self
    }

    pub fn page(&self) -> &PageSpec {
        &self.page
    }

    pub fn elements(&self) -> &[PageElement] {
        &self.elements
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn reveals(&self) -> &RevealAnimator {
        &self.reveals
    }

    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    pub fn menu_enabled(&self) -> bool {
        self.menu.is_enabled()
    }

    pub fn menu_surface(&self) -> Option<&RecordedSurface> {
        self.menu.surface()
    }

    pub fn header(&self) -> Option<&HeaderState> {
        self.header.as_ref()
    }

    pub fn cursor(&self) -> &CursorFollower {
        &self.cursor
    }

    pub fn form(&self) -> Option<&InquiryForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut InquiryForm> {
        self.form.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn animated(&self) -> bool {
        self.capabilities.animations_enabled()
    }

    /// Feed element positions after (re)layout
    ///
    /// Elements that were already seen stay settled; a resize never resets a
    /// reveal or restarts a counter.
    pub fn apply_layout<I>(&mut self, bounds: I)
    where
        I: IntoIterator<Item = (ElementId, Bounds)>,
    {
        if !self.animated() {
            return;
        }
        for (id, b) in bounds {
            let Some(element) = self.elements.get(id.0).filter(|e| e.id == id) else {
                continue;
            };
            match element.kind {
                ElementKind::Reveal { .. } => self.reveal_observer.observe(id, b),
                ElementKind::Counter { .. } => self.counter_observer.observe(id, b),
            }
        }
    }

    /// Start the page: settle the degraded path, or take the initial visibility reading
    pub fn init(&mut self, viewport: Viewport, now: Duration) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.animated() {
            info!(
                reveals = self.reveals.targets().len(),
                counters = self.counters.counters().len(),
                "Page initialised with animations"
            );
        } else {
            self.reveals.reveal_all_immediately();
            self.counters.render_all_final();
            info!(
                reduced_motion = self.capabilities.reduced_motion(),
                observer_supported = self.capabilities.observer_supported(),
                "Page initialised without animations"
            );
        }

        self.on_scroll(viewport, now);
    }

    /// Viewport moved (or was first measured)
    pub fn on_scroll(&mut self, viewport: Viewport, now: Duration) {
        if let Some(header) = self.header.as_mut() {
            header.on_scroll(viewport.top * self.px_per_unit);
        }

        if !self.initialized || !self.animated() {
            return;
        }

        for event in self.reveal_observer.take_visible(viewport) {
            if self.reveals.on_visible(event.element) {
                self.frame_requested = true;
            }
        }
        for event in self.counter_observer.take_visible(viewport) {
            if self.counters.start(event.element, now) {
                self.frame_requested = true;
            }
        }
    }

    /// Whether the host should deliver another animation frame
    pub fn needs_frame(&self) -> bool {
        self.frame_requested
    }

    /// Animation frame callback
    pub fn on_frame(&mut self, now: Duration) -> FrameReport {
        self.frame_requested = false;

        let revealed = if self.reveals.needs_frame() {
            self.reveals.flush(now)
        } else {
            Vec::new()
        };
        let counters_running = self.counters.step(now);
        let cursor_moving = self.cursor.step();

        self.frame_requested = counters_running || cursor_moving || self.reveals.needs_frame();
        if !revealed.is_empty() {
            debug!(count = revealed.len(), "Frame revealed batch");
        }

        FrameReport {
            revealed,
            counters_running,
        }
    }

    /// Viewport width changed, in logical pixels
    pub fn on_resize(&mut self, width_px: u32) -> Option<MenuState> {
        self.menu.handle(&MenuEvent::Resize { width: width_px })
    }

    /// Document-level key press
    pub fn on_key(&mut self, key: &str) -> Option<MenuState> {
        self.menu.handle(&MenuEvent::KeyDown(key.to_string()))
    }

    pub fn on_toggle_click(&mut self) -> Option<MenuState> {
        self.menu.handle(&MenuEvent::ToggleClick)
    }

    /// A nav link was clicked: close the menu and return the target section index
    pub fn on_nav_link_click(&mut self, link: usize) -> Option<usize> {
        let target = self.page.nav_links().get(link)?.target.clone();
        self.menu.handle(&MenuEvent::NavLinkClick);
        self.page.section_index(&target)
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor.on_pointer_move(x, y);
        if self.cursor.needs_frame() {
            self.frame_requested = true;
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.cursor.on_pointer_leave();
    }

    /// Submission attempt; `None` when the page has no form or no status region
    pub fn submit_form(&mut self) -> Option<SubmitOutcome> {
        self.form.as_mut().map(InquiryForm::submit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::form::SubmissionStatus;

    const PAGE: &str = r#"
        title = "Test page"

        [header]
        brand = "Test"

        [nav]
        links = [{ label = "Stats", target = "stats" }]

        [[sections]]
        id = "a"
        heading = "A"

        [[sections]]
        id = "b"
        heading = "B"

        [[sections]]
        id = "c"
        heading = "C"

        [[sections]]
        id = "stats"
        heading = "Stats"
        reveal = false

        [[sections.counters]]
        label = "Growth"
        value = "1234.5"
        decimals = "1"
        suffix = "%"

        [form]
        fields = [
            { name = "email", type = "email", required = true },
            { name = "project", type = "textarea", required = true },
        ]
    "#;

    fn runtime(caps: Capabilities) -> PageRuntime {
        let page = PageSpec::from_toml_str(PAGE).unwrap();
        PageRuntime::new(page, &AppConfig::default(), caps)
    }

    /// Sections stacked 10 units apart, each 8 tall; the counter lives at 300
    fn layout(rt: &mut PageRuntime) {
        rt.apply_layout(vec![
            (ElementId(0), Bounds::new(0.0, 8.0)),
            (ElementId(1), Bounds::new(10.0, 8.0)),
            (ElementId(2), Bounds::new(20.0, 8.0)),
            (ElementId(3), Bounds::new(300.0, 4.0)),
        ]);
    }

    #[test]
    fn test_initial_batch_revealed_in_one_frame() {
        let clock = ManualClock::new();
        let mut rt = runtime(Capabilities::default());
        layout(&mut rt);
        rt.init(Viewport::new(0.0, 40.0), clock.now());

        assert!(rt.needs_frame());
        assert!(!rt.reveals().is_revealed(ElementId(0)));

        clock.advance_ms(16);
        let report = rt.on_frame(clock.now());
        let delays: Vec<u128> = report
            .revealed
            .iter()
            .map(|a| a.transition.delay.as_millis())
            .collect();
        assert_eq!(delays, vec![0, 60, 120]);
        assert!(rt.reveals().all_revealed());
        assert!(!rt.needs_frame());
    }

    #[test]
    fn test_counter_runs_once_on_first_visibility() {
        let clock = ManualClock::new();
        let mut rt = runtime(Capabilities::default());
        layout(&mut rt);
        rt.init(Viewport::new(0.0, 40.0), clock.now());
        rt.on_frame(clock.now());

        clock.advance_ms(100);
        rt.on_scroll(Viewport::new(280.0, 40.0), clock.now());
        assert!(rt.needs_frame());

        while rt.needs_frame() {
            clock.advance_ms(16);
            rt.on_frame(clock.now());
        }
        let counter = rt.counters().counter(ElementId(3)).unwrap();
        assert_eq!(counter.display(), "1,234.5%");

        // Leaving and re-entering does not restart it
        rt.on_scroll(Viewport::new(0.0, 40.0), clock.now());
        rt.on_scroll(Viewport::new(280.0, 40.0), clock.now());
        assert!(!rt.needs_frame());
        assert!(rt.counters().counter(ElementId(3)).unwrap().is_done());
    }

    #[test]
    fn test_relayout_does_not_rearm_seen_elements() {
        let clock = ManualClock::new();
        let mut rt = runtime(Capabilities::default());
        layout(&mut rt);
        rt.init(Viewport::new(0.0, 12.0), clock.now());
        let first = rt.on_frame(clock.now());
        assert_eq!(first.revealed.len(), 2);

        // Resize reflows everything; the two seen sections stay revealed and
        // are never batched again
        layout(&mut rt);
        rt.on_resize(1400);
        rt.on_scroll(Viewport::new(0.0, 40.0), clock.now());
        let second = rt.on_frame(clock.now());
        let ids: Vec<_> = second.revealed.iter().map(|a| a.element).collect();
        assert_eq!(ids, vec![ElementId(2)]);
        assert_eq!(second.revealed[0].transition.delay, Duration::ZERO);
    }

    #[test]
    fn test_reduced_motion_settles_everything_at_init() {
        let mut rt = runtime(Capabilities::new(true, true, true));
        layout(&mut rt);
        rt.init(Viewport::new(0.0, 10.0), Duration::ZERO);

        assert!(rt.reveals().all_revealed());
        assert!(rt.reveals().targets().iter().all(|t| t.transition().is_none()));
        assert_eq!(rt.counters().counter(ElementId(3)).unwrap().display(), "1,234.5%");
        assert!(!rt.needs_frame());

        rt.on_scroll(Viewport::new(280.0, 40.0), Duration::from_millis(5));
        assert!(!rt.needs_frame());
    }

    #[test]
    fn test_missing_observer_uses_degraded_path() {
        let mut rt = runtime(Capabilities::new(false, true, false));
        rt.init(Viewport::new(0.0, 10.0), Duration::ZERO);
        assert!(rt.reveals().all_revealed());
        assert!(rt.counters().counter(ElementId(3)).unwrap().is_done());
    }

    #[test]
    fn test_menu_and_nav_links() {
        let mut rt = runtime(Capabilities::default());
        assert!(rt.menu_enabled());
        assert_eq!(rt.on_toggle_click(), Some(MenuState::Open));
        assert!(rt.menu_surface().unwrap().expanded);

        assert_eq!(rt.on_nav_link_click(0), Some(3));
        assert_eq!(rt.menu_state(), MenuState::Closed);
        assert_eq!(rt.on_nav_link_click(5), None);

        rt.on_toggle_click();
        assert_eq!(rt.on_key("Escape"), Some(MenuState::Closed));
    }

    #[test]
    fn test_header_tracks_scroll_in_pixels() {
        let mut rt = runtime(Capabilities::default()).with_unit_scale(16.0);
        rt.init(Viewport::new(0.0, 10.0), Duration::ZERO);
        assert!(!rt.header().unwrap().is_scrolled());
        rt.on_scroll(Viewport::new(1.0, 10.0), Duration::ZERO);
        assert!(rt.header().unwrap().is_scrolled());
    }

    #[test]
    fn test_form_submission() {
        let mut rt = runtime(Capabilities::default());
        let form = rt.form_mut().unwrap();
        form.set_value("email", "hi@example.com");
        form.set_value("project", "x".repeat(19));
        let outcome = rt.submit_form().unwrap();
        assert_eq!(outcome.result.status, SubmissionStatus::ValidationError);

        rt.form_mut().unwrap().set_value("project", "x".repeat(20));
        let outcome = rt.submit_form().unwrap();
        assert_eq!(outcome.result.status, SubmissionStatus::Success);
        assert!(outcome.payload.is_some());
    }

    #[test]
    fn test_page_without_optional_regions() {
        let page = PageSpec::from_toml_str(r#"title = "Bare""#).unwrap();
        let mut rt = PageRuntime::new(page, &AppConfig::default(), Capabilities::default());
        rt.init(Viewport::new(0.0, 10.0), Duration::ZERO);

        assert!(!rt.menu_enabled());
        assert_eq!(rt.on_toggle_click(), None);
        assert!(rt.header().is_none());
        assert!(rt.submit_form().is_none());
        assert!(!rt.needs_frame());
    }
}
