use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
///
/// Polls at the tick rate while idle and at the animation frame rate while
/// anything on the page is moving.
pub struct EventHandler {
    tick_rate: Duration,
    frame_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, animation_fps: u32) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
            frame_rate: vitrine_core::clock::frame_interval(animation_fps),
        }
    }

    pub fn frame_rate(&self) -> Duration {
        self.frame_rate
    }

    /// Poll for the next event; `animating` selects the faster poll interval
    pub fn next(&self, animating: bool) -> Result<Option<AppEvent>> {
        let timeout = if animating {
            self.frame_rate
        } else {
            self.tick_rate
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                Event::FocusLost => Ok(Some(AppEvent::PointerLeave)),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Terminal lost focus; treated as the pointer leaving the page
    PointerLeave,
    /// Tick event for periodic updates
    Tick,
}
