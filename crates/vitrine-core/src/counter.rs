//! Counter animator
//!
//! Each counter counts up from 0 to its target once, the first time it becomes
//! visible. Every frame renders `target * ease(progress)`; the frame at which
//! progress reaches 1 renders the exact target and the counter stops asking for
//! frames. Frames delivered after completion change nothing.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::progress;
use crate::config::{EasingType, MotionConfig};
use crate::format::{format_count, NumberLocale, MAX_DECIMALS};
use crate::observer::ElementId;

/// Target, precision and suffix of one counter, as declared in page markup
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSpec {
    pub target: f64,
    pub decimals: u32,
    pub suffix: String,
}

impl Default for CounterSpec {
    fn default() -> Self {
        Self {
            target: 0.0,
            decimals: 0,
            suffix: String::new(),
        }
    }
}

impl CounterSpec {
    pub fn new(target: f64, decimals: u32, suffix: impl Into<String>) -> Self {
        Self {
            target,
            decimals: decimals.min(MAX_DECIMALS),
            suffix: suffix.into(),
        }
    }

    /// Build from the three optional markup attributes
    ///
    /// Missing or empty attributes take their defaults (0, 0, ""). Unparseable
    /// numbers fall back to the default with a warning.
    pub fn from_attributes(value: Option<&str>, decimals: Option<&str>, suffix: Option<&str>) -> Self {
        let target = match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => 0.0,
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!(value = raw, "Invalid counter value, using 0");
                    0.0
                }
            },
        };

        let decimals = match decimals.map(str::trim).filter(|v| !v.is_empty()) {
            None => 0,
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => {
                    let places = v.floor();
                    if places > MAX_DECIMALS as f64 {
                        warn!(decimals = raw, max = MAX_DECIMALS, "Counter decimals clamped");
                        MAX_DECIMALS
                    } else {
                        places as u32
                    }
                }
                _ => {
                    warn!(decimals = raw, "Invalid counter decimals, using 0");
                    0
                }
            },
        };

        Self {
            target,
            decimals,
            suffix: suffix.unwrap_or_default().to_string(),
        }
    }

    /// Rendered text for an arbitrary value
    pub fn render(&self, value: f64, locale: &NumberLocale) -> String {
        format!("{}{}", format_count(value, self.decimals, locale), self.suffix)
    }

    /// Rendered text of the terminal value
    pub fn render_final(&self, locale: &NumberLocale) -> String {
        self.render(self.target, locale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Running { start: Duration },
    Done,
}

/// Animated counter state
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub id: ElementId,
    pub spec: CounterSpec,
    phase: Phase,
    current: f64,
    display: String,
}

impl Counter {
    /// Value behind the current display
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Text currently shown
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }
}

/// Drives every counter on the page
#[derive(Debug, Clone)]
pub struct CounterAnimator {
    counters: Vec<Counter>,
    index: HashMap<ElementId, usize>,
    duration: Duration,
    easing: EasingType,
    locale: NumberLocale,
}

impl Default for CounterAnimator {
    fn default() -> Self {
        Self::new(&MotionConfig::default(), NumberLocale::default())
    }
}

impl CounterAnimator {
    pub fn new(config: &MotionConfig, locale: NumberLocale) -> Self {
        Self {
            counters: Vec::new(),
            index: HashMap::new(),
            duration: Duration::from_millis(config.counter_duration_ms),
            easing: config.counter_easing,
            locale,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    /// Register a counter; it shows its zero value until animated
    pub fn register(&mut self, id: ElementId, spec: CounterSpec) {
        if self.index.contains_key(&id) {
            return;
        }
        let display = spec.render(0.0, &self.locale);
        self.index.insert(id, self.counters.len());
        self.counters.push(Counter {
            id,
            spec,
            phase: Phase::Idle,
            current: 0.0,
            display,
        });
    }

    pub fn counter(&self, id: ElementId) -> Option<&Counter> {
        self.index.get(&id).map(|&i| &self.counters[i])
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Begin the count-up; returns `true` if a frame must be requested
    ///
    /// A counter animates once. Starting a running or finished counter is a no-op.
    pub fn start(&mut self, id: ElementId, now: Duration) -> bool {
        let Some(&slot) = self.index.get(&id) else {
            return false;
        };
        let counter = &mut self.counters[slot];
        if counter.phase != Phase::Idle {
            return false;
        }
        counter.phase = Phase::Running { start: now };
        debug!(counter = id.0, target = counter.spec.target, "Counter started");
        true
    }

    /// Degraded path for one counter: show the final value, no frames
    pub fn render_final(&mut self, id: ElementId) {
        if let Some(&slot) = self.index.get(&id) {
            let counter = &mut self.counters[slot];
            counter.current = counter.spec.target;
            counter.display = counter.spec.render_final(&self.locale);
            counter.phase = Phase::Done;
        }
    }

    /// Degraded path for every counter
    pub fn render_all_final(&mut self) {
        for counter in &mut self.counters {
            counter.current = counter.spec.target;
            counter.display = counter.spec.render_final(&self.locale);
            counter.phase = Phase::Done;
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.counters.iter().any(Counter::is_running)
    }

    /// Frame callback: advance every running counter
    ///
    /// Returns `true` while any counter still needs another frame.
    pub fn step(&mut self, now: Duration) -> bool {
        let mut still_running = false;

        for counter in &mut self.counters {
            let Phase::Running { start } = counter.phase else {
                continue;
            };

            let t = progress(start, now, self.duration);
            if t >= 1.0 {
                counter.current = counter.spec.target;
                counter.display = counter.spec.render_final(&self.locale);
                counter.phase = Phase::Done;
                debug!(counter = counter.id.0, display = %counter.display, "Counter finished");
            } else {
                let eased = self.easing.apply(t);
                counter.current = counter.spec.target * eased;
                counter.display = counter.spec.render(counter.current, &self.locale);
                still_running = true;
            }
        }

        still_running
    }
}
