//! Capability detection
//!
//! Environment signals are read exactly once, when [`Capabilities::detect`]
//! runs. The resulting flags are immutable for the rest of the process; a
//! preference change mid-session is not picked up.

use tracing::info;

use crate::config::CapabilityOverrides;

/// Source of the environment signals the animation components depend on
pub trait CapabilityProbe {
    /// The user asked for reduced motion
    fn prefers_reduced_motion(&self) -> bool;

    /// A fine pointer with hover is available
    fn has_fine_pointer(&self) -> bool;

    /// The host can report element visibility
    fn supports_observer(&self) -> bool;
}

/// Probe backed by process environment variables
///
/// * `VITRINE_REDUCED_MOTION` / `REDUCE_MOTION`: any truthy value requests reduced motion
/// * `VITRINE_NO_OBSERVER`: truthy disables visibility observation
/// * `VITRINE_POINTER`: `coarse` or `none` disables the fine pointer;
///   otherwise a pointer is assumed unless `TERM` is `linux` or `dumb`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvProbe;

impl EnvProbe {
    fn flag(name: &str) -> bool {
        std::env::var(name)
            .map(|value| is_truthy(&value))
            .unwrap_or(false)
    }
}

impl CapabilityProbe for EnvProbe {
    fn prefers_reduced_motion(&self) -> bool {
        Self::flag("VITRINE_REDUCED_MOTION") || Self::flag("REDUCE_MOTION")
    }

    fn has_fine_pointer(&self) -> bool {
        if let Ok(pointer) = std::env::var("VITRINE_POINTER") {
            return !matches!(pointer.trim().to_lowercase().as_str(), "coarse" | "none");
        }
        !matches!(std::env::var("TERM").as_deref(), Ok("linux") | Ok("dumb"))
    }

    fn supports_observer(&self) -> bool {
        !Self::flag("VITRINE_NO_OBSERVER")
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}

/// Immutable capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    reduced_motion: bool,
    fine_pointer: bool,
    observer_supported: bool,
}

impl Default for Capabilities {
    /// Full-motion desktop defaults
    fn default() -> Self {
        Self::new(false, true, true)
    }
}

impl Capabilities {
    pub const fn new(reduced_motion: bool, fine_pointer: bool, observer_supported: bool) -> Self {
        Self {
            reduced_motion,
            fine_pointer,
            observer_supported,
        }
    }

    /// Read every signal once; configured overrides win over the probe
    pub fn detect(probe: &dyn CapabilityProbe, overrides: &CapabilityOverrides) -> Self {
        let reduced_motion = overrides
            .reduced_motion
            .unwrap_or_else(|| probe.prefers_reduced_motion());
        let fine_pointer = overrides
            .fine_pointer
            .unwrap_or_else(|| probe.has_fine_pointer());
        let observer_supported = overrides
            .observer_supported
            .unwrap_or_else(|| probe.supports_observer());

        let caps = Self::new(reduced_motion, fine_pointer, observer_supported);
        info!(
            reduced_motion,
            fine_pointer,
            observer_supported,
            "Capabilities detected"
        );
        caps
    }

    #[inline]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[inline]
    pub fn fine_pointer(&self) -> bool {
        self.fine_pointer
    }

    #[inline]
    pub fn observer_supported(&self) -> bool {
        self.observer_supported
    }

    /// Reveal and counter animations run only with full motion and a working observer
    #[inline]
    pub fn animations_enabled(&self) -> bool {
        !self.reduced_motion && self.observer_supported
    }

    /// The cursor follower needs hover and full motion
    #[inline]
    pub fn cursor_effect_enabled(&self) -> bool {
        self.fine_pointer && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingProbe {
        reduced: bool,
        calls: Cell<u32>,
    }

    impl CapabilityProbe for CountingProbe {
        fn prefers_reduced_motion(&self) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.reduced
        }

        fn has_fine_pointer(&self) -> bool {
            self.calls.set(self.calls.get() + 1);
            false
        }

        fn supports_observer(&self) -> bool {
            self.calls.set(self.calls.get() + 1);
            true
        }
    }

    #[test]
    fn test_detect_reads_each_signal_once() {
        let probe = CountingProbe {
            reduced: true,
            calls: Cell::new(0),
        };
        let caps = Capabilities::detect(&probe, &CapabilityOverrides::default());
        assert_eq!(probe.calls.get(), 3);

        assert!(caps.reduced_motion());
        assert!(!caps.fine_pointer());
        assert!(!caps.animations_enabled());
        assert!(!caps.cursor_effect_enabled());
        // Flags are plain values from here on
        assert_eq!(probe.calls.get(), 3);
    }

    #[test]
    fn test_overrides_skip_probe() {
        let probe = CountingProbe {
            reduced: true,
            calls: Cell::new(0),
        };
        let overrides = CapabilityOverrides {
            reduced_motion: Some(false),
            fine_pointer: Some(true),
            observer_supported: Some(false),
        };
        let caps = Capabilities::detect(&probe, &overrides);
        assert_eq!(probe.calls.get(), 0);
        assert!(!caps.reduced_motion());
        assert!(caps.cursor_effect_enabled());
        assert!(!caps.animations_enabled());
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("reduce"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("no-preference"));
    }
}
