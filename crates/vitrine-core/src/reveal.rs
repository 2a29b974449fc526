//! Batch scheduler and reveal animator
//!
//! Visibility events that arrive before the next animation frame are collected
//! into one batch. The frame callback flushes the whole batch at once, giving
//! each element a stagger delay proportional to its arrival position.
//!
//! # Invariants
//!
//! 1. A revealed target never reverts.
//! 2. At most one flush is pending at any time; the pending flag is cleared
//!    only by the flush itself.
//! 3. A target appears in at most one batch.
//! 4. `delay(i) = min(i * step, cap)`, non-decreasing in `i`.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::config::MotionConfig;
use crate::observer::ElementId;

/// Stagger delay for the element at `index` within a batch
#[inline]
pub fn stagger_delay(index: usize, step: Duration, cap: Duration) -> Duration {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    step.saturating_mul(index).min(cap)
}

/// Delay and duration handed to the styling layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub delay: Duration,
    pub duration: Duration,
}

impl Transition {
    /// Point at which the transition has fully played out, relative to its start
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Timing constants for reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub stagger_step: Duration,
    pub stagger_cap: Duration,
    pub duration: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::from(&MotionConfig::default())
    }
}

impl From<&MotionConfig> for RevealTiming {
    fn from(config: &MotionConfig) -> Self {
        Self {
            stagger_step: Duration::from_millis(config.stagger_step_ms),
            stagger_cap: Duration::from_millis(config.stagger_cap_ms),
            duration: Duration::from_millis(config.reveal_duration_ms),
        }
    }
}

/// An element that fades in once, the first time it is seen
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTarget {
    pub id: ElementId,
    revealed: bool,
    batch_position: Option<usize>,
    transition: Option<Transition>,
    revealed_at: Option<Duration>,
}

impl RevealTarget {
    fn new(id: ElementId) -> Self {
        Self {
            id,
            revealed: false,
            batch_position: None,
            transition: None,
            revealed_at: None,
        }
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Position inside the batch that revealed this target
    pub fn batch_position(&self) -> Option<usize> {
        self.batch_position
    }

    /// `None` when the target was revealed without animation
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Frame time of the flush that revealed this target
    pub fn revealed_at(&self) -> Option<Duration> {
        self.revealed_at
    }
}

/// Output of a flush, one per revealed element, in batch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealApplied {
    pub element: ElementId,
    pub position: usize,
    pub transition: Transition,
}

/// Collects visibility events until the next frame
#[derive(Debug, Default, Clone)]
pub struct BatchScheduler {
    pending: Vec<ElementId>,
    flush_scheduled: bool,
}

impl BatchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the pending batch
    ///
    /// Returns `true` when this call scheduled the flush, i.e. the caller must
    /// request an animation frame. Further appends before the flush return
    /// `false`.
    pub fn enqueue(&mut self, element: ElementId) -> bool {
        if self.pending.contains(&element) {
            return false;
        }
        self.pending.push(element);
        if self.flush_scheduled {
            false
        } else {
            self.flush_scheduled = true;
            true
        }
    }

    #[inline]
    pub fn is_flush_scheduled(&self) -> bool {
        self.flush_scheduled
    }

    pub fn pending(&self) -> &[ElementId] {
        &self.pending
    }

    /// Take the batch and reset the scheduling flag in one step
    pub fn take_batch(&mut self) -> Vec<ElementId> {
        self.flush_scheduled = false;
        std::mem::take(&mut self.pending)
    }
}

/// Owns every reveal target and turns batches into transitions
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    targets: Vec<RevealTarget>,
    index: HashMap<ElementId, usize>,
    scheduler: BatchScheduler,
    timing: RevealTiming,
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new(RevealTiming::default())
    }
}

impl RevealAnimator {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            targets: Vec::new(),
            index: HashMap::new(),
            scheduler: BatchScheduler::new(),
            timing,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// Register a target in page order; duplicates are ignored
    pub fn register(&mut self, id: ElementId) {
        if self.index.contains_key(&id) {
            return;
        }
        self.index.insert(id, self.targets.len());
        self.targets.push(RevealTarget::new(id));
    }

    pub fn target(&self, id: ElementId) -> Option<&RevealTarget> {
        self.index.get(&id).map(|&i| &self.targets[i])
    }

    pub fn targets(&self) -> &[RevealTarget] {
        &self.targets
    }

    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.target(id).is_some_and(RevealTarget::is_revealed)
    }

    pub fn all_revealed(&self) -> bool {
        self.targets.iter().all(RevealTarget::is_revealed)
    }

    /// A flush is waiting for the next frame
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_flush_scheduled()
    }

    /// Handle a visibility event; returns `true` if a frame must be requested
    pub fn on_visible(&mut self, id: ElementId) -> bool {
        match self.target(id) {
            Some(target) if !target.is_revealed() => self.scheduler.enqueue(id),
            _ => false,
        }
    }

    /// Frame callback: reveal the pending batch in arrival order
    pub fn flush(&mut self, now: Duration) -> Vec<RevealApplied> {
        let batch = self.scheduler.take_batch();
        let mut applied = Vec::with_capacity(batch.len());

        for id in batch {
            let Some(&slot) = self.index.get(&id) else {
                continue;
            };
            let target = &mut self.targets[slot];
            if target.revealed {
                continue;
            }

            let position = applied.len();
            let transition = Transition {
                delay: stagger_delay(position, self.timing.stagger_step, self.timing.stagger_cap),
                duration: self.timing.duration,
            };
            target.revealed = true;
            target.batch_position = Some(position);
            target.transition = Some(transition);
            target.revealed_at = Some(now);

            applied.push(RevealApplied {
                element: id,
                position,
                transition,
            });
        }

        if !applied.is_empty() {
            debug!(count = applied.len(), "Flushed reveal batch");
        }
        applied
    }

    /// Degraded path: every target is revealed now, with no transition
    pub fn reveal_all_immediately(&mut self) {
        self.scheduler.take_batch();
        for target in &mut self.targets {
            target.revealed = true;
            target.batch_position = None;
            target.transition = None;
        }
        debug!(count = self.targets.len(), "Revealed all targets without animation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn animator_with(n: usize) -> RevealAnimator {
        let mut animator = RevealAnimator::default();
        for i in 0..n {
            animator.register(ElementId(i));
        }
        animator
    }

    #[test]
    fn test_stagger_delay_values() {
        let step = Duration::from_millis(60);
        let cap = Duration::from_millis(150);
        let delays: Vec<u128> = (0..5)
            .map(|i| stagger_delay(i, step, cap).as_millis())
            .collect();
        assert_eq!(delays, vec![0, 60, 120, 150, 150]);
    }

    #[test]
    fn test_only_first_enqueue_schedules() {
        let mut scheduler = BatchScheduler::new();
        assert!(scheduler.enqueue(ElementId(0)));
        assert!(!scheduler.enqueue(ElementId(1)));
        assert!(!scheduler.enqueue(ElementId(1)));
        assert_eq!(scheduler.pending(), &[ElementId(0), ElementId(1)]);

        let batch = scheduler.take_batch();
        assert_eq!(batch.len(), 2);
        assert!(!scheduler.is_flush_scheduled());
        assert!(scheduler.pending().is_empty());

        // Next window schedules again
        assert!(scheduler.enqueue(ElementId(2)));
    }

    #[test]
    fn test_flush_applies_stagger_in_arrival_order() {
        let mut animator = animator_with(4);
        assert!(animator.on_visible(ElementId(2)));
        assert!(!animator.on_visible(ElementId(0)));
        assert!(!animator.on_visible(ElementId(3)));

        let applied = animator.flush(Duration::from_millis(16));
        let order: Vec<_> = applied.iter().map(|a| a.element.0).collect();
        assert_eq!(order, vec![2, 0, 3]);
        assert_eq!(applied[2].transition.delay, Duration::from_millis(120));
        assert!(applied
            .iter()
            .all(|a| a.transition.duration == Duration::from_millis(200)));

        assert!(animator.is_revealed(ElementId(0)));
        assert!(!animator.is_revealed(ElementId(1)));
        assert_eq!(animator.target(ElementId(3)).unwrap().batch_position(), Some(2));
        assert!(!animator.needs_frame());
    }

    #[test]
    fn test_revealed_target_never_rebatched() {
        let mut animator = animator_with(2);
        animator.on_visible(ElementId(0));
        animator.flush(Duration::ZERO);

        assert!(!animator.on_visible(ElementId(0)));
        assert!(!animator.needs_frame());
        assert!(animator.flush(Duration::from_millis(16)).is_empty());
        assert!(animator.is_revealed(ElementId(0)));
    }

    #[test]
    fn test_unknown_element_ignored() {
        let mut animator = animator_with(1);
        assert!(!animator.on_visible(ElementId(99)));
        assert!(!animator.needs_frame());
    }

    #[test]
    fn test_reveal_all_immediately() {
        let mut animator = animator_with(5);
        animator.on_visible(ElementId(1));
        animator.reveal_all_immediately();

        assert!(animator.all_revealed());
        assert!(!animator.needs_frame());
        for target in animator.targets() {
            assert_eq!(target.transition(), None);
            assert_eq!(target.batch_position(), None);
        }
    }

    proptest! {
        #[test]
        fn prop_batch_delays_capped_and_non_decreasing(n in 1usize..64) {
            let mut animator = animator_with(n);
            for i in 0..n {
                animator.on_visible(ElementId(i));
            }
            let applied = animator.flush(Duration::ZERO);
            prop_assert_eq!(applied.len(), n);

            let mut prev = Duration::ZERO;
            for (i, a) in applied.iter().enumerate() {
                let expected = Duration::from_millis((i as u64 * 60).min(150));
                prop_assert_eq!(a.transition.delay, expected);
                prop_assert!(a.transition.delay >= prev);
                prop_assert!(a.transition.delay <= Duration::from_millis(150));
                prev = a.transition.delay;
            }
        }

        #[test]
        fn prop_each_target_in_at_most_one_batch(
            events in proptest::collection::vec(0usize..8, 0..40),
            flush_every in 1usize..5,
        ) {
            let mut animator = animator_with(8);
            let mut seen = std::collections::HashSet::new();
            for (step, id) in events.iter().enumerate() {
                animator.on_visible(ElementId(*id));
                if step % flush_every == 0 {
                    for a in animator.flush(Duration::ZERO) {
                        prop_assert!(seen.insert(a.element));
                    }
                }
            }
            for a in animator.flush(Duration::ZERO) {
                prop_assert!(seen.insert(a.element));
            }
        }
    }
}
