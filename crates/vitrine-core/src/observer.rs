//! Viewport observer adapter
//!
//! Reports the first time each registered element becomes visible and stops
//! watching it at that moment. This is a one-shot reveal source, not a
//! continuous visibility tracker: an element that scrolls out and back in is
//! never reported again.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

/// Stable element identity, assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Vertical extent of an element in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The visible window onto the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// "Became visible" notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub element: ElementId,
}

/// Fraction of `bounds` that lies inside `viewport`
///
/// Zero-height elements count as fully visible while their edge is on screen.
pub fn intersection_ratio(bounds: Bounds, viewport: Viewport) -> f64 {
    if bounds.height <= 0.0 {
        let on_screen = bounds.top >= viewport.top && bounds.top <= viewport.bottom();
        return if on_screen { 1.0 } else { 0.0 };
    }
    let overlap = overlap(bounds, viewport);
    (overlap / bounds.height).clamp(0.0, 1.0)
}

fn overlap(bounds: Bounds, viewport: Viewport) -> f64 {
    (bounds.bottom().min(viewport.bottom()) - bounds.top.max(viewport.top)).max(0.0)
}

/// Whether `bounds` satisfies a visibility threshold
///
/// An element taller than the viewport can never reach a high ratio, so it also
/// counts once it covers the whole viewport.
pub fn meets_threshold(bounds: Bounds, viewport: Viewport, threshold: f64) -> bool {
    let ratio = intersection_ratio(bounds, viewport);
    if ratio <= 0.0 {
        return false;
    }
    if ratio >= threshold {
        return true;
    }
    viewport.height > 0.0 && overlap(bounds, viewport) >= viewport.height
}

/// One registration of elements against a threshold
#[derive(Debug, Clone)]
pub struct ViewportObserver {
    threshold: f64,
    observed: BTreeMap<ElementId, Bounds>,
    reported: HashSet<ElementId>,
}

impl ViewportObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: BTreeMap::new(),
            reported: HashSet::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start watching an element. Re-observing replaces its bounds.
    ///
    /// An element that has already been reported stays retired.
    pub fn observe(&mut self, element: ElementId, bounds: Bounds) {
        if self.reported.contains(&element) {
            return;
        }
        self.observed.insert(element, bounds);
    }

    /// Stop watching an element; returns whether it was being watched
    pub fn unobserve(&mut self, element: ElementId) -> bool {
        self.observed.remove(&element).is_some()
    }

    /// Refresh the bounds of an element that is still being watched
    ///
    /// Elements already reported are ignored, so a relayout never re-arms them.
    pub fn update_bounds(&mut self, element: ElementId, bounds: Bounds) {
        if let Some(slot) = self.observed.get_mut(&element) {
            *slot = bounds;
        }
    }

    pub fn was_reported(&self, element: ElementId) -> bool {
        self.reported.contains(&element)
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Report every watched element that is now visible and unobserve it
    ///
    /// Events come out in registration order.
    pub fn take_visible(&mut self, viewport: Viewport) -> impl Iterator<Item = VisibilityEvent> {
        let threshold = self.threshold;
        let hits: Vec<ElementId> = self
            .observed
            .iter()
            .filter(|(_, bounds)| meets_threshold(**bounds, viewport, threshold))
            .map(|(id, _)| *id)
            .collect();

        for id in &hits {
            self.observed.remove(id);
            self.reported.insert(*id);
        }
        if !hits.is_empty() {
            debug!(
                count = hits.len(),
                remaining = self.observed.len(),
                threshold,
                "Elements became visible"
            );
        }

        hits.into_iter().map(|element| VisibilityEvent { element })
    }
}
