//! Scroll-triggered fade-in for gallery cards.
//!
//! Cards are observed until enough of them scrolls into view, then marked
//! revealed once and never observed again.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Visible fraction of an element needed to reveal it.
pub const REVEAL_THRESHOLD: f32 = 0.1;

/// Amount the viewport's bottom edge is pulled up before testing intersection.
pub const ROOT_MARGIN_BOTTOM: f32 = 40.0;

pub const REVEAL_FADE: Duration = Duration::from_millis(600);

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn area(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0) * (self.max_y - self.min_y).max(0.0)
    }
}

/// Fraction of `item` inside `viewport` after applying the bottom root margin.
pub fn intersection_ratio(item: Bounds, viewport: Bounds) -> f32 {
    let area = item.area();
    if area <= 0.0 {
        return 0.0;
    }
    let overlap = Bounds::new(
        item.min_x.max(viewport.min_x),
        item.min_y.max(viewport.min_y),
        item.max_x.min(viewport.max_x),
        item.max_y.min(viewport.max_y - ROOT_MARGIN_BOTTOM),
    );
    overlap.area() / area
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Observed,
    Revealed(Instant),
}

/// Tracks which elements have been revealed.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    entries: HashMap<K, Entry>,
    /// When false, everything counts as revealed immediately.
    observing: bool,
}

impl<K: std::hash::Hash + Eq> Default for RevealTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::hash::Hash + Eq> RevealTracker<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            observing: true,
        }
    }

    /// Fallback used when visibility cannot be observed: every element shows
    /// at full opacity right away.
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            observing: false,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Starts watching `key`. Keys already known are left as they are.
    pub fn observe(&mut self, key: K) {
        if self.observing {
            self.entries.entry(key).or_insert(Entry::Observed);
        }
    }

    /// Reports the on-screen bounds of `key`. Returns `true` when this report
    /// revealed it.
    pub fn report(&mut self, key: &K, item: Bounds, viewport: Bounds, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        if *entry != Entry::Observed {
            return false;
        }
        if intersection_ratio(item, viewport) >= REVEAL_THRESHOLD {
            *entry = Entry::Revealed(now);
            return true;
        }
        false
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        !self.observing || matches!(self.entries.get(key), Some(Entry::Revealed(_)))
    }

    /// Opacity for `key` at `now`: 0 until revealed, then fading to 1.
    pub fn opacity(&self, key: &K, now: Instant) -> f32 {
        if !self.observing {
            return 1.0;
        }
        match self.entries.get(key) {
            Some(Entry::Revealed(at)) => {
                (now.duration_since(*at).as_secs_f32() / REVEAL_FADE.as_secs_f32()).min(1.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.entries.values().any(|entry| match entry {
            Entry::Revealed(at) => now.duration_since(*at) < REVEAL_FADE,
            Entry::Observed => false,
        })
    }

    /// Forgets every element, e.g. after the catalog was reloaded.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Bounds = Bounds::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn ratio_of_fully_visible_item_is_one() {
        let item = Bounds::new(10.0, 10.0, 110.0, 110.0);
        assert_eq!(intersection_ratio(item, SCREEN), 1.0);
    }

    #[test]
    fn bottom_margin_shrinks_viewport() {
        // 100px tall card whose top 50px sit above the viewport's bottom edge;
        // only 10px remain once the 40px margin is applied.
        let item = Bounds::new(0.0, 550.0, 100.0, 650.0);
        assert!((intersection_ratio(item, SCREEN) - 0.1).abs() < 1e-4);

        let lower = Bounds::new(0.0, 555.0, 100.0, 655.0);
        assert!(intersection_ratio(lower, SCREEN) < REVEAL_THRESHOLD);
    }

    #[test]
    fn reveals_once_at_threshold() {
        let mut tracker = RevealTracker::new();
        tracker.observe(7);
        let now = Instant::now();

        let hidden = Bounds::new(0.0, 700.0, 100.0, 800.0);
        assert!(!tracker.report(&7, hidden, SCREEN, now));
        assert!(!tracker.is_revealed(&7));
        assert_eq!(tracker.opacity(&7, now), 0.0);

        let visible = Bounds::new(0.0, 100.0, 100.0, 200.0);
        assert!(tracker.report(&7, visible, SCREEN, now));
        assert!(tracker.is_revealed(&7));

        // Revealed elements are no longer observed.
        assert!(!tracker.report(&7, visible, SCREEN, now));
        assert!(!tracker.report(&7, hidden, SCREEN, now));
        assert!(tracker.is_revealed(&7));
    }

    #[test]
    fn revealed_elements_fade_in() {
        let mut tracker = RevealTracker::new();
        tracker.observe("card");
        let now = Instant::now();
        tracker.report(&"card", Bounds::new(0.0, 0.0, 10.0, 10.0), SCREEN, now);

        assert_eq!(tracker.opacity(&"card", now), 0.0);
        assert!(tracker.is_animating(now));
        assert_eq!(tracker.opacity(&"card", now + REVEAL_FADE), 1.0);
        assert!(!tracker.is_animating(now + REVEAL_FADE));
    }

    #[test]
    fn unobserved_keys_are_ignored() {
        let mut tracker: RevealTracker<u32> = RevealTracker::new();
        let now = Instant::now();
        assert!(!tracker.report(&1, Bounds::new(0.0, 0.0, 10.0, 10.0), SCREEN, now));
    }

    #[test]
    fn fallback_reveals_everything() {
        let mut tracker = RevealTracker::unavailable();
        tracker.observe(1);
        assert!(tracker.is_revealed(&1));
        assert!(tracker.is_revealed(&2));
        assert_eq!(tracker.opacity(&2, Instant::now()), 1.0);
        assert!(!tracker.is_observing());
    }
}
