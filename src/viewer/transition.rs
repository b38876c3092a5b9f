use std::time::{Duration, Instant};

use super::transform::Transform;
use crate::easing::{CubicBezier, lerp};

/// Eases the displayed transform toward the applied one.
///
/// The start instant is latched on the first frame that samples the
/// transition, so a transform applied between frames starts animating when it
/// is first drawn.
#[derive(Debug, Clone)]
pub struct Transition {
    from: Transform,
    to: Transform,
    started: Option<Instant>,
    duration: Duration,
}

impl Transition {
    pub fn snap(to: Transform) -> Self {
        Self {
            from: to,
            to,
            started: None,
            duration: Duration::ZERO,
        }
    }

    pub fn animate(from: Transform, to: Transform, duration: Duration) -> Self {
        Self {
            from,
            to,
            started: None,
            duration,
        }
    }

    /// Transform to draw at `now`.
    pub fn sample(&mut self, now: Instant) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let eased = CubicBezier::VIEWER.apply(t);
        Transform {
            scale: lerp(self.from.scale, self.to.scale, eased),
            pan_x: lerp(self.from.pan_x, self.to.pan_x, eased),
            pan_y: lerp(self.from.pan_y, self.to.pan_y, eased),
        }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.duration > Duration::ZERO
            && self
                .started
                .is_none_or(|started| now.duration_since(started) < self.duration)
    }

    fn progress(&mut self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let started = *self.started.get_or_insert(now);
        (now.duration_since(started).as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(scale: f32, pan_x: f32) -> Transform {
        Transform {
            scale,
            pan_x,
            pan_y: 0.0,
        }
    }

    #[test]
    fn snap_returns_target() {
        let mut transition = Transition::snap(transform(2.0, 10.0));
        assert_eq!(transition.sample(Instant::now()), transform(2.0, 10.0));
        assert!(!transition.is_running(Instant::now()));
    }

    #[test]
    fn animation_starts_at_first_sample() {
        let from = transform(1.0, 0.0);
        let to = transform(2.0, 100.0);
        let mut transition = Transition::animate(from, to, Duration::from_millis(300));

        let first = Instant::now() + Duration::from_secs(5);
        assert_eq!(transition.sample(first), from);

        let mid = transition.sample(first + Duration::from_millis(150));
        assert!(mid.scale > 1.0 && mid.scale < 2.0);
        assert!(transition.is_running(first + Duration::from_millis(150)));

        assert_eq!(transition.sample(first + Duration::from_millis(300)), to);
        assert!(!transition.is_running(first + Duration::from_millis(300)));
    }
}
