use std::time::{Duration, Instant};

/// Cancellable auto-dismiss timer for the usage hint.
///
/// Showing the hint again replaces the deadline, so a dismissal scheduled by
/// an earlier open can never hide a hint shown by a later one.
#[derive(Debug, Clone, Default)]
pub struct HintTimer {
    deadline: Option<Instant>,
}

impl HintTimer {
    pub fn show(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Drops the deadline once it has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.deadline = None;
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Time until dismissal, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .and_then(|deadline| deadline.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINT: Duration = Duration::from_millis(2500);

    #[test]
    fn hint_expires_after_duration() {
        let start = Instant::now();
        let mut timer = HintTimer::default();
        timer.show(start, HINT);

        assert!(timer.is_visible(start + Duration::from_millis(2499)));
        timer.tick(start + Duration::from_millis(2500));
        assert!(!timer.is_visible(start + Duration::from_millis(2500)));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn reshow_replaces_pending_dismissal() {
        let start = Instant::now();
        let mut timer = HintTimer::default();
        timer.show(start, HINT);
        let later = start + Duration::from_secs(2);
        timer.show(later, HINT);

        // The first deadline has passed, the second has not.
        timer.tick(start + Duration::from_millis(2600));
        assert!(timer.is_visible(start + Duration::from_millis(2600)));
        assert_eq!(
            timer.remaining(start + Duration::from_secs(4)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn cancel_hides_immediately() {
        let start = Instant::now();
        let mut timer = HintTimer::default();
        timer.show(start, HINT);
        timer.cancel();
        assert!(!timer.is_visible(start));
    }
}
