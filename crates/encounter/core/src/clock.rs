//! Periodic timers driven by the simulation clock.

/// Accumulating timer that completes one round per `duration` seconds.
///
/// A completed round consumes exactly one `duration` of accumulated time and
/// carries the remainder into the next round, so variable tick lengths never
/// drift by more than a single tick. At most one round completes per call to
/// [`IntervalTimer::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTimer {
    duration: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Timer whose first round completes on the next advance.
    pub fn primed(duration: f32) -> Self {
        let mut timer = Self::new(duration);
        timer.prime();
        timer
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Adds `dt` and returns true when a round completed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.elapsed -= self.duration;
            true
        } else {
            false
        }
    }

    /// Adds `dt` without ever completing a round; the timer saturates at a
    /// full round so the next [`advance`](Self::advance) completes it.
    pub fn accumulate_saturating(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Fills the current round so the next advance completes it.
    pub fn prime(&mut self) {
        self.elapsed = self.elapsed.max(self.duration);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Seconds left in the current round.
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_round_carries_overshoot() {
        let mut timer = IntervalTimer::new(1.0);
        assert!(!timer.advance(0.75));
        assert!(timer.advance(0.5));
        assert_eq!(timer.elapsed(), 0.25);
        assert!(!timer.advance(0.5));
        assert!(timer.advance(0.25));
    }

    #[test]
    fn one_round_per_advance_even_on_large_step() {
        let mut timer = IntervalTimer::new(0.5);
        assert!(timer.advance(1.75));
        assert_eq!(timer.elapsed(), 1.25);
        assert!(timer.advance(0.0));
        assert!(timer.advance(0.0));
        assert!(!timer.advance(0.0));
    }

    #[test]
    fn saturating_accumulation_stops_at_full_round() {
        let mut timer = IntervalTimer::new(2.0);
        timer.accumulate_saturating(5.0);
        assert_eq!(timer.elapsed(), 2.0);
        assert!(timer.advance(0.0));
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn zero_duration_completes_every_advance() {
        let mut timer = IntervalTimer::new(0.0);
        assert!(timer.advance(0.0));
        assert!(timer.advance(0.016));
    }

    #[test]
    fn primed_timer_fires_immediately() {
        let mut timer = IntervalTimer::primed(3.0);
        assert_eq!(timer.remaining(), 0.0);
        assert!(timer.advance(0.0));
        assert_eq!(timer.remaining(), 3.0);
    }
}
