use tracing::{debug, warn};

use crate::selector::AnimationSelector;

/// Steps an [`AnimationSelector`] to the next clip every `wait_time` seconds.
#[derive(Debug, Clone)]
pub struct AutoCycle {
    wait_time: f32,
    elapsed: f32,
}

impl Default for AutoCycle {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl AutoCycle {
    /// Non-finite or non-positive wait times fall back to the smallest positive interval.
    pub fn new(wait_time: f32) -> Self {
        let wait_time = if wait_time.is_finite() { wait_time } else { f32::EPSILON };
        Self {
            wait_time: wait_time.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    /// Advance the timer by `delta` seconds. Returns how many wait periods elapsed,
    /// saturating at `u32::MAX`; the selector is advanced by that many steps at once.
    ///
    /// Negative, NaN and infinite deltas are ignored.
    pub fn tick<M>(&mut self, delta: f32, selector: &mut AnimationSelector<M>) -> u32 {
        if !delta.is_finite() {
            warn!("Ignoring non-finite frame delta {}", delta);
            return 0;
        }
        if delta <= 0.0 {
            return 0;
        }

        let elapsed = self.elapsed + delta;
        // `as` saturates, and the remainder is always below `wait_time`.
        let periods = (elapsed / self.wait_time).floor() as u32;
        self.elapsed = if elapsed.is_finite() { elapsed % self.wait_time } else { 0.0 };
        if periods == 0 {
            return 0;
        }

        // An idle selector reports the underflow itself; keep the timer running.
        match selector.advance(periods as usize) {
            Ok(selection) => {
                debug!("Auto-cycled {} steps to animation slot {}", periods, selection.slot);
                periods
            }
            Err(_) => 0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wait_is_three_seconds() {
        assert!((AutoCycle::default().wait_time() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn advances_once_per_wait_time() {
        let mut selector = AnimationSelector::new();
        selector.init(vec!["idle", "walk", "run"]).unwrap();
        let mut cycle = AutoCycle::new(3.0);

        assert_eq!(cycle.tick(2.0, &mut selector), 0);
        assert_eq!(selector.index(), Some(0));
        assert_eq!(cycle.tick(1.5, &mut selector), 1);
        assert_eq!(*selector.current().unwrap().material, "walk");
        assert_eq!(cycle.tick(6.0, &mut selector), 2);
        assert_eq!(*selector.current().unwrap().material, "idle");
    }

    #[test]
    fn huge_delta_advances_in_one_step() {
        let mut selector = AnimationSelector::new();
        selector.init(vec!["idle", "walk", "run"]).unwrap();
        let mut cycle = AutoCycle::new(3.0);

        let expected = (1.0e9_f32 / 3.0).floor() as u32;
        assert_eq!(cycle.tick(1.0e9, &mut selector), expected);
        assert_eq!(selector.index(), Some(expected as usize));
        assert!(cycle.elapsed() < cycle.wait_time());
    }

    #[test]
    fn step_count_saturates() {
        let mut selector = AnimationSelector::new();
        selector.init(vec!["idle", "walk"]).unwrap();
        let mut cycle = AutoCycle::new(1.0);
        assert_eq!(cycle.tick(f32::MAX, &mut selector), u32::MAX);
        assert!(cycle.elapsed() < cycle.wait_time());
    }

    #[test]
    fn non_finite_and_negative_deltas_are_ignored() {
        let mut selector = AnimationSelector::new();
        selector.init(vec!["idle", "walk"]).unwrap();
        let mut cycle = AutoCycle::new(1.0);

        assert_eq!(cycle.tick(f32::INFINITY, &mut selector), 0);
        assert_eq!(cycle.tick(f32::NAN, &mut selector), 0);
        assert_eq!(cycle.tick(-4.0, &mut selector), 0);
        assert_eq!(cycle.elapsed(), 0.0);
        assert_eq!(selector.index(), Some(0));
        assert_eq!(cycle.tick(1.0, &mut selector), 1);
    }

    #[test]
    fn non_finite_wait_time_is_clamped() {
        assert_eq!(AutoCycle::new(f32::NAN).wait_time(), f32::EPSILON);
        assert_eq!(AutoCycle::new(-1.0).wait_time(), f32::EPSILON);
    }

    #[test]
    fn idle_selector_is_left_alone() {
        let mut selector = AnimationSelector::<&str>::new();
        let mut cycle = AutoCycle::new(1.0);
        assert_eq!(cycle.tick(5.0, &mut selector), 0);
        assert!(!selector.is_active());
    }
}
