//! Fixed-timestep accumulator.
//!
//! Frame time is banked in a [`Duration`] and paid out in whole timesteps.
//! Whatever is left over carries into the next frame, so the number of
//! ticks simulated only depends on the total elapsed time, never on how it
//! was split into frames.

use std::time::Duration;

use crate::error::ConfigError;

/// Converts real frame time into a whole number of simulation ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStepClock {
    timestep: Duration,
    accumulator: Duration,
}

impl FixedStepClock {
    /// Creates a clock paying out ticks of `timestep` seconds.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTimestep`] unless `timestep` is positive
    /// and finite.
    pub fn new(timestep: f32) -> Result<Self, ConfigError> {
        let step = Duration::try_from_secs_f32(timestep)
            .map_err(|_| ConfigError::InvalidTimestep(timestep))?;
        if step.is_zero() {
            return Err(ConfigError::InvalidTimestep(timestep));
        }
        Ok(Self {
            timestep: step,
            accumulator: Duration::ZERO,
        })
    }

    /// Length of one tick.
    #[must_use]
    pub const fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Time banked but not yet simulated.
    #[must_use]
    pub const fn remainder(&self) -> Duration {
        self.accumulator
    }

    /// How far the banked time is into the next tick, in `[0, 1)`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.timestep.as_secs_f32()
    }

    /// Banks `elapsed` and returns how many ticks are now due.
    ///
    /// The due ticks are deducted from the accumulator immediately; callers
    /// must run all of them.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(elapsed);
        let mut ticks = 0_u32;
        while self.accumulator >= self.timestep {
            self.accumulator -= self.timestep;
            ticks = ticks.saturating_add(1);
        }
        ticks
    }

    /// Discards any banked time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn clock_ms(ms: u64) -> FixedStepClock {
        FixedStepClock {
            timestep: Duration::from_millis(ms),
            accumulator: Duration::ZERO,
        }
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-0.01)]
    #[case::nan(f32::NAN)]
    #[case::infinite(f32::INFINITY)]
    fn invalid_timesteps_are_rejected(#[case] timestep: f32) {
        assert!(matches!(
            FixedStepClock::new(timestep),
            Err(ConfigError::InvalidTimestep(_))
        ));
    }

    #[rstest]
    #[case::short_frame(5, 0, 5)]
    #[case::exact(10, 1, 0)]
    #[case::long_frame(35, 3, 5)]
    fn pays_out_whole_ticks(#[case] elapsed: u64, #[case] ticks: u32, #[case] left: u64) {
        let mut clock = clock_ms(10);
        assert_eq!(clock.advance(Duration::from_millis(elapsed)), ticks);
        assert_eq!(clock.remainder(), Duration::from_millis(left));
    }

    #[test]
    fn remainder_carries_between_frames() {
        let mut clock = clock_ms(10);
        assert_eq!(clock.advance(Duration::from_millis(6)), 0);
        assert_eq!(clock.advance(Duration::from_millis(6)), 1);
        assert_eq!(clock.remainder(), Duration::from_millis(2));
        assert!((clock.alpha() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn tick_count_is_independent_of_frame_split() {
        let mut whole = clock_ms(10);
        let mut split = clock_ms(10);
        let total = whole.advance(Duration::from_millis(100));
        let pieces: u32 = (0..20)
            .map(|_| split.advance(Duration::from_millis(5)))
            .sum();
        assert_eq!(total, pieces);
        assert_eq!(whole.remainder(), split.remainder());
    }

    #[test]
    fn reset_discards_banked_time() {
        let mut clock = clock_ms(10);
        clock.advance(Duration::from_millis(7));
        clock.reset();
        assert_eq!(clock.remainder(), Duration::ZERO);
    }
}
