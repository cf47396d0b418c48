use crate::core::config::ClockConfig;
use crate::core::error::{EngineError, EngineResult};
use tracing::debug;

/// Frame-to-step pacing.
///
/// The caller feeds monotonically increasing frame timestamps; elapsed
/// time, scaled by the speed multiplier, accumulates until one base step
/// worth has passed. At most one step is reported per frame, and any
/// backlog beyond the current step is dropped so a stalled tab does not
/// replay a burst of generations.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    base_step_ms: f64,
    speed: f64,
    last_timestamp: Option<f64>,
    accumulated_ms: f64,
}

impl AnimationClock {
    pub fn new(config: &ClockConfig) -> Self {
        AnimationClock {
            base_step_ms: config.base_step_ms,
            speed: config.speed,
            last_timestamp: None,
            accumulated_ms: 0.0,
        }
    }

    /// Record a frame at `timestamp_ms`; `true` when a discrete step is due.
    ///
    /// The first frame only anchors the clock. Timestamps that go
    /// backwards count as zero elapsed time.
    pub fn update(&mut self, timestamp_ms: f64) -> bool {
        if !timestamp_ms.is_finite() {
            return false;
        }
        let elapsed = match self.last_timestamp {
            Some(prev) => (timestamp_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.accumulated_ms += elapsed * self.speed;

        if self.accumulated_ms >= self.base_step_ms {
            self.accumulated_ms %= self.base_step_ms;
            true
        } else {
            false
        }
    }

    pub fn set_speed(&mut self, speed: f64) -> EngineResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(EngineError::invalid(format!(
                "animation speed must be finite and > 0, got {}",
                speed
            )));
        }
        debug!("[Clock] Speed {} -> {}", self.speed, speed);
        self.speed = speed;
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Progress toward the next step, in `[0, 1)`.
    pub fn interpolation(&self) -> f64 {
        (self.accumulated_ms / self.base_step_ms).clamp(0.0, 1.0)
    }

    /// Forget the last frame so a paused stretch is not counted.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.accumulated_ms = 0.0;
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_only_anchors() {
        let mut clock = AnimationClock::default();
        assert!(!clock.update(1_000.0));
        assert!(!clock.update(1_050.0));
        assert!(clock.update(1_100.0));
        assert!(!clock.update(1_120.0));
    }

    #[test]
    fn speed_scales_elapsed_time() {
        let mut clock = AnimationClock::default();
        clock.set_speed(4.0).unwrap();
        clock.update(0.0);
        assert!(clock.update(25.0));
        assert!(clock.update(50.0));
    }

    #[test]
    fn backlog_is_dropped() {
        let mut clock = AnimationClock::default();
        clock.update(0.0);
        assert!(clock.update(10_050.0));
        assert!(!clock.update(10_060.0));
        assert!((clock.interpolation() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let mut clock = AnimationClock::default();
        assert!(clock.set_speed(0.0).is_err());
        assert!(clock.set_speed(-1.0).is_err());
        assert!(clock.set_speed(f64::NAN).is_err());
        assert_eq!(clock.speed(), 1.0);
    }

    #[test]
    fn backwards_time_and_reset() {
        let mut clock = AnimationClock::default();
        clock.update(500.0);
        assert!(!clock.update(100.0));
        clock.reset();
        assert_eq!(clock.interpolation(), 0.0);
        assert!(!clock.update(10_000.0));
    }
}
