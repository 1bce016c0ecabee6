//! Frame-timing prediction parameters.

use std::time::{Duration, Instant};

/// Hard ceiling on either parameter; anything above this would predict
/// further than any sane compositor pipeline runs deep.
pub const CEILING_MS: f64 = 250.0;

/// Latency-compensation parameters supplied by the host.
///
/// `ms_to_vsync` is how long from a poll until the produced frame reaches the
/// screen; physics always advances to that instant so the transform describes
/// where the viewport should be *when shown*. `ms_avg_frametime` additionally
/// biases gesture tracking slightly into the future to hide one frame of
/// sampling latency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Predictor {
    ms_to_vsync: f64,
    ms_avg_frametime: f64,
}

impl Predictor {
    /// Records new parameters, sanitizing hostile values.
    ///
    /// Negative or non-finite inputs clamp to zero; values above
    /// [`CEILING_MS`] clamp to the ceiling.
    pub fn set(&mut self, ms_to_vsync: f64, ms_avg_frametime: f64) {
        self.ms_to_vsync = sanitize(ms_to_vsync);
        self.ms_avg_frametime = sanitize(ms_avg_frametime);
    }

    /// The instant physics should advance to for a poll at `now`.
    pub fn target(&self, now: Instant) -> Instant {
        now + Duration::from_secs_f64(self.ms_to_vsync / 1000.0)
    }

    /// Seconds of forward bias applied while tracking an engaged gesture.
    ///
    /// Engaged position only moves when samples arrive, so the vsync delay is
    /// not covered by advancing physics; it is folded in here together with
    /// half the average frametime (the expected sampling midpoint).
    pub fn engaged_overshoot(&self) -> f64 {
        (self.ms_to_vsync + self.ms_avg_frametime / 2.0) / 1000.0
    }
}

fn sanitize(ms: f64) -> f64 {
    if ms.is_finite() {
        ms.clamp(0.0, CEILING_MS)
    } else {
        log::warn!("non-finite predictor parameter {ms}; using 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_prediction() {
        let predictor = Predictor::default();
        let now = Instant::now();

        assert_eq!(predictor.target(now), now);
        assert_eq!(predictor.engaged_overshoot(), 0.0);
    }

    #[test]
    fn test_target_offset() {
        let mut predictor = Predictor::default();
        predictor.set(8.0, 16.0);
        let now = Instant::now();

        assert_eq!(predictor.target(now) - now, Duration::from_millis(8));
        assert!((predictor.engaged_overshoot() - 0.016).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_hostile_input() {
        let mut predictor = Predictor::default();

        predictor.set(-5.0, f64::NAN);
        let now = Instant::now();
        assert_eq!(predictor.target(now), now);
        assert_eq!(predictor.engaged_overshoot(), 0.0);

        predictor.set(10_000.0, f64::INFINITY);
        assert_eq!(predictor.target(now) - now, Duration::from_millis(250));
    }
}
