//! Velocity estimation and free-motion integration.

use std::time::{Duration, Instant};

use flick_core::easing::{ease_out_cubic, ease_out_cubic_slope};
use flick_core::{AxisVector, ForgetfulLog};

use crate::ingest::Sample;

/// Time constant of post-release exponential decay, seconds.
pub(crate) const KINETIC_TAU: f64 = 0.325;

/// Speed below which kinetic motion is considered stopped, dp/s.
pub(crate) const STOP_SPEED: f64 = 10.0;

/// Duration of animated jumps and smooth wheel detents.
pub(crate) const JUMP_DURATION: Duration = Duration::from_millis(150);

/// How many recent sample intervals contribute to the velocity estimate.
const WINDOW: usize = 4;

/// Sample gaps outside this window are sensor noise or stalls, not motion.
const MIN_SAMPLE_DT: f64 = 0.001;
const MAX_SAMPLE_DT: f64 = 0.100;

/// Windowed differentiation of engaged-gesture samples.
///
/// Holds a short history of motion samples and estimates velocity as a
/// recency-weighted average of `delta/dt` over consecutive pairs, with
/// outlier intervals rejected. Devices deliver deltas unevenly; a single
/// pair is far too noisy to fling with.
#[derive(Debug)]
pub(crate) struct VelocityEstimator {
    history: ForgetfulLog<Sample>,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        VelocityEstimator {
            // One extra so WINDOW pairs survive.
            history: ForgetfulLog::new(WINDOW + 1),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.history.push(sample);
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Arrival time of the newest sample.
    pub fn last_sample_at(&self) -> Option<Instant> {
        self.history.latest().map(|sample| sample.at)
    }

    /// Current velocity estimate in offset-space dp/s.
    ///
    /// Later pairs weigh more: the gesture's most recent motion is what a
    /// release should inherit.
    pub fn estimate(&self) -> AxisVector<f64> {
        let mut weighted = AxisVector::ZERO;
        let mut total_weight = 0.0;
        let mut weight = 1.0;
        let mut previous: Option<&Sample> = None;

        for sample in self.history.iter() {
            if let Some(prev) = previous {
                let dt = sample.at.saturating_duration_since(prev.at).as_secs_f64();

                if (MIN_SAMPLE_DT..=MAX_SAMPLE_DT).contains(&dt) {
                    weighted += sample.delta * (weight / dt);
                    total_weight += weight;
                    weight += 1.0;
                }
            }
            previous = Some(sample);
        }

        if total_weight > 0.0 {
            weighted * (1.0 / total_weight)
        } else {
            AxisVector::ZERO
        }
    }
}

/// Velocity after `elapsed` seconds of free decay from `v0`.
pub(crate) fn kinetic_velocity(v0: AxisVector<f64>, elapsed: f64) -> AxisVector<f64> {
    v0 * (-elapsed / KINETIC_TAU).exp()
}

/// Distance travelled after `elapsed` seconds of free decay from `v0`.
///
/// Analytic integral of the decay, so advancing in one step or many is
/// identical: `v0·τ·(1 − e^(−t/τ))`.
pub(crate) fn kinetic_travel(v0: AxisVector<f64>, elapsed: f64) -> AxisVector<f64> {
    v0 * (KINETIC_TAU * (1.0 - (-elapsed / KINETIC_TAU).exp()))
}

/// An in-flight animated jump.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Jump {
    pub start: AxisVector<f64>,
    pub target: AxisVector<f64>,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Jump {
    pub fn new(start: AxisVector<f64>, target: AxisVector<f64>, now: Instant) -> Self {
        Jump {
            start,
            target,
            started_at: now,
            duration: JUMP_DURATION,
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn position(&self, now: Instant) -> AxisVector<f64> {
        let eased = ease_out_cubic(self.progress(now));
        self.start + (self.target - self.start) * eased
    }

    /// Instantaneous velocity of the eased motion, dp/s.
    pub fn velocity(&self, now: Instant) -> AxisVector<f64> {
        let slope = ease_out_cubic_slope(self.progress(now));
        (self.target - self.start) * (slope / self.duration.as_secs_f64())
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}
