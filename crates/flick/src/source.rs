//! Turns raw device deltas into viewport-offset motion.

use std::time::Instant;

use flick_core::AxisVector;

use crate::config::{InputSource, TouchpadCurve};

/// Displacement of one stepped-wheel detent.
pub(crate) const WHEEL_DETENT_DP: f64 = 40.0;

/// Inter-event gaps outside this window say nothing useful about speed.
const MIN_EVENT_DT: f64 = 0.001;
const MAX_EVENT_DT: f64 = 0.100;

/// A raw delta after device-specific interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Conditioned {
    /// Continuous motion that engages the gesture machinery.
    Motion(AxisVector<f64>),
    /// A discrete detent: applied instantly or animated, never engaging.
    Step(AxisVector<f64>),
}

/// Applies scale, acceleration, and detent interpretation at ingest time.
///
/// Conditioning happens when an event arrives, with whatever source, scale,
/// and curve are current; changing the source mid-gesture therefore only
/// affects subsequent events.
#[derive(Debug)]
pub(crate) struct Conditioner {
    source: InputSource,
    scale: AxisVector<f64>,
    curve: TouchpadCurve,
    last_arrival: Option<Instant>,
}

impl Conditioner {
    pub fn new() -> Self {
        Conditioner {
            source: InputSource::default(),
            scale: AxisVector::new(1.0, 1.0),
            curve: TouchpadCurve::default(),
            last_arrival: None,
        }
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn set_source(&mut self, source: InputSource) {
        self.source = source;
    }

    /// Sets the per-axis normalization factor.
    ///
    /// Non-finite or zero components are rejected and the previous value
    /// kept; negative factors are allowed (inverted-axis devices exist).
    pub fn set_scale(&mut self, fx: f64, fy: f64) {
        if fx.is_finite() && fx != 0.0 {
            self.scale.x = fx;
        } else {
            log::warn!("rejecting scale factor x={fx}");
        }
        if fy.is_finite() && fy != 0.0 {
            self.scale.y = fy;
        } else {
            log::warn!("rejecting scale factor y={fy}");
        }
    }

    pub fn set_curve(&mut self, curve: TouchpadCurve) {
        self.curve = curve.sanitized();
    }

    /// Conditions one raw delta arriving at `now`.
    pub fn condition(&mut self, now: Instant, raw: AxisVector<f64>) -> Conditioned {
        let scaled = AxisVector::new(raw.x * self.scale.x, raw.y * self.scale.y);
        let dt = self
            .last_arrival
            .map(|last| now.saturating_duration_since(last).as_secs_f64());
        self.last_arrival = Some(now);

        if self.source.is_stepped() {
            return Conditioned::Step(scaled * WHEEL_DETENT_DP);
        }

        let accelerated = if self.source.is_accelerated() {
            scaled * self.curve.gain(instantaneous_speed(scaled, dt))
        } else {
            scaled
        };

        Conditioned::Motion(accelerated * self.source.offset_sign())
    }
}

/// Raw speed of a delta given the gap since the previous event.
///
/// Gaps outside the valid window (first event of a gesture, stalls, bursts)
/// yield zero, which maps to the curve's low gain.
fn instantaneous_speed(delta: AxisVector<f64>, dt: Option<f64>) -> f64 {
    match dt {
        Some(dt) if (MIN_EVENT_DT..=MAX_EVENT_DT).contains(&dt) => delta.x.hypot(delta.y) / dt,
        _ => 0.0,
    }
}
