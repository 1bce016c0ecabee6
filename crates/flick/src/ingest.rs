//! Accumulates raw input between polls.

use std::time::Instant;

use flick_core::{AxisVector, ForgetfulLog};

/// Room for well over a frame's worth of events; a device would have to
/// outrun the render loop by an order of magnitude to overflow this.
const CAPACITY: usize = 64;

/// One conditioned motion sample, in viewport-offset dp.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sample {
    /// Arrival time of the raw event.
    pub at: Instant,
    /// Conditioned displacement.
    pub delta: AxisVector<f64>,
}

/// Gesture lifecycle signals folded into a poll window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    /// The user re-engaged the surface; cancel any ongoing motion.
    Interrupt,
    /// Last sample of the gesture; kinetic coasting may begin.
    Release,
}

/// Everything a poll consumes from the buffer.
#[derive(Debug)]
pub(crate) struct Drained {
    /// Motion samples in arrival order.
    pub samples: Vec<Sample>,
    /// Accumulated discrete detents, in viewport-offset dp.
    pub steps: AxisVector<f64>,
    /// Resolved lifecycle signal and when it was raised.
    pub signal: Option<(Signal, Instant)>,
}

/// Per-scrollview buffer of inputs received since the last poll.
///
/// Events arrive in any order and are merely recorded here; interpretation
/// happens when the controller drains the buffer. Flags are idempotent
/// within a window, keeping their first arrival time.
#[derive(Debug)]
pub(crate) struct IngestBuffer {
    samples: ForgetfulLog<Sample>,
    steps: AxisVector<f64>,
    interrupt: Option<Instant>,
    release: Option<Instant>,
}

impl IngestBuffer {
    pub fn new() -> Self {
        IngestBuffer {
            samples: ForgetfulLog::new(CAPACITY),
            steps: AxisVector::ZERO,
            interrupt: None,
            release: None,
        }
    }

    /// Records a conditioned motion sample.
    pub fn push_sample(&mut self, sample: Sample) {
        if self.samples.push(sample).is_some() {
            log::warn!("ingest buffer overflow; oldest sample dropped");
        }
    }

    /// Accumulates a discrete detent.
    pub fn push_step(&mut self, delta: AxisVector<f64>) {
        self.steps += delta;
    }

    /// Raises the interrupt flag.
    pub fn interrupt(&mut self, at: Instant) {
        self.interrupt.get_or_insert(at);
    }

    /// Raises the release flag.
    pub fn release(&mut self, at: Instant) {
        self.release.get_or_insert(at);
    }

    /// Whether nothing has arrived since the last drain.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
            && self.steps == AxisVector::ZERO
            && self.interrupt.is_none()
            && self.release.is_none()
    }

    /// Consumes the window, resolving conflicting flags.
    ///
    /// Interrupt wins over release: if both were raised, the finger lifted
    /// and came back down, which already replaced any kinetic intent.
    pub fn take(&mut self) -> Drained {
        let signal = match (self.interrupt.take(), self.release.take()) {
            (Some(at), Some(_)) => {
                log::debug!("interrupt and release in one window; release dropped");
                Some((Signal::Interrupt, at))
            }
            (Some(at), None) => Some((Signal::Interrupt, at)),
            (None, Some(at)) => Some((Signal::Release, at)),
            (None, None) => None,
        };

        Drained {
            samples: self.samples.drain().collect(),
            steps: std::mem::take(&mut self.steps),
            signal,
        }
    }
}
