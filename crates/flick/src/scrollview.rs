//! The scrollview controller: the public-facing state machine.

use std::time::Instant;

use flick_core::{Axis, AxisVector, Predictor, Spring};

use crate::bounds::Limits;
use crate::config::{InputSource, Options, ScrollviewConfig, TouchpadCurve};
use crate::error::{Error, Result};
use crate::ingest::{IngestBuffer, Sample, Signal};
use crate::kinematics::{self, Jump, VelocityEstimator, KINETIC_TAU, STOP_SPEED};
use crate::source::{Conditioned, Conditioner};

/// Natural frequency of the bounce-back spring, rad/s.
const BOUNCE_OMEGA: f64 = 8.0;

/// A bounce spring counts as settled within this distance of its edge, dp.
const SETTLE_DISTANCE: f64 = 0.5;

/// The transform to apply to the content on this frame.
///
/// `x` and `y` are the pan since the previous report, in dp. When `panned`
/// is false nothing moved and nothing will move until another event
/// arrives, so the render loop may block on input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanTransform {
    /// Horizontal pan since the previous report.
    pub x: i64,
    /// Vertical pan since the previous report.
    pub y: i64,
    /// Whether any motion happened or is still pending.
    pub panned: bool,
    /// Current horizontal velocity in device-space dp/s.
    pub velocity_x: f64,
    /// Current vertical velocity in device-space dp/s.
    pub velocity_y: f64,
}

/// The motion regime a scrollview is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// Nothing moving, nothing pending.
    Idle,
    /// The user is actively driving motion.
    Engaged,
    /// Coasting on decaying post-release velocity.
    Kinetic,
    /// Springing back from an overscrolled edge.
    Bounce,
    /// Animating an explicit jump or smooth detent.
    Jumping,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Engaged,
    Kinetic {
        origin: AxisVector<f64>,
        v0: AxisVector<f64>,
        since: Instant,
    },
    Bounce {
        x: Spring,
        y: Spring,
    },
    Jumping(Jump),
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Engaged => PhaseKind::Engaged,
            Phase::Kinetic { .. } => PhaseKind::Kinetic,
            Phase::Bounce { .. } => PhaseKind::Bounce,
            Phase::Jumping(_) => PhaseKind::Jumping,
        }
    }
}

/// A self-contained scroll interpretation state machine.
///
/// One instance per scrollable region; all state is owned by the instance
/// and every operation completes in bounded time. See the crate docs for
/// the expected call pattern.
#[derive(Debug)]
pub struct Scrollview {
    config: ScrollviewConfig,
    limits: Limits,
    options: Options,
    conditioner: Conditioner,
    predictor: Predictor,

    /// Viewport offset into content, dp, in display space: while a bouncing
    /// edge is stretched this already carries the rubber-band compression.
    position: AxisVector<f64>,
    /// Raw overscroll excursion per axis; non-zero only while an engaged
    /// gesture holds an edge stretched.
    stretch: AxisVector<f64>,
    /// Offset-space velocity, dp/s.
    velocity: AxisVector<f64>,
    phase: Phase,
    last_advance: Option<Instant>,

    ingest: IngestBuffer,
    estimator: VelocityEstimator,

    /// Per-axis positions already handed out through delta getters.
    markers: AxisVector<f64>,
    last_poll_position: AxisVector<f64>,
    last_poll_phase: PhaseKind,
    dirty: bool,
}

impl Default for Scrollview {
    fn default() -> Self {
        Scrollview::new()
    }
}

impl Scrollview {
    /// Creates a scrollview with default (degenerate) geometry.
    ///
    /// Until [`Scrollview::set_geometry`] supplies real extents every axis
    /// is locked, so this is only a staging state.
    pub fn new() -> Self {
        let config = ScrollviewConfig::default();

        Scrollview {
            limits: Limits::from_config(&config),
            config,
            options: Options::empty(),
            conditioner: Conditioner::new(),
            predictor: Predictor::default(),
            position: AxisVector::ZERO,
            stretch: AxisVector::ZERO,
            velocity: AxisVector::ZERO,
            phase: Phase::Idle,
            last_advance: None,
            ingest: IngestBuffer::new(),
            estimator: VelocityEstimator::new(),
            markers: AxisVector::ZERO,
            last_poll_position: AxisVector::ZERO,
            last_poll_phase: PhaseKind::Idle,
            dirty: false,
        }
    }

    /// Creates a scrollview from a configuration.
    ///
    /// The initial offset is clamped into bounds and will be reported by
    /// the first poll as a pan from the origin, exactly as if
    /// [`Scrollview::force_jump`] had been called after creation.
    pub fn with_config(config: ScrollviewConfig) -> Result<Self> {
        validate(&config)?;

        let mut view = Scrollview::new();
        view.config = config;
        view.limits = Limits::from_config(&config);
        view.position = view
            .limits
            .clamp(AxisVector::new(config.initial_x as f64, config.initial_y as f64));
        view.dirty = view.position != AxisVector::ZERO;

        Ok(view)
    }

    /// Replaces the geometry, keeping the current offset where possible.
    ///
    /// This is the "geometry changed" signal: derived limits are recomputed
    /// and the position is pulled back into bounds, except past edges that
    /// bounce (those spring back on the next poll instead). A zero viewport
    /// extent is rejected and the previous geometry kept.
    pub fn set_geometry(&mut self, config: ScrollviewConfig) -> Result<()> {
        validate(&config)?;

        self.config = config;
        self.limits = Limits::from_config(&config);
        self.stretch = AxisVector::ZERO;

        for axis in Axis::BOTH {
            let value = self.position.get(axis);
            let excess = self.limits.excess(axis, value);

            if excess != 0.0 && !self.limits.bounce_allowed(axis, excess) {
                self.position.set(axis, self.limits.clamp_axis(axis, value));
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// The current configuration.
    pub fn config(&self) -> &ScrollviewConfig {
        &self.config
    }

    /// Replaces the option set.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Replaces the option set from raw bits; unknown bits are ignored.
    pub fn set_options_raw(&mut self, bits: u32) {
        self.set_options(Options::from_bits_truncate(bits));
    }

    /// Sets the per-axis normalization factor applied before conditioning.
    pub fn set_scale_factor(&mut self, fx: f64, fy: f64) {
        self.conditioner.set_scale(fx, fy);
    }

    /// Sets the device interpretation for subsequent events.
    ///
    /// Idempotent; deltas already buffered keep the interpretation they
    /// were conditioned under.
    pub fn set_input_source(&mut self, source: InputSource) {
        self.conditioner.set_source(source);
    }

    /// Replaces the touchpad acceleration curve.
    pub fn set_touchpad_curve(&mut self, curve: TouchpadCurve) {
        self.conditioner.set_curve(curve);
    }

    /// Records latency-compensation parameters; see [`flick_core::Predictor`].
    pub fn set_predict(&mut self, ms_to_vsync: f64, ms_avg_frametime: f64) {
        self.predictor.set(ms_to_vsync, ms_avg_frametime);
    }

    /// The current motion regime.
    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// True while the scrollview will keep moving without further events,
    /// so the host should keep scheduling frames.
    pub fn animating(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Engaged)
            || self.velocity != AxisVector::ZERO
            || !self.ingest.is_empty()
    }

    // --- event ingest -----------------------------------------------------

    /// Enqueues a two-axis motion delta in raw device units.
    pub fn add_scroll(&mut self, dx: i64, dy: i64) {
        self.add_scroll_at(Instant::now(), dx, dy);
    }

    /// [`Scrollview::add_scroll`] with an explicit arrival time.
    pub fn add_scroll_at(&mut self, now: Instant, dx: i64, dy: i64) {
        if dx == 0 && dy == 0 {
            return;
        }

        let raw = AxisVector::new(dx as f64, dy as f64);
        match self.conditioner.condition(now, raw) {
            Conditioned::Motion(delta) => self.ingest.push_sample(Sample { at: now, delta }),
            Conditioned::Step(delta) => self.ingest.push_step(delta),
        }
        self.dirty = true;
    }

    /// Enqueues a horizontal-only delta, for devices that split axes.
    pub fn add_scroll_x(&mut self, dx: i64) {
        self.add_scroll_at(Instant::now(), dx, 0);
    }

    /// [`Scrollview::add_scroll_x`] with an explicit arrival time.
    pub fn add_scroll_x_at(&mut self, now: Instant, dx: i64) {
        self.add_scroll_at(now, dx, 0);
    }

    /// Enqueues a vertical-only delta, for devices that split axes.
    pub fn add_scroll_y(&mut self, dy: i64) {
        self.add_scroll_at(Instant::now(), 0, dy);
    }

    /// [`Scrollview::add_scroll_y`] with an explicit arrival time.
    pub fn add_scroll_y_at(&mut self, now: Instant, dy: i64) {
        self.add_scroll_at(now, 0, dy);
    }

    /// Signals that the user re-engaged the surface: any ongoing kinetic
    /// motion is cancelled at the next poll.
    pub fn add_scroll_interrupt(&mut self) {
        self.add_scroll_interrupt_at(Instant::now());
    }

    /// [`Scrollview::add_scroll_interrupt`] with an explicit arrival time.
    pub fn add_scroll_interrupt_at(&mut self, now: Instant) {
        self.ingest.interrupt(now);
        self.dirty = true;
    }

    /// Signals the end of an engaged gesture; kinetic coasting begins if
    /// the source supports it and there was recent motion.
    pub fn add_scroll_release(&mut self) {
        self.add_scroll_release_at(Instant::now());
    }

    /// [`Scrollview::add_scroll_release`] with an explicit arrival time.
    pub fn add_scroll_release_at(&mut self, now: Instant) {
        self.ingest.release(now);
        self.dirty = true;
    }

    // --- forced motion ----------------------------------------------------

    /// Moves the viewport by a relative amount, e.g. a page-down shortcut.
    ///
    /// Animated when [`Options::IMPRECISE_SCROLLS_SMOOTHLY`] is set,
    /// instantaneous otherwise. The target is clamped into bounds.
    pub fn force_pan(&mut self, dx: i64, dy: i64) {
        self.force_pan_at(Instant::now(), dx, dy);
    }

    /// [`Scrollview::force_pan`] with an explicit time.
    pub fn force_pan_at(&mut self, now: Instant, dx: i64, dy: i64) {
        self.advance_to(now);
        let target = self
            .limits
            .clamp(self.position + AxisVector::new(dx as f64, dy as f64));
        self.force_to(target, now);
    }

    /// Moves the viewport to an absolute offset, e.g. jump-to-line.
    ///
    /// Same animation rule and clamping as [`Scrollview::force_pan`].
    pub fn force_jump(&mut self, x: i64, y: i64) {
        self.force_jump_at(Instant::now(), x, y);
    }

    /// [`Scrollview::force_jump`] with an explicit time.
    pub fn force_jump_at(&mut self, now: Instant, x: i64, y: i64) {
        self.advance_to(now);
        let target = self.limits.clamp(AxisVector::new(x as f64, y as f64));
        self.force_to(target, now);
    }

    // --- polling ----------------------------------------------------------

    /// Polls the state machine and returns the transform for this frame.
    pub fn get_pan(&mut self) -> PanTransform {
        self.get_pan_at(Instant::now())
    }

    /// [`Scrollview::get_pan`] with an explicit poll time.
    pub fn get_pan_at(&mut self, now: Instant) -> PanTransform {
        let (reported, panned) = self.poll(now);

        let dx = (reported.x - self.markers.x).round();
        let dy = (reported.y - self.markers.y).round();
        self.markers.x += dx;
        self.markers.y += dy;

        let velocity = self.reported_velocity();

        PanTransform {
            x: dx as i64,
            y: dy as i64,
            panned,
            velocity_x: velocity.x,
            velocity_y: velocity.y,
        }
    }

    /// Shorthand for [`Scrollview::set_predict`] followed by
    /// [`Scrollview::get_pan`], for hosts with highly variable frametimes.
    pub fn get_pan_predict(&mut self, ms_to_vsync: f64, ms_avg_frametime: f64) -> PanTransform {
        self.get_pan_predict_at(Instant::now(), ms_to_vsync, ms_avg_frametime)
    }

    /// [`Scrollview::get_pan_predict`] with an explicit poll time.
    pub fn get_pan_predict_at(
        &mut self,
        now: Instant,
        ms_to_vsync: f64,
        ms_avg_frametime: f64,
    ) -> PanTransform {
        self.set_predict(ms_to_vsync, ms_avg_frametime);
        self.get_pan_at(now)
    }

    /// Polls, then returns the horizontal pan since this getter last ran.
    pub fn get_pan_x(&mut self) -> i64 {
        self.get_pan_x_at(Instant::now())
    }

    /// [`Scrollview::get_pan_x`] with an explicit poll time.
    pub fn get_pan_x_at(&mut self, now: Instant) -> i64 {
        let (reported, _) = self.poll(now);
        let dx = (reported.x - self.markers.x).round();
        self.markers.x += dx;
        dx as i64
    }

    /// Polls, then returns the vertical pan since this getter last ran.
    pub fn get_pan_y(&mut self) -> i64 {
        self.get_pan_y_at(Instant::now())
    }

    /// [`Scrollview::get_pan_y`] with an explicit poll time.
    pub fn get_pan_y_at(&mut self, now: Instant) -> i64 {
        let (reported, _) = self.poll(now);
        let dy = (reported.y - self.markers.y).round();
        self.markers.y += dy;
        dy as i64
    }

    /// The absolute horizontal offset of the viewport. No side effects.
    pub fn get_pos_x(&self) -> i64 {
        self.position.x.round() as i64
    }

    /// The absolute vertical offset of the viewport. No side effects.
    pub fn get_pos_y(&self) -> i64 {
        self.position.y.round() as i64
    }

    // --- internals --------------------------------------------------------

    /// Runs the poll pipeline: advance, fold events, resolve bounds, and
    /// compute the reported position and `panned` flag.
    fn poll(&mut self, now: Instant) -> (AxisVector<f64>, bool) {
        let target = self.predictor.target(now);
        let drained = self.ingest.take();

        if let Some((Signal::Interrupt, at)) = drained.signal {
            self.apply_interrupt(at);
        }

        for sample in &drained.samples {
            self.advance_to(sample.at);
            self.apply_sample(*sample);
        }

        if drained.steps != AxisVector::ZERO {
            self.apply_steps(drained.steps, now);
        }

        if let Some((Signal::Release, at)) = drained.signal {
            self.apply_release(at);
        }

        self.advance_to(target);
        self.resolve_bounds();
        self.sanitize();

        let reported = self.reported_position();
        let kind = self.phase.kind();
        let moved = reported != self.last_poll_position || kind != self.last_poll_phase;
        let panned = moved || self.dirty || self.velocity != AxisVector::ZERO;

        self.last_poll_position = reported;
        self.last_poll_phase = kind;
        self.dirty = false;

        (reported, panned)
    }

    /// The position to report for the current state.
    ///
    /// While engaged inside bounds, the predictor's overshoot bias nudges
    /// the report to where the finger will be when the frame reaches the
    /// screen; everywhere else physics already advanced to the target time.
    fn reported_position(&self) -> AxisVector<f64> {
        if matches!(self.phase, Phase::Engaged) && self.stretch == AxisVector::ZERO {
            self.limits
                .clamp(self.position + self.velocity * self.predictor.engaged_overshoot())
        } else {
            self.position
        }
    }

    /// Velocity in device space: the sign convention raw deltas arrived in.
    fn reported_velocity(&self) -> AxisVector<f64> {
        self.velocity * self.conditioner.source().offset_sign()
    }

    /// Advances free motion (kinetic decay, bounce springs, jump easing) up
    /// to `t`. Idle and engaged states only move through samples.
    fn advance_to(&mut self, t: Instant) {
        let last = match self.last_advance {
            Some(last) => last,
            None => {
                self.last_advance = Some(t);
                return;
            }
        };
        if t <= last {
            return;
        }
        let dt = t.duration_since(last).as_secs_f64();
        self.last_advance = Some(t);

        let mut settled = false;

        match &mut self.phase {
            Phase::Idle | Phase::Engaged => {}
            Phase::Kinetic { origin, v0, since } => {
                let elapsed = t.saturating_duration_since(*since).as_secs_f64();
                self.position = *origin + kinematics::kinetic_travel(*v0, elapsed);
                self.velocity = kinematics::kinetic_velocity(*v0, elapsed);

                if self.velocity.within(STOP_SPEED) {
                    settled = true;
                }
            }
            Phase::Bounce { x, y } => {
                x.tick(dt);
                y.tick(dt);

                // The excursion stays under the rubber asymptote even when
                // a violent fling seeded the springs.
                for (axis, spring) in [(Axis::Horizontal, &mut *x), (Axis::Vertical, &mut *y)] {
                    let slack = self.limits.overscroll_limit(axis);
                    spring.position = spring
                        .position
                        .clamp(-slack, self.limits.max(axis) + slack);
                }

                self.position = AxisVector::new(x.position, y.position);
                self.velocity = AxisVector::new(x.velocity, y.velocity);

                if x.is_settled(SETTLE_DISTANCE, STOP_SPEED)
                    && y.is_settled(SETTLE_DISTANCE, STOP_SPEED)
                {
                    self.position = AxisVector::new(x.target, y.target);
                    settled = true;
                }
            }
            Phase::Jumping(jump) => {
                self.position = jump.position(t);
                self.velocity = jump.velocity(t);

                if jump.is_complete(t) {
                    self.position = jump.target;
                    settled = true;
                }
            }
        }

        if settled {
            log::trace!("motion settled; going idle");
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Idle;
        }
    }

    /// Folds one motion sample: engages the gesture and moves the viewport.
    ///
    /// Per axis, the true raw position (undoing any rubber compression) is
    /// advanced by the delta and mapped back: inside bounds it lands as-is,
    /// past a bouncing edge it stretches, past a rigid edge it clamps.
    fn apply_sample(&mut self, sample: Sample) {
        let delta = self.unlocked(sample.delta);
        if delta == AxisVector::ZERO {
            return;
        }

        if !matches!(self.phase, Phase::Engaged) {
            log::trace!("delta event; engaging from {:?}", self.phase.kind());
            self.estimator.clear();
            self.phase = Phase::Engaged;
        }

        for axis in Axis::BOTH {
            let step = delta.get(axis);
            if step == 0.0 {
                continue;
            }

            let held = self.stretch.get(axis);
            let raw = if held != 0.0 {
                self.limits.nearest_edge(axis, self.position.get(axis)) + held
            } else {
                self.position.get(axis)
            };
            let raw = raw + step;
            let excess = self.limits.excess(axis, raw);

            if excess != 0.0 && self.limits.bounce_allowed(axis, excess) {
                self.stretch.set(axis, excess);
                self.position.set(axis, self.limits.display_axis(axis, raw));
            } else {
                self.stretch.set(axis, 0.0);
                self.position.set(axis, self.limits.clamp_axis(axis, raw));
            }
        }

        self.estimator.push(Sample {
            at: sample.at,
            delta,
        });
        self.velocity = self.estimator.estimate();
    }

    /// Folds accumulated discrete detents.
    ///
    /// A detent is a command, not motion: it cancels whatever was in
    /// flight. With the smooth option it extends or starts an eased
    /// animation, otherwise it teleports.
    fn apply_steps(&mut self, steps: AxisVector<f64>, now: Instant) {
        self.advance_to(now);

        let steps = self.unlocked(steps);
        if steps == AxisVector::ZERO {
            return;
        }

        self.stretch = AxisVector::ZERO;

        if self.options.contains(Options::IMPRECISE_SCROLLS_SMOOTHLY) {
            let (start, target) = match &self.phase {
                Phase::Jumping(jump) => (jump.position(now), jump.target + steps),
                _ => (self.position, self.position + steps),
            };
            let target = self.limits.clamp(target);

            self.position = start;
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Jumping(Jump::new(start, target, now));
        } else {
            self.position = self.limits.clamp(self.position + steps);
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Idle;
        }

        self.estimator.clear();
    }

    /// Handles the interrupt signal at its arrival time.
    fn apply_interrupt(&mut self, at: Instant) {
        self.advance_to(at);

        match self.phase.kind() {
            PhaseKind::Idle => {}
            PhaseKind::Engaged => {
                // Finger came back down mid-gesture: keep the contact, drop
                // the stale velocity estimate.
                self.estimator.clear();
                self.velocity = AxisVector::ZERO;
            }
            PhaseKind::Kinetic => {
                log::trace!("kinetic motion interrupted");
                self.velocity = AxisVector::ZERO;
                self.estimator.clear();
                self.phase = Phase::Idle;
            }
            PhaseKind::Bounce | PhaseKind::Jumping => {
                // Freeze wherever the animation currently is and wait for
                // the next delta. Re-derive the raw stretch so a following
                // drag continues from the same displayed excursion.
                log::trace!("animation interrupted; freezing");
                self.velocity = AxisVector::ZERO;
                self.estimator.clear();

                for axis in Axis::BOTH {
                    self.stretch.set(
                        axis,
                        self.limits
                            .stretch_for_display(axis, self.position.get(axis)),
                    );
                }

                self.phase = Phase::Engaged;
            }
        }
    }

    /// Handles the release signal at its arrival time.
    fn apply_release(&mut self, at: Instant) {
        if !matches!(self.phase, Phase::Engaged) {
            return;
        }
        self.advance_to(at);

        // A gesture that stalled before lifting has no momentum left.
        let recent = self
            .estimator
            .last_sample_at()
            .is_some_and(|t| at.saturating_duration_since(t).as_secs_f64() <= 0.1);
        let velocity = if recent {
            self.estimator.estimate()
        } else {
            AxisVector::ZERO
        };
        self.estimator.clear();

        if self.stretch != AxisVector::ZERO {
            // A stretched edge takes priority over coasting: spring back
            // from the displayed excursion.
            self.stretch = AxisVector::ZERO;
            self.velocity = velocity;
            self.enter_bounce();
        } else if self.conditioner.source().keeps_kinetic() && !velocity.within(STOP_SPEED) {
            log::trace!(
                "released at {:.0} dp/s; coasting",
                velocity.x.hypot(velocity.y)
            );
            self.velocity = velocity;
            self.phase = Phase::Kinetic {
                origin: self.position,
                v0: velocity,
                since: at,
            };
        } else {
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Idle;
        }
    }

    fn force_to(&mut self, target: AxisVector<f64>, now: Instant) {
        self.estimator.clear();
        self.stretch = AxisVector::ZERO;

        if self.options.contains(Options::IMPRECISE_SCROLLS_SMOOTHLY) && target != self.position {
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Jumping(Jump::new(self.position, target, now));
        } else {
            self.position = target;
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Idle;
        }

        self.dirty = true;
    }

    /// Enforces boundaries after physics has proposed a position.
    fn resolve_bounds(&mut self) {
        let mut bounce_pending = false;

        for axis in Axis::BOTH {
            let value = self.position.get(axis);
            let excess = self.limits.excess(axis, value);

            if excess == 0.0 {
                continue;
            }

            if !self.limits.bounce_allowed(axis, excess) {
                let clamped = self.limits.clamp_axis(axis, value);
                self.position.set(axis, clamped);
                self.velocity.set(axis, 0.0);

                // Keep analytic phases consistent with the clamp.
                match &mut self.phase {
                    Phase::Kinetic { origin, v0, .. } => {
                        origin.set(axis, clamped);
                        v0.set(axis, 0.0);
                    }
                    Phase::Bounce { x, y } => {
                        let spring = match axis {
                            Axis::Horizontal => x,
                            Axis::Vertical => y,
                        };
                        spring.position = clamped;
                        spring.velocity = 0.0;
                    }
                    _ => {}
                }
            } else if !matches!(
                self.phase,
                Phase::Engaged | Phase::Bounce { .. } | Phase::Jumping(_)
            ) {
                // Free motion crossed a bouncing edge: hand over to the
                // spring. Engaged overscroll is handled at fold time and
                // jump targets are clamped at creation.
                bounce_pending = true;
            }
        }

        if bounce_pending {
            // Free overshoot feels the same resistance a finger would.
            self.position = self.limits.display(self.position);
            self.enter_bounce();
        }

        // A fully clamped fling has nothing left to decay.
        if matches!(self.phase, Phase::Kinetic { .. }) && self.velocity.within(STOP_SPEED) {
            self.velocity = AxisVector::ZERO;
            self.phase = Phase::Idle;
        }
    }

    /// Switches to the bounce phase with springs seeded from the current
    /// position and velocity.
    ///
    /// An out-of-bounds axis springs to its nearest edge; an in-bounds axis
    /// eases to where its remaining momentum would have taken it.
    fn enter_bounce(&mut self) {
        log::trace!("entering bounce at {:?}", self.position);

        let spring_for = |axis: Axis, position: f64, velocity: f64, limits: &Limits| {
            let mut spring = Spring::new(position, BOUNCE_OMEGA);
            let target = if limits.excess(axis, position) != 0.0 {
                limits.nearest_edge(axis, position)
            } else {
                limits.clamp_axis(axis, position + velocity * KINETIC_TAU)
            };
            spring.pull_toward(target).with_velocity(velocity);
            spring
        };

        self.phase = Phase::Bounce {
            x: spring_for(
                Axis::Horizontal,
                self.position.x,
                self.velocity.x,
                &self.limits,
            ),
            y: spring_for(
                Axis::Vertical,
                self.position.y,
                self.velocity.y,
                &self.limits,
            ),
        };
    }

    /// Zeroes delta components along axes that can never move.
    fn unlocked(&self, mut delta: AxisVector<f64>) -> AxisVector<f64> {
        for axis in Axis::BOTH {
            if self.limits.is_locked(axis) {
                delta.set(axis, 0.0);
            }
        }
        delta
    }

    /// Last line of defense against numerical garbage: a non-finite
    /// position or velocity resets motion entirely.
    fn sanitize(&mut self) {
        if self.position.is_finite() && self.velocity.is_finite() {
            return;
        }

        log::warn!(
            "non-finite state (position {:?}, velocity {:?}); resetting",
            self.position,
            self.velocity
        );

        self.position = self
            .limits
            .clamp(self.position.map(|v| if v.is_finite() { v } else { 0.0 }));
        self.stretch = AxisVector::ZERO;
        self.velocity = AxisVector::ZERO;
        self.phase = Phase::Idle;
        self.estimator.clear();
    }
}

fn validate(config: &ScrollviewConfig) -> Result<()> {
    if config.viewport_width == 0 {
        return Err(Error::ZeroViewportExtent {
            axis: Axis::Horizontal,
        });
    }
    if config.viewport_height == 0 {
        return Err(Error::ZeroViewportExtent {
            axis: Axis::Vertical,
        });
    }
    Ok(())
}
