//! Scrollview configuration: geometry, bounce edges, options, input sources.

use bitflags::bitflags;

bitflags! {
    /// Behavior toggles for a scrollview.
    ///
    /// Unknown bits are accepted and ignored so hosts built against newer
    /// headers keep working.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Options: u32 {
        /// Large jumps from imprecise devices (stepped wheels, keyboard
        /// paging, forced jumps) animate smoothly instead of teleporting.
        const IMPRECISE_SCROLLS_SMOOTHLY = 0x1;
    }
}

/// Geometry and edge behavior of a scrollview.
///
/// Extents are in dp. The initial offset positions the top-left corner of
/// the viewport in content coordinates and is clamped into bounds at
/// creation. Each edge independently opts into overscroll bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollviewConfig {
    /// Total scrollable width.
    pub content_width: u64,
    /// Total scrollable height.
    pub content_height: u64,
    /// Visible window width.
    pub viewport_width: u64,
    /// Visible window height.
    pub viewport_height: u64,
    /// Initial horizontal offset of the viewport into the content.
    pub initial_x: i64,
    /// Initial vertical offset of the viewport into the content.
    pub initial_y: i64,
    /// Rubber-band past the top edge.
    pub bounce_top: bool,
    /// Rubber-band past the bottom edge.
    pub bounce_bottom: bool,
    /// Rubber-band past the left edge.
    pub bounce_left: bool,
    /// Rubber-band past the right edge.
    pub bounce_right: bool,
}

impl ScrollviewConfig {
    /// Creates a configuration with the given extents, no initial offset,
    /// and no bounce.
    pub fn new(
        content_width: u64,
        content_height: u64,
        viewport_width: u64,
        viewport_height: u64,
    ) -> Self {
        ScrollviewConfig {
            content_width,
            content_height,
            viewport_width,
            viewport_height,
            ..Default::default()
        }
    }

    /// Enables bounce on all four edges.
    pub fn bounce_all(mut self) -> Self {
        self.bounce_top = true;
        self.bounce_bottom = true;
        self.bounce_left = true;
        self.bounce_right = true;
        self
    }
}

/// Device interpretation mode for incoming scroll deltas.
///
/// Set this from whatever hint the platform gives about the device behind
/// the events. Getting it wrong is visible: a touchscreen interpreted as a
/// touchpad picks up an acceleration curve and the content no longer tracks
/// the finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputSource {
    /// No hint available. Behaves like [`InputSource::PassthroughKinetic`].
    #[default]
    Undefined,
    /// Direct manipulation; the content stays locked to the finger.
    Touchscreen,
    /// Two-finger scrolling with an acceleration curve applied.
    Touchpad,
    /// Discrete detents, one fixed step per unit.
    Mousewheel,
    /// High-resolution wheel reporting fractional, pixel-like deltas.
    MousewheelPrecise,
    /// Device with its own driver-side curves: trackpoint, trackball,
    /// mousekeys. Deltas are summed untouched and motion stops on release.
    Passthrough,
    /// Like [`InputSource::Passthrough`], but keeps coasting kinetically
    /// after a release.
    PassthroughKinetic,
}

impl InputSource {
    /// Maps a raw discriminant from an FFI-shaped host to a source.
    ///
    /// Unknown values fall back to [`InputSource::Undefined`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => InputSource::Touchscreen,
            2 => InputSource::Touchpad,
            3 => InputSource::Mousewheel,
            4 => InputSource::MousewheelPrecise,
            5 => InputSource::Passthrough,
            6 => InputSource::PassthroughKinetic,
            0 => InputSource::Undefined,
            other => {
                log::warn!("unknown input source {other}; treating as undefined");
                InputSource::Undefined
            }
        }
    }

    /// Whether a release event starts kinetic coasting for this source.
    pub(crate) fn keeps_kinetic(self) -> bool {
        !matches!(self, InputSource::Passthrough | InputSource::Mousewheel)
    }

    /// Sign relating raw device motion to viewport-offset motion.
    ///
    /// A touchscreen finger drags the content with it, so the viewport
    /// offset moves opposite the reported motion. Every other source already
    /// reports in scroll direction.
    pub(crate) fn offset_sign(self) -> f64 {
        match self {
            InputSource::Touchscreen => -1.0,
            _ => 1.0,
        }
    }

    /// Whether deltas are discrete detents rather than continuous motion.
    pub(crate) fn is_stepped(self) -> bool {
        matches!(self, InputSource::Mousewheel)
    }

    /// Whether the acceleration curve applies.
    pub(crate) fn is_accelerated(self) -> bool {
        matches!(self, InputSource::Touchpad)
    }
}

/// Acceleration curve parameters for touchpad motion.
///
/// The curve `f(v) = low·v + (high − low)·v²/(v + knee)` is C¹ and strictly
/// increasing: slow motion keeps near-unit gain for precision, fast motion
/// approaches `high` gain for reach, and `knee_speed` is where the transition
/// happens.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchpadCurve {
    /// Gain as speed approaches zero.
    pub low_gain: f64,
    /// Gain the curve approaches at high speed.
    pub high_gain: f64,
    /// Speed, in dp/s, at which the gain sits halfway between the two.
    pub knee_speed: f64,
}

impl Default for TouchpadCurve {
    fn default() -> Self {
        TouchpadCurve {
            low_gain: 1.0,
            high_gain: 3.0,
            knee_speed: 600.0,
        }
    }
}

impl TouchpadCurve {
    /// The gain `f(v)/v` applied to a delta moving at raw speed `speed`.
    pub fn gain(&self, speed: f64) -> f64 {
        let speed = speed.abs();

        if !speed.is_finite() || speed == 0.0 {
            return self.low_gain;
        }

        self.low_gain + (self.high_gain - self.low_gain) * speed / (speed + self.knee_speed)
    }

    /// Returns a sanitized copy: non-finite or non-positive parameters fall
    /// back to their defaults, and `high_gain` is raised to at least
    /// `low_gain` so the curve stays increasing.
    pub(crate) fn sanitized(self) -> Self {
        let default = TouchpadCurve::default();

        let low_gain = if self.low_gain.is_finite() && self.low_gain > 0.0 {
            self.low_gain
        } else {
            default.low_gain
        };
        let high_gain = if self.high_gain.is_finite() && self.high_gain > 0.0 {
            self.high_gain.max(low_gain)
        } else {
            low_gain.max(default.high_gain)
        };
        let knee_speed = if self.knee_speed.is_finite() && self.knee_speed > 0.0 {
            self.knee_speed
        } else {
            default.knee_speed
        };

        TouchpadCurve {
            low_gain,
            high_gain,
            knee_speed,
        }
    }
}
