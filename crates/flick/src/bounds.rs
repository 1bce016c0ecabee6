//! Boundary enforcement: clamping, rubber-band display, bounce queries.

use flick_core::rubber;
use flick_core::{Axis, AxisVector};

use crate::config::ScrollviewConfig;

/// Per-axis scroll limits derived from geometry.
///
/// The valid range along each axis is `[0, max]` where
/// `max = content − viewport` (zero when content fits the viewport). Each
/// edge remembers whether it rubber-bands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    max: AxisVector<f64>,
    viewport: AxisVector<f64>,
    /// Left / top.
    bounce_low: AxisVector<bool>,
    /// Right / bottom.
    bounce_high: AxisVector<bool>,
}

impl Limits {
    pub fn from_config(config: &ScrollviewConfig) -> Self {
        Limits {
            max: AxisVector::new(
                config.content_width.saturating_sub(config.viewport_width) as f64,
                config.content_height.saturating_sub(config.viewport_height) as f64,
            ),
            viewport: AxisVector::new(
                config.viewport_width as f64,
                config.viewport_height as f64,
            ),
            bounce_low: AxisVector::new(config.bounce_left, config.bounce_top),
            bounce_high: AxisVector::new(config.bounce_right, config.bounce_bottom),
        }
    }

    pub fn max(&self, axis: Axis) -> f64 {
        self.max.get(axis)
    }

    /// Signed excursion beyond `[0, max]`; zero when inside.
    pub fn excess(&self, axis: Axis, position: f64) -> f64 {
        let max = self.max.get(axis);

        if position < 0.0 {
            position
        } else if position > max {
            position - max
        } else {
            0.0
        }
    }

    /// Whether the edge a given excursion crosses rubber-bands.
    pub fn bounce_allowed(&self, axis: Axis, excess: f64) -> bool {
        if excess < 0.0 {
            self.bounce_low.get(axis)
        } else {
            self.bounce_high.get(axis)
        }
    }

    /// Whether the axis can never move: content fits and neither edge
    /// bounces.
    pub fn is_locked(&self, axis: Axis) -> bool {
        self.max.get(axis) == 0.0 && !self.bounce_low.get(axis) && !self.bounce_high.get(axis)
    }

    pub fn clamp_axis(&self, axis: Axis, position: f64) -> f64 {
        position.clamp(0.0, self.max.get(axis))
    }

    pub fn clamp(&self, position: AxisVector<f64>) -> AxisVector<f64> {
        AxisVector::new(
            self.clamp_axis(Axis::Horizontal, position.x),
            self.clamp_axis(Axis::Vertical, position.y),
        )
    }

    /// The edge nearest to an out-of-bounds position.
    pub fn nearest_edge(&self, axis: Axis, position: f64) -> f64 {
        if position < 0.0 {
            0.0
        } else {
            self.max.get(axis)
        }
    }

    /// The furthest a displayed position can sit past an edge: the
    /// rubber-band asymptote.
    pub fn overscroll_limit(&self, axis: Axis) -> f64 {
        rubber::DEFAULT_COEFFICIENT * self.viewport.get(axis)
    }

    /// Maps a raw axis position to what the renderer should show.
    ///
    /// Inside bounds this is the identity. Past a bouncing edge the
    /// excursion is compressed by the rubber-band curve; past a rigid edge
    /// it is clamped.
    pub fn display_axis(&self, axis: Axis, position: f64) -> f64 {
        let excess = self.excess(axis, position);

        if excess == 0.0 {
            position
        } else if self.bounce_allowed(axis, excess) {
            let band =
                rubber::rubber_band(excess, self.viewport.get(axis), rubber::DEFAULT_COEFFICIENT);
            self.nearest_edge(axis, position) + band
        } else {
            self.clamp_axis(axis, position)
        }
    }

    /// [`Limits::display_axis`] over both axes.
    pub fn display(&self, position: AxisVector<f64>) -> AxisVector<f64> {
        AxisVector::new(
            self.display_axis(Axis::Horizontal, position.x),
            self.display_axis(Axis::Vertical, position.y),
        )
    }

    /// Recovers the raw excursion behind a displayed out-of-bounds position.
    pub fn stretch_for_display(&self, axis: Axis, position: f64) -> f64 {
        let shown = self.excess(axis, position);

        if shown != 0.0 && self.bounce_allowed(axis, shown) {
            rubber::rubber_band_inverse(shown, self.viewport.get(axis), rubber::DEFAULT_COEFFICIENT)
        } else {
            0.0
        }
    }
}
