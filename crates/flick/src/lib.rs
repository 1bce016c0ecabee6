//! flick is an input-event interpretation engine for scrollable viewports.
//!
//! Raw scroll and pan events come in many shapes: touchscreen drags locked to
//! the finger, accelerated touchpad motion, discrete mouse-wheel detents,
//! high-resolution wheels, and pass-through devices that bring their own
//! driver curves. flick turns all of them into one thing the renderer can
//! use on every frame: a pan transform telling it how far to move the content
//! under the viewport, plus the current velocity for overscroll feedback.
//!
//! # Usage
//!
//! 1. Create a [`Scrollview`], either with defaults or from a
//!    [`ScrollviewConfig`] describing content and viewport geometry.
//!
//! 2. Tell it what is producing events with [`Scrollview::set_input_source`]
//!    and, if frametimes are known, call [`Scrollview::set_predict`] so pans
//!    land where the viewport will be when the frame is shown.
//!
//! 3. In the event loop, forward device events as they arrive through
//!    [`Scrollview::add_scroll`], [`Scrollview::add_scroll_interrupt`], and
//!    [`Scrollview::add_scroll_release`]. No ordering or batching is
//!    required.
//!
//! 4. On every render tick, call [`Scrollview::get_pan`] (or the per-axis
//!    delta getters) and apply the returned transform. While
//!    [`PanTransform::panned`] is false the render loop may block: nothing
//!    will move until another event arrives.
//!
//! Each scrollview is an independent state machine with no shared state;
//! one instance must be driven from one owner at a time.
//!
//! Hosts that schedule their own frame clock can use the `_at` variants
//! ([`Scrollview::get_pan_at`], [`Scrollview::add_scroll_at`], …) to supply
//! an explicit [`std::time::Instant`] instead of sampling `Instant::now()`.

mod bounds;
mod config;
mod error;
mod ingest;
mod kinematics;
mod scrollview;
mod source;

#[cfg(test)]
mod tests;

pub use config::{InputSource, Options, ScrollviewConfig, TouchpadCurve};
pub use error::{Error, Result};
pub use scrollview::{PanTransform, PhaseKind, Scrollview};
