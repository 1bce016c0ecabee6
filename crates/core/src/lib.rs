//! Shared primitives for the flick scroll interpretation engine.
//!
//! This crate knows nothing about scrollviews or input devices. It provides
//! the small, self-contained pieces the engine is built from: two-axis
//! quantities, a bounded sample log, easing curves, a critically damped
//! spring, the rubber-band resistance curve, and the frame predictor.

pub mod easing;
pub mod forgetful;
pub mod predict;
pub mod rubber;
pub mod spring;
pub mod vector;

pub use forgetful::ForgetfulLog;
pub use predict::Predictor;
pub use spring::Spring;
pub use vector::{Axis, AxisVector};
