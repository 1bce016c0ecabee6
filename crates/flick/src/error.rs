//! Errors surfaced by scrollview operations.

use flick_core::Axis;
use thiserror::Error;

/// Everything that can go wrong when configuring a scrollview.
///
/// Runtime operations (event ingest, polling) never fail; hostile numeric
/// input is sanitized instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The viewport extent is zero along the given axis.
    ///
    /// A zero-extent viewport has no geometric meaning; the scrollview keeps
    /// its previous geometry.
    #[error("invalid geometry: zero viewport extent on the {axis:?} axis")]
    ZeroViewportExtent {
        /// The offending axis.
        axis: Axis,
    },
}

/// Convenience alias for scrollview results.
pub type Result<T> = std::result::Result<T, Error>;
