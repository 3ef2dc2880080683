//! Dotted-grid renderers.

pub mod band;
pub mod band_markup;
pub mod cross_beams;
pub mod radar;

/// Dots at or below this alpha are not painted.
pub const SKIP_ALPHA: f64 = 0.01;
