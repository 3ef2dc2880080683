//! Dotted-grid canvas animations for the gasyard landing page.
//!
//! Three renderers (radar sweep, cross-beams, dotted band) paint onto any
//! [`gasyard_core::Surface`]; a [`Driver`] mounts one on a
//! [`gasyard_core::Host`] and keeps it painted frame by frame. The
//! [`CellSurface`] rasterises paint calls into terminal cells.

mod animations;
mod color;
mod driver;
mod terminal;

#[cfg(test)]
mod testing;

pub use animations::SKIP_ALPHA;
pub use animations::band::{BandDot, BandMask, DottedBand, baseline, twinkle_multiplier};
pub use animations::band_markup::{DotElement, Easing, KEYFRAMES_NAME, MarkupBand};
pub use animations::cross_beams::{BeamsFrame, CrossBeams};
pub use animations::radar::{Radar, RadarFrame};
pub use color::{Tint, blend, shade};
pub use driver::{BuildEnv, Driver, DriverState, Renderer};
pub use terminal::{CellSurface, Presentation};
