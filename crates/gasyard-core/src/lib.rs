//! Core types shared by the gasyard renderers and the landing page.
//!
//! Everything here is host-agnostic: sizes and grids are plain values,
//! and the drawing surface and host environment are traits implemented
//! by whoever mounts a renderer.

mod geometry;
mod host;
mod math;
mod params;
mod surface;

pub use geometry::{BackingSize, Grid, GridPoint, LayoutSize, SurfaceGeometry, effective_dpr};
pub use host::{FrameHandle, Host, ObserverHandle};
pub use math::{angular_diff, clamp01, rand01};
pub use params::{
    BandHeight, BandMode, CrossBeamsParams, DESKTOP_BREAKPOINT_PX, DottedBandParams, RadarParams,
};
pub use surface::{DotShape, Surface, paint_dot};
