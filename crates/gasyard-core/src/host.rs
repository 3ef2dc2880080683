//! The environment a renderer is mounted into.

use crate::geometry::LayoutSize;
use crate::surface::Surface;

/// Token for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Token for an active resize observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Host-provided collaborators: drawing surface, frame scheduling, resize
/// observation, motion preference and pixel ratio.
///
/// A host delivers frame callbacks and resize notifications one at a time
/// on the thread that owns it, by calling back into the mounted driver.
pub trait Host {
    /// The drawing surface, or `None` when no context is available.
    fn surface(&mut self) -> Option<&mut dyn Surface>;

    /// Content box of the element the surface is attached to.
    fn content_size(&self) -> LayoutSize;

    /// Width of the whole viewport, for responsive breakpoints.
    fn viewport_width(&self) -> f64;

    fn device_pixel_ratio(&self) -> f64;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start observing the element's size, or `None` when the host has no
    /// resize observation facility.
    fn observe_resize(&mut self) -> Option<ObserverHandle>;

    fn disconnect_resize(&mut self, handle: ObserverHandle);
}
