//! The 2D drawing surface a renderer paints onto.

use serde::{Deserialize, Serialize};

use crate::geometry::{BackingSize, LayoutSize};

/// Minimal 2D drawing primitives, in device pixels.
///
/// Fills use a single implicit white paint; brightness is carried by the
/// global alpha.
pub trait Surface {
    /// Resize the backing store while presenting at `layout` size.
    fn resize(&mut self, backing: BackingSize, layout: LayoutSize);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Fill a circular path.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64);
}

/// Shape used to paint one grid point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotShape {
    #[default]
    Square,
    Circle,
}

/// Paint one dot of `size` device pixels centered on `(x, y)` at `alpha`.
pub fn paint_dot(surface: &mut dyn Surface, x: f64, y: f64, size: f64, shape: DotShape, alpha: f64) {
    surface.set_global_alpha(alpha);
    match shape {
        DotShape::Square => surface.fill_rect(x - size / 2.0, y - size / 2.0, size, size),
        DotShape::Circle => surface.fill_circle(x, y, size / 2.0),
    }
}
