//! Surface sizes and the centered dot grid.

/// Margin kept between the usable radius and the surface edge, in layout pixels.
const RADIUS_MARGIN_PX: f64 = 16.0;

/// Size of a host element's content box in layout pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutSize {
    pub width: f64,
    pub height: f64,
}

impl LayoutSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the element has been laid out with a drawable area.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Size of the backing store in physical (device) pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    /// Backing store for `size` at `dpr`, `floor(size * dpr)` on each axis.
    pub fn for_layout(size: LayoutSize, dpr: f64) -> Self {
        Self {
            width: (size.width * dpr).floor().max(0.0) as u32,
            height: (size.height * dpr).floor().max(0.0) as u32,
        }
    }
}

/// Clamp a reported device pixel ratio to something usable (at least 1).
pub fn effective_dpr(reported: f64) -> f64 {
    if reported.is_finite() { reported.max(1.0) } else { 1.0 }
}

/// One drawable grid position in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

/// Geometry of a sized surface, recomputed whenever the host element resizes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceGeometry {
    /// Device pixel ratio in effect when the surface was sized.
    pub dpr: f64,
    /// Layout size the surface is presented at.
    pub layout: LayoutSize,
    /// Physical size of the backing store.
    pub backing: BackingSize,
    /// Center of the backing store.
    pub cx: f64,
    pub cy: f64,
    /// Usable radius (half the short side minus a margin). May be negative
    /// for very small surfaces.
    pub radius: f64,
}

impl SurfaceGeometry {
    /// Geometry for a layout size at the given (already clamped) ratio.
    pub fn new(layout: LayoutSize, dpr: f64) -> Self {
        let backing = BackingSize::for_layout(layout, dpr);
        let width = backing.width as f64;
        let height = backing.height as f64;
        Self {
            dpr,
            layout,
            backing,
            cx: width / 2.0,
            cy: height / 2.0,
            radius: width.min(height) / 2.0 - RADIUS_MARGIN_PX * dpr,
        }
    }
}

/// Evenly spaced points covering a surface, with one point on its exact center.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub geometry: SurfaceGeometry,
    /// Spacing between neighbouring points in device pixels.
    pub spacing: f64,
    pub points: Vec<GridPoint>,
}

impl Grid {
    /// Build the grid for a host element of `size` layout pixels.
    ///
    /// Returns `None` when the element has no drawable area yet or the
    /// spacing is unusable; callers keep whatever they built before.
    pub fn build(size: LayoutSize, reported_dpr: f64, spacing: f64) -> Option<Self> {
        if !size.is_drawable() || !spacing.is_finite() || spacing <= 0.0 {
            return None;
        }

        let dpr = effective_dpr(reported_dpr);
        let geometry = SurfaceGeometry::new(size, dpr);
        let width = geometry.backing.width as f64;
        let height = geometry.backing.height as f64;
        let g = spacing * dpr;

        // Offsets chosen so that stepping from them lands on the center.
        let x0 = geometry.cx.rem_euclid(g);
        let y0 = geometry.cy.rem_euclid(g);

        let cols = count_steps(x0, width, g);
        let rows = count_steps(y0, height, g);

        let mut points = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            let y = y0 + j as f64 * g;
            for i in 0..cols {
                points.push(GridPoint {
                    x: x0 + i as f64 * g,
                    y,
                });
            }
        }

        Some(Self {
            geometry,
            spacing: g,
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Number of values `start + k * step` strictly below `limit`.
fn count_steps(start: f64, limit: f64, step: f64) -> usize {
    if start >= limit {
        return 0;
    }
    let mut n = ((limit - start) / step).ceil() as usize;
    // Guard against rounding putting the last step on the limit.
    while n > 0 && start + (n - 1) as f64 * step >= limit {
        n -= 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_contains_exact_center() {
        let grid = Grid::build(LayoutSize::new(240.0, 240.0), 1.0, 6.0).unwrap();
        let (cx, cy) = (grid.geometry.cx, grid.geometry.cy);
        assert!(grid.points.iter().any(|p| p.x == cx && p.y == cy));
    }

    #[test]
    fn test_grid_centers_odd_sizes() {
        let grid = Grid::build(LayoutSize::new(201.0, 97.0), 2.0, 10.0).unwrap();
        assert_eq!(grid.geometry.backing, BackingSize { width: 402, height: 194 });
        assert_eq!(grid.geometry.cx, 201.0);
        assert_eq!(grid.geometry.cy, 97.0);
        assert!(
            grid.points
                .iter()
                .any(|p| p.x == grid.geometry.cx && p.y == grid.geometry.cy)
        );
    }

    #[test]
    fn test_grid_is_deterministic() {
        let size = LayoutSize::new(333.0, 187.0);
        let a = Grid::build(size, 1.5, 7.0).unwrap();
        let b = Grid::build(size, 1.5, 7.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_spacing_and_bounds() {
        let grid = Grid::build(LayoutSize::new(100.0, 50.0), 1.0, 10.0).unwrap();
        // Center (50, 25): x offsets 0..=90, y offsets 5..=45.
        assert_eq!(grid.len(), 10 * 5);
        assert_eq!(grid.points[0], GridPoint { x: 0.0, y: 5.0 });
        assert!(grid.points.iter().all(|p| p.x < 100.0 && p.y < 50.0));
    }

    #[test]
    fn test_grid_scales_with_dpr() {
        let grid = Grid::build(LayoutSize::new(60.0, 60.0), 2.0, 6.0).unwrap();
        assert_eq!(grid.spacing, 12.0);
        assert_eq!(grid.geometry.radius, 60.0 - 32.0);
    }

    #[test]
    fn test_grid_rejects_unlaid_out_element() {
        assert!(Grid::build(LayoutSize::new(0.0, 100.0), 1.0, 6.0).is_none());
        assert!(Grid::build(LayoutSize::new(100.0, 0.0), 1.0, 6.0).is_none());
        assert!(Grid::build(LayoutSize::new(100.0, 100.0), 1.0, 0.0).is_none());
    }

    #[test]
    fn test_effective_dpr_floor() {
        assert_eq!(effective_dpr(0.5), 1.0);
        assert_eq!(effective_dpr(f64::NAN), 1.0);
        assert_eq!(effective_dpr(2.0), 2.0);
    }
}
