//! Cross-beams: four tapering arms leaving a central square, each with a
//! bright front travelling outward over a dotted grid.

use gasyard_core::{CrossBeamsParams, Grid, GridPoint, Surface, SurfaceGeometry, paint_dot};

use crate::animations::SKIP_ALPHA;
use crate::driver::{BuildEnv, Renderer};

/// Shortest tail, in device pixels.
const MIN_TAIL: f64 = 10.0;

/// Cross-beams renderer state for one mounted instance.
#[derive(Debug, Clone)]
pub struct CrossBeams {
    params: CrossBeamsParams,
    grid: Option<Grid>,
}

impl CrossBeams {
    pub fn new(params: CrossBeamsParams) -> Self {
        Self { params, grid: None }
    }

    pub fn params(&self) -> &CrossBeamsParams {
        &self.params
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }
}

impl Renderer for CrossBeams {
    fn build(&mut self, env: &BuildEnv, surface: &mut dyn Surface) -> bool {
        let Some(grid) = Grid::build(env.size, env.dpr, self.params.grid) else {
            return false;
        };
        surface.resize(grid.geometry.backing, grid.geometry.layout);
        self.grid = Some(grid);
        true
    }

    fn draw(&mut self, surface: &mut dyn Surface, time_ms: f64) {
        let Some(grid) = &self.grid else {
            return;
        };
        let backing = grid.geometry.backing;
        surface.clear_rect(0.0, 0.0, backing.width as f64, backing.height as f64);

        let frame = BeamsFrame::new(&self.params, &grid.geometry, time_ms);
        let size = self.params.dot_size * grid.geometry.dpr;
        for &point in &grid.points {
            let alpha = frame.alpha(point);
            if alpha <= SKIP_ALPHA {
                continue;
            }
            paint_dot(surface, point.x, point.y, size, self.params.dot_shape, alpha);
        }
        surface.set_global_alpha(1.0);
    }

    fn animates(&self) -> bool {
        self.params.running
    }

    fn release(&mut self) {
        self.grid = None;
    }
}

/// Per-frame constants of the cross-beams, in device pixels.
#[derive(Debug, Clone, Copy)]
pub struct BeamsFrame {
    cx: f64,
    cy: f64,
    base_alpha: f64,
    /// Distance of the front from the square edge.
    front: f64,
    tail: f64,
    half: f64,
    hole: f64,
    center_dot: f64,
    max_width: f64,
    beam_len: f64,
}

impl BeamsFrame {
    pub fn new(params: &CrossBeamsParams, geometry: &SurfaceGeometry, time_ms: f64) -> Self {
        let dpr = geometry.dpr;
        let sec = time_ms / 1000.0;
        let g = params.grid * dpr;
        let tail = (params.tail_px * dpr).max(MIN_TAIL);
        let front = if params.running {
            // Tiny surfaces have a negative usable radius; keep the period positive.
            let period = (geometry.radius + tail).max(tail);
            (params.speed * dpr * sec).rem_euclid(period)
        } else {
            tail
        };

        Self {
            cx: geometry.cx,
            cy: geometry.cy,
            base_alpha: params.base_alpha,
            front,
            tail,
            half: (g * 2.0).max(params.core_half_px * dpr),
            hole: (params.hole_radius_px * dpr).max(0.0),
            center_dot: g * 0.45,
            max_width: g.max(params.beam_max_width_px * dpr),
            beam_len: (g * 4.0).max(params.beam_length_px * dpr),
        }
    }

    /// Distance of the travelling front from the square edge.
    pub fn front(&self) -> f64 {
        self.front
    }

    /// Half-size of the central square.
    pub fn core_half(&self) -> f64 {
        self.half
    }

    /// Final alpha of one point: the strongest of ambient, center and arms.
    pub fn alpha(&self, point: GridPoint) -> f64 {
        let dx = point.x - self.cx;
        let dy = point.y - self.cy;
        let dist = dx.hypot(dy);

        let mut a = self.base_alpha;
        let center = if self.hole > 0.0 { self.hole } else { self.center_dot };
        if dist <= center {
            a = 1.0;
        }

        // East, west, south, north: (distance along the arm, distance off it).
        let arms = [
            (dx - self.half, dy.abs()),
            (-dx - self.half, dy.abs()),
            (dy - self.half, dx.abs()),
            (-dy - self.half, dx.abs()),
        ];
        for (along, perp) in arms {
            if let Some(arm) = self.arm(along, perp) {
                a = a.max(arm);
            }
        }
        a
    }

    /// Contribution of one arm, if the point lies inside its taper.
    fn arm(&self, along: f64, perp: f64) -> Option<f64> {
        if !(0.0..=self.beam_len).contains(&along) {
            return None;
        }
        let taper = 1.0 - along / self.beam_len;
        if perp > self.max_width * taper {
            return None;
        }
        let behind_front = self.front - along;
        if (0.0..=self.tail).contains(&behind_front) {
            Some(0.6 + 0.4 * (1.0 - behind_front / self.tail))
        } else {
            Some(0.6 * taper + 0.2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Driver;
    use crate::testing::FakeHost;
    use gasyard_core::LayoutSize;

    fn geometry() -> SurfaceGeometry {
        SurfaceGeometry::new(LayoutSize::new(600.0, 600.0), 1.0)
    }

    #[test]
    fn test_square_edge_base_alpha() {
        let params = CrossBeamsParams::default();
        let geo = geometry();
        // Front 180px out, so the square edge is not inside the 120px tail.
        let frame = BeamsFrame::new(&params, &geo, 2000.0);
        assert_eq!(frame.front(), 180.0);
        let half = frame.core_half();
        for (x, y) in [(300.0 + half, 300.0), (300.0 - half, 300.0), (300.0, 300.0 + half), (300.0, 300.0 - half)] {
            let a = frame.alpha(GridPoint { x, y });
            assert!((a - 0.8).abs() < 1e-12, "({x},{y}) -> {a}");
        }
    }

    #[test]
    fn test_front_boost_decays_over_tail() {
        let params = CrossBeamsParams::default();
        let geo = geometry();
        let frame = BeamsFrame::new(&params, &geo, 2000.0);
        let half = frame.core_half();
        // At the front: full boost.
        let at_front = frame.alpha(GridPoint { x: 300.0 + half + 180.0, y: 300.0 });
        assert!((at_front - 1.0).abs() < 1e-9);
        // Half a tail behind it.
        let mid = frame.alpha(GridPoint { x: 300.0 + half + 120.0, y: 300.0 });
        assert!((mid - 0.8).abs() < 1e-9);
        // Ahead of the front: static taper level.
        let ahead = frame.alpha(GridPoint { x: 300.0 + half + 200.0, y: 300.0 });
        let taper = 1.0 - 200.0 / 220.0;
        assert!((ahead - (0.6 * taper + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_taper_limits_width() {
        let params = CrossBeamsParams::default();
        let frame = BeamsFrame::new(&params, &geometry(), 0.0);
        let half = frame.core_half();
        // 110px out the half-width has shrunk to 12px.
        assert!(frame.alpha(GridPoint { x: 300.0 + half + 110.0, y: 311.0 }) > 0.12);
        assert_eq!(frame.alpha(GridPoint { x: 300.0 + half + 110.0, y: 313.0 }), 0.12);
        // Past the beam length only ambient remains.
        assert_eq!(frame.alpha(GridPoint { x: 300.0 + half + 221.0, y: 300.0 }), 0.12);
    }

    #[test]
    fn test_inside_square_stays_dim() {
        let params = CrossBeamsParams::default();
        let frame = BeamsFrame::new(&params, &geometry(), 0.0);
        assert_eq!(frame.alpha(GridPoint { x: 310.0, y: 305.0 }), 0.12);
        // Exact center dot is bright without a hole.
        assert_eq!(frame.alpha(GridPoint { x: 300.0, y: 300.0 }), 1.0);
    }

    #[test]
    fn test_hole_is_full_brightness() {
        let params = CrossBeamsParams {
            hole_radius_px: 13.0,
            ..Default::default()
        };
        let frame = BeamsFrame::new(&params, &geometry(), 0.0);
        assert_eq!(frame.alpha(GridPoint { x: 309.0, y: 308.0 }), 1.0);
        assert_eq!(frame.alpha(GridPoint { x: 312.0, y: 312.0 }), 0.12);
    }

    #[test]
    fn test_front_wraps() {
        let params = CrossBeamsParams::default();
        let geo = geometry();
        let period = geo.radius + 120.0;
        let t = (period + 30.0) / 90.0 * 1000.0;
        let frame = BeamsFrame::new(&params, &geo, t);
        assert!((frame.front() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_static_front_sits_at_tail() {
        let params = CrossBeamsParams {
            running: false,
            ..Default::default()
        };
        let frame = BeamsFrame::new(&params, &geometry(), 5000.0);
        assert_eq!(frame.front(), 120.0);
    }

    #[test]
    fn test_tiny_surface_keeps_positive_period() {
        let params = CrossBeamsParams::default();
        let geo = SurfaceGeometry::new(LayoutSize::new(20.0, 20.0), 1.0);
        let frame = BeamsFrame::new(&params, &geo, 12_345.0);
        assert!(frame.front().is_finite());
        assert!(frame.front() >= 0.0);
    }

    #[test]
    fn test_not_running_mounts_static() {
        let mut host = FakeHost::new(240.0, 240.0);
        let params = CrossBeamsParams {
            running: false,
            ..Default::default()
        };
        let driver = Driver::mount(CrossBeams::new(params), &mut host);
        assert_eq!(host.surface.clears, 1);
        assert!(host.requested.is_empty());
        assert_eq!(host.surface.last_frame_alphas().len(), driver.renderer().grid().unwrap().len());
    }
}
