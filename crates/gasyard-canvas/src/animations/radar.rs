//! Radar: a dotted grid with a bright ring, a sweeping hand and optional
//! wedge, center dot and travelling waves.

use std::f64::consts::TAU;

use gasyard_core::{
    Grid, GridPoint, RadarParams, Surface, SurfaceGeometry, angular_diff, clamp01, paint_dot,
};

use crate::animations::SKIP_ALPHA;
use crate::driver::{BuildEnv, Renderer};

/// Alpha of dots outside every highlight.
const AMBIENT_ALPHA: f64 = 0.12;
/// Ring alpha when neither the wave nor the sweep animates it.
const RING_ALPHA: f64 = 1.0;
const WEDGE_ALPHA: f64 = 0.85;
const HAND_ALPHA: f64 = 0.95;

/// Radar renderer state for one mounted instance.
#[derive(Debug, Clone)]
pub struct Radar {
    params: RadarParams,
    grid: Option<Grid>,
}

impl Radar {
    pub fn new(params: RadarParams) -> Self {
        Self { params, grid: None }
    }

    pub fn params(&self) -> &RadarParams {
        &self.params
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }
}

impl Renderer for Radar {
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

        let frame = RadarFrame::new(&self.params, &grid.geometry, time_ms);
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

    fn respects_reduced_motion(&self) -> bool {
        self.params.respect_reduced_motion
    }

    fn release(&mut self) {
        self.grid = None;
    }
}

/// Per-frame constants of the radar, derived from time and geometry.
#[derive(Debug, Clone, Copy)]
pub struct RadarFrame<'a> {
    params: &'a RadarParams,
    cx: f64,
    cy: f64,
    /// Sweep angle in `[0, 2π)`.
    angle: f64,
    ux: f64,
    uy: f64,
    ring_thickness: f64,
    ring_radius: f64,
    wedge_half: f64,
    grid_spacing: f64,
    center_radius: f64,
    wave_phase: f64,
    hand_width: f64,
}

impl<'a> RadarFrame<'a> {
    pub fn new(params: &'a RadarParams, geometry: &SurfaceGeometry, time_ms: f64) -> Self {
        let dpr = geometry.dpr;
        let sec = time_ms / 1000.0;
        let angle = (sec * params.speed).rem_euclid(TAU);
        let grid_spacing = params.grid * dpr;
        let ring_radius = match params.ring_radius_px {
            Some(r) if r > 0.0 => geometry.radius.min(r * dpr),
            _ => geometry.radius,
        };
        let center_radius = match params.center_dot_radius_px {
            Some(r) if r > 0.0 => r * dpr,
            _ => grid_spacing * 0.45,
        };

        Self {
            params,
            cx: geometry.cx,
            cy: geometry.cy,
            angle,
            ux: angle.cos(),
            uy: angle.sin(),
            ring_thickness: params.ring_thickness * dpr,
            ring_radius,
            wedge_half: params.wedge_width / 2.0,
            grid_spacing,
            center_radius,
            wave_phase: sec * params.wave_speed(),
            hand_width: params.hand_width_px * dpr,
        }
    }

    /// Current sweep angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Ring radius actually drawn, in device pixels.
    pub fn ring_radius(&self) -> f64 {
        self.ring_radius
    }

    /// Final alpha of one point: the strongest contribution, then scaled.
    pub fn alpha(&self, point: GridPoint) -> f64 {
        let p = self.params;
        let dx = point.x - self.cx;
        let dy = point.y - self.cy;
        let dist = dx.hypot(dy);
        let phi = dy.atan2(dx);
        let d_ang = angular_diff(phi, self.angle).abs();

        let mut a = AMBIENT_ALPHA;
        if p.grid_wave {
            a = clamp01(AMBIENT_ALPHA + p.grid_wave_amp * (phi - self.wave_phase).cos());
        }

        if (dist - self.ring_radius).abs() <= self.ring_thickness {
            let ring = if p.ring_wave {
                // Phase grows with time, so the crest travels clockwise.
                let wave = 0.5 + 0.5 * (phi - self.wave_phase).cos();
                clamp01(p.ring_wave_base + p.ring_wave_boost * wave)
            } else if p.animate_ring {
                let falloff = (1.0 - d_ang / self.wedge_half).max(0.0);
                (0.85 + 0.18 * falloff).min(1.0)
            } else {
                RING_ALPHA
            };
            a = a.max(ring);
        }

        if p.center_dot && dist <= self.center_radius {
            a = a.max(1.0);
        }

        if p.sweep_wedge && d_ang <= self.wedge_half && dist < self.ring_radius - self.ring_thickness {
            let falloff = 1.0 - d_ang / self.wedge_half;
            a = a.max(WEDGE_ALPHA * (0.6 + 0.4 * falloff));
        }

        if p.show_hand && p.running {
            let perp = (dx * self.uy - dy * self.ux).abs();
            let along = dx * self.ux + dy * self.uy;
            // Half a cell of slack behind the center so the hand has no gap there.
            if along >= -self.grid_spacing * 0.5 && dist <= self.ring_radius && perp <= self.hand_width {
                a = a.max(HAND_ALPHA);
            }
        }

        clamp01(clamp01(a) * p.brightness_scale)
    }
}
