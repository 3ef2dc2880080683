//! Dotted band: a horizontal strip of dots with a seeded baseline, optional
//! twinkle frames and a slow pan.

use gasyard_core::{DotShape, DottedBandParams, LayoutSize, Surface, SurfaceGeometry, clamp01, paint_dot, rand01};

use crate::animations::SKIP_ALPHA;
use crate::driver::{BuildEnv, Renderer};

/// One dot of a band, addressed by its row and column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandDot {
    pub row: u32,
    pub col: u32,
    pub x: f64,
    pub y: f64,
    /// Baseline alpha in `[0.18, 0.8]`.
    pub base: f64,
    /// Headroom above the baseline, capped at 1.
    pub amp: f64,
}

/// Baseline alpha and twinkle amplitude of the dot at `(row, col)`.
///
/// Shared by the canvas and markup renditions so both show the same density.
pub fn baseline(row: u32, col: u32) -> (f64, f64) {
    let r = rand01(row as f64 * 92821.0 + col as f64 * 68927.0 + 101.0);
    let base = 0.18 + 0.62 * r;
    let peak = (base + 0.4).min(1.0);
    (base, (peak - base).max(0.0))
}

/// Twinkle multiplier of the dot at `(row, col)` in precomputed frame `frame`.
pub fn twinkle_multiplier(row: u32, col: u32, frame: usize, depth: f64) -> f64 {
    let r = rand01(row as f64 * 104729.0 + col as f64 * 13007.0 + (frame + 1) as f64 * 7919.0);
    // Skewed towards low values so only a few dots spike.
    let shaped = r.powf(1.6);
    clamp01(1.0 - depth + depth * (0.4 + 0.6 * shaped))
}

/// Dots covering `width x height` with spacing `g`, starting one cell
/// outside the top-left corner so panning never uncovers an edge.
pub fn layout_dots(width: f64, height: f64, g: f64, size: f64) -> Vec<BandDot> {
    let origin = (size / 2.0).max(0.0) - g;
    let mut dots = Vec::new();
    let mut row = 0u32;
    loop {
        let y = origin + row as f64 * g;
        if y >= height + g {
            break;
        }
        let mut col = 0u32;
        loop {
            let x = origin + col as f64 * g;
            if x >= width + g {
                break;
            }
            let (base, amp) = baseline(row, col);
            dots.push(BandDot {
                row,
                col,
                x,
                y,
                base,
                amp,
            });
            col += 1;
        }
        row += 1;
    }
    dots
}

/// Whole-band opacity with a linear fade at the top and bottom edges.
///
/// Applied when the band is presented, never folded into dot alphas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMask {
    pub opacity: f64,
    /// Percent of the height faded at each edge, in `[0, 49]`.
    pub fade_pct: f64,
}

impl BandMask {
    pub fn new(params: &DottedBandParams) -> Self {
        Self {
            opacity: clamp01(params.opacity),
            fade_pct: params.edge_fade(),
        }
    }

    /// Mask factor at `y_frac` (0 at the top edge, 1 at the bottom).
    pub fn factor(&self, y_frac: f64) -> f64 {
        let fade = self.fade_pct / 100.0;
        let ramp = if fade > 0.0 {
            (y_frac / fade).min((1.0 - y_frac) / fade).min(1.0)
        } else {
            1.0
        };
        clamp01(ramp) * self.opacity
    }
}

#[derive(Debug, Clone)]
struct BandLayout {
    geometry: SurfaceGeometry,
    g: f64,
    size: f64,
    dots: Vec<BandDot>,
    /// Per-dot multipliers, one vector per twinkle frame.
    frames: Vec<Vec<f64>>,
    use_frames: bool,
}

/// Canvas rendition of a dotted band.
#[derive(Debug, Clone)]
pub struct DottedBand {
    params: DottedBandParams,
    layout: Option<BandLayout>,
}

impl DottedBand {
    pub fn new(params: DottedBandParams) -> Self {
        Self { params, layout: None }
    }

    pub fn params(&self) -> &DottedBandParams {
        &self.params
    }

    pub fn mask(&self) -> BandMask {
        BandMask::new(&self.params)
    }

    /// Geometry of the widened surface, once built.
    pub fn geometry(&self) -> Option<&SurfaceGeometry> {
        self.layout.as_ref().map(|layout| &layout.geometry)
    }

    pub fn dots(&self) -> &[BandDot] {
        self.layout.as_ref().map_or(&[], |layout| &layout.dots)
    }

    pub fn frame_count(&self) -> usize {
        self.layout.as_ref().map_or(0, |layout| layout.frames.len())
    }

    /// Alpha of dot `index` under twinkle `frame`, before the mask.
    fn dot_alpha(layout: &BandLayout, index: usize, frame: Option<&[f64]>) -> f64 {
        let dot = &layout.dots[index];
        match frame {
            Some(frame) => {
                let m = frame[index];
                clamp01(dot.base * m + dot.amp * m)
            }
            None => dot.base,
        }
    }
}

impl Renderer for DottedBand {
    fn build(&mut self, env: &BuildEnv, surface: &mut dyn Surface) -> bool {
        let params = &self.params;
        if !(params.cell.is_finite() && params.cell > 0.0) {
            return false;
        }
        let height = params.resolved_height(env.viewport_width);
        if !LayoutSize::new(env.size.width, height).is_drawable() {
            return false;
        }
        let layout = LayoutSize::new(env.size.width + params.skew_extra_width(height), height);
        let geometry = SurfaceGeometry::new(layout, env.dpr);
        surface.resize(geometry.backing, geometry.layout);

        let g = params.cell * env.dpr;
        let size = (params.dot_size * env.dpr).max(1.0);
        let dots = layout_dots(geometry.backing.width as f64, geometry.backing.height as f64, g, size);

        let count = params.twinkle_patterns.floor().max(1.0) as usize;
        let depth = clamp01(params.twinkle_depth);
        let frames = (0..count)
            .map(|f| {
                dots.iter()
                    .map(|dot| twinkle_multiplier(dot.row, dot.col, f, depth))
                    .collect()
            })
            .collect();

        self.layout = Some(BandLayout {
            geometry,
            g,
            size,
            dots,
            frames,
            use_frames: params.twinkle && !env.reduced_motion,
        });
        true
    }

    fn draw(&mut self, surface: &mut dyn Surface, time_ms: f64) {
        let Some(layout) = &self.layout else {
            return;
        };
        let backing = layout.geometry.backing;
        surface.clear_rect(0.0, 0.0, backing.width as f64, backing.height as f64);

        let sec = time_ms / 1000.0;
        let dpr = layout.geometry.dpr;
        let pan_x = (sec * self.params.scroll_speed_x * dpr).rem_euclid(layout.g);
        let pan_y = (sec * self.params.scroll_speed_y * dpr).rem_euclid(layout.g);

        let frame = if layout.use_frames && !layout.frames.is_empty() {
            let fps = self.params.twinkle_fps.max(0.1);
            let index = ((sec * fps).floor().max(0.0) as usize) % layout.frames.len();
            Some(layout.frames[index].as_slice())
        } else {
            None
        };

        for (i, dot) in layout.dots.iter().enumerate() {
            let alpha = Self::dot_alpha(layout, i, frame);
            if alpha <= SKIP_ALPHA {
                continue;
            }
            paint_dot(surface, dot.x + pan_x, dot.y + pan_y, layout.size, DotShape::Square, alpha);
        }
        surface.set_global_alpha(1.0);
    }

    fn animates(&self) -> bool {
        self.params.twinkle || self.params.running
    }

    fn release(&mut self) {
        self.layout = None;
    }
}
