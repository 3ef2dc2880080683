//! A drawing surface backed by terminal cells.
//!
//! Each cell holds two square sub-pixels (upper and lower half block), so a
//! panel of `cols x rows` cells rasterises to `cols x rows*2` sub-pixels.
//! Paint calls land on the sub-pixels with source-over alpha compositing;
//! presenting maps them onto a ratatui [`Buffer`] in a single tint.

use gasyard_core::{BackingSize, LayoutSize, Surface};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};

use crate::animations::band::BandMask;
use crate::color::{Tint, shade};

const UPPER_HALF: &str = "▀";

/// How a rasterised surface is put on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Presentation {
    pub tint: Tint,
    /// Edge fade and opacity of a dotted band.
    pub mask: Option<BandMask>,
    /// Columns each row is shifted right of the row below it. A non-zero
    /// slant clips the area to a parallelogram, as for a skewed slab.
    pub slant: f64,
}

/// Sub-pixel raster behind one terminal panel.
#[derive(Debug, Clone)]
pub struct CellSurface {
    cell_width_px: f64,
    cell_height_px: f64,
    cols: usize,
    rows: usize,
    backing: BackingSize,
    layout: LayoutSize,
    /// Coverage of each sub-pixel in `[0, 1]`, row-major.
    pixels: Vec<f64>,
    alpha: f64,
}

impl CellSurface {
    /// An empty surface mapping `cell_width_px x cell_height_px` layout
    /// pixels onto each terminal cell.
    pub fn new(cell_width_px: f64, cell_height_px: f64) -> Self {
        Self {
            cell_width_px,
            cell_height_px,
            cols: 0,
            rows: 0,
            backing: BackingSize::default(),
            layout: LayoutSize::default(),
            pixels: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn layout(&self) -> LayoutSize {
        self.layout
    }

    fn sub_height(&self) -> usize {
        self.rows * 2
    }

    /// Coverage of the sub-pixel at column `x`, sub-row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> f64 {
        if x >= self.cols || y >= self.sub_height() {
            return 0.0;
        }
        self.pixels[y * self.cols + x]
    }

    /// Sub-pixels per device pixel on each axis.
    fn scale(&self) -> Option<(f64, f64)> {
        if self.backing.width == 0 || self.backing.height == 0 || self.pixels.is_empty() {
            return None;
        }
        Some((
            self.cols as f64 / self.backing.width as f64,
            self.sub_height() as f64 / self.backing.height as f64,
        ))
    }

    /// Composite a `width x height` device-pixel rectangle at the current alpha.
    fn cover(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some((sx, sy)) = self.scale() else {
            return;
        };
        if !(width > 0.0 && height > 0.0) || self.alpha <= 0.0 {
            return;
        }
        let (x0, x1) = (x * sx, (x + width) * sx);
        let (y0, y1) = (y * sy, (y + height) * sy);
        // A dot smaller than a sub-pixel lights it fully instead of vanishing.
        let norm = ((x1 - x0) * (y1 - y0)).min(1.0);

        let col_start = x0.floor().max(0.0) as usize;
        let col_end = (x1.ceil().max(0.0) as usize).min(self.cols);
        let row_start = y0.floor().max(0.0) as usize;
        let row_end = (y1.ceil().max(0.0) as usize).min(self.sub_height());

        for j in row_start..row_end {
            let dy = y1.min(j as f64 + 1.0) - y0.max(j as f64);
            if dy <= 0.0 {
                continue;
            }
            for i in col_start..col_end {
                let dx = x1.min(i as f64 + 1.0) - x0.max(i as f64);
                if dx <= 0.0 {
                    continue;
                }
                let a = (self.alpha * (dx * dy / norm).min(1.0)).clamp(0.0, 1.0);
                let p = &mut self.pixels[j * self.cols + i];
                *p += a * (1.0 - *p);
            }
        }
    }

    /// Put the raster on screen inside `area`.
    ///
    /// A surface wider than `area` is centered; only cells with some
    /// coverage are written, so whatever is beneath shows through.
    pub fn render(&self, buf: &mut Buffer, area: Rect, presentation: &Presentation) {
        let sub_height = self.sub_height() as f64;
        let offset = (self.cols as i64 - area.width as i64).max(0) / 2;
        let factor = |sub_row: usize| match presentation.mask {
            Some(mask) => mask.factor((sub_row as f64 + 0.5) / sub_height),
            None => 1.0,
        };
        let slant = if presentation.slant.is_finite() { presentation.slant.max(0.0) } else { 0.0 };
        let body = area.width as f64 - slant * area.height.saturating_sub(1) as f64;

        for r in 0..(area.height as usize).min(self.rows) {
            let lead = slant * (area.height as usize - 1 - r) as f64;
            let (first, last) = (lead.round() as i64, (lead + body).round() as i64);
            for c in 0..area.width {
                if (c as i64) < first || (c as i64) >= last {
                    continue;
                }
                let src = c as i64 + offset;
                if src >= self.cols as i64 {
                    continue;
                }
                let src = src as usize;
                let top = self.pixel(src, 2 * r) * factor(2 * r);
                let bottom = self.pixel(src, 2 * r + 1) * factor(2 * r + 1);
                if top <= 0.0 && bottom <= 0.0 {
                    continue;
                }
                let position = Position::new(area.x + c, area.y + r as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol(UPPER_HALF)
                        .set_fg(shade(presentation.tint, top))
                        .set_bg(shade(presentation.tint, bottom));
                }
            }
        }
    }
}

impl Surface for CellSurface {
    fn resize(&mut self, backing: BackingSize, layout: LayoutSize) {
        let cells = |px: f64, cell: f64| {
            let n = (px / cell).round();
            if n.is_finite() && n > 0.0 { n as usize } else { 0 }
        };
        self.cols = cells(layout.width, self.cell_width_px);
        self.rows = cells(layout.height, self.cell_height_px);
        self.backing = backing;
        self.layout = layout;
        self.pixels = vec![0.0; self.cols * self.rows * 2];
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some((sx, sy)) = self.scale() else {
            return;
        };
        let cols = self.cols;
        for (index, p) in self.pixels.iter_mut().enumerate() {
            let cx = ((index % cols) as f64 + 0.5) / sx;
            let cy = ((index / cols) as f64 + 0.5) / sy;
            if cx >= x && cx < x + width && cy >= y && cy < y + height {
                *p = 0.0;
            }
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.cover(x, y, width, height);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        // Square of equal area.
        let side = radius * std::f64::consts::PI.sqrt();
        self.cover(cx - side / 2.0, cy - side / 2.0, side, side);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn surface() -> CellSurface {
        let mut surface = CellSurface::new(6.0, 12.0);
        let layout = LayoutSize::new(240.0, 240.0);
        surface.resize(BackingSize::for_layout(layout, 1.0), layout);
        surface
    }

    #[test]
    fn test_resize_maps_cells() {
        let surface = surface();
        assert_eq!((surface.cols(), surface.rows()), (40, 20));
        assert_eq!(surface.pixel(39, 39), 0.0);
        assert_eq!(surface.pixel(40, 0), 0.0);
    }

    #[test]
    fn test_small_dot_lights_its_sub_pixel() {
        let mut surface = surface();
        surface.set_global_alpha(0.8);
        surface.fill_rect(2.0, 2.0, 2.0, 2.0);
        assert!((surface.pixel(0, 0) - 0.8).abs() < 1e-9);
        assert_eq!(surface.pixel(1, 0), 0.0);
    }

    #[test]
    fn test_source_over() {
        let mut surface = surface();
        surface.set_global_alpha(0.5);
        surface.fill_rect(6.0, 6.0, 6.0, 6.0);
        surface.fill_rect(6.0, 6.0, 6.0, 6.0);
        assert!((surface.pixel(1, 1) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_large_rect_splits_coverage() {
        let mut surface = surface();
        surface.set_global_alpha(1.0);
        // 6x6 straddling four sub-pixels evenly.
        surface.fill_rect(3.0, 3.0, 6.0, 6.0);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!((surface.pixel(x, y) - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clear() {
        let mut surface = surface();
        surface.set_global_alpha(1.0);
        surface.fill_rect(0.0, 0.0, 240.0, 240.0);
        assert!((surface.pixel(20, 20) - 1.0).abs() < 1e-9);
        surface.clear_rect(0.0, 0.0, 240.0, 240.0);
        assert_eq!(surface.pixel(20, 20), 0.0);
    }

    #[test]
    fn test_render_half_blocks() {
        let mut surface = surface();
        surface.set_global_alpha(0.5);
        surface.fill_rect(0.0, 0.0, 6.0, 6.0);
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        surface.render(&mut buf, area, &Presentation::default());

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(128, 128, 128));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 0));
        // Untouched cells are left alone.
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }

    #[test]
    fn test_render_centers_wide_surface() {
        let mut surface = CellSurface::new(6.0, 12.0);
        let layout = LayoutSize::new(300.0, 24.0);
        surface.resize(BackingSize::for_layout(layout, 1.0), layout);
        assert_eq!(surface.cols(), 50);
        surface.set_global_alpha(1.0);
        // Sub-pixel column 5 is the first visible one in a 40-wide area.
        surface.fill_rect(30.0, 0.0, 6.0, 6.0);
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);
        surface.render(&mut buf, area, &Presentation::default());
        assert_eq!(buf[(0, 0)].symbol(), UPPER_HALF);
    }

    #[test]
    fn test_slant_clips_to_parallelogram() {
        let mut surface = CellSurface::new(6.0, 12.0);
        let layout = LayoutSize::new(60.0, 36.0);
        surface.resize(BackingSize::for_layout(layout, 1.0), layout);
        surface.set_global_alpha(1.0);
        surface.fill_rect(0.0, 0.0, 60.0, 36.0);
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let presentation = Presentation {
            slant: 2.0,
            ..Default::default()
        };
        surface.render(&mut buf, area, &presentation);
        let row = |y: u16| -> String { (0..10).map(|x| if buf[(x, y)].symbol() == UPPER_HALF { '#' } else { '.' }).collect() };
        assert_eq!(row(0), "....######");
        assert_eq!(row(1), "..######..");
        assert_eq!(row(2), "######....");
    }

    #[test]
    fn test_mask_dims_edges() {
        let mut surface = surface();
        surface.set_global_alpha(1.0);
        surface.fill_rect(0.0, 0.0, 240.0, 240.0);
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let presentation = Presentation {
            mask: Some(BandMask {
                opacity: 1.0,
                fade_pct: 25.0,
            }),
            ..Default::default()
        };
        surface.render(&mut buf, area, &presentation);
        let Color::Rgb(edge, _, _) = buf[(0, 0)].fg else {
            panic!("expected rgb");
        };
        let Color::Rgb(middle, _, _) = buf[(0, 10)].fg else {
            panic!("expected rgb");
        };
        assert!(edge < middle);
        assert_eq!(middle, 255);
    }
}
