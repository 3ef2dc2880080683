//! Feature blocks: one dotted canvas per block beside its title and copy.

use gasyard_canvas::{CrossBeams, Presentation, Radar};
use gasyard_config::FeatureCanvases;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use super::{FOREGROUND, PaintCtx, content_column};
use crate::panel::{CanvasPanel, PanelEnv};

const FEATURES: [(&str, &str); 3] = [
    (
        "SUB-7S FINALITY",
        "Settlement completes on the destination chain in under seven seconds under normal network conditions.",
    ),
    (
        "SOLVER-POWERED EXECUTION",
        "Aggregated solvers compete to fulfill intents optimally, minimizing user friction and failures.",
    ),
    (
        "UNIVERSAL LIQUIDITY",
        "Tap into cross-chain liquidity sources to reserve assets and gas where and when you need it.",
    ),
];

/// Square canvas edge in layout pixels.
const CANVAS_PX: f64 = 240.0;
/// Narrowest column that fits canvas and copy side by side.
const SIDE_BY_SIDE_COLS: u16 = 128;
const BORDER: Color = Color::Rgb(38, 38, 38);

/// Rows `text` takes when wrapped to `width` columns, rounded up generously.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let chars = text.chars().count() as u16;
    chars.div_ceil(width) + 1
}

#[derive(Debug, Default, Clone, Copy)]
struct BlockLayout {
    frame: Rect,
    canvas: Rect,
    title: Rect,
    subtitle: Rect,
}

#[derive(Debug)]
pub struct Features {
    canvases: FeatureCanvases,
    paused: bool,
    radar: CanvasPanel<Radar>,
    beams: CanvasPanel<CrossBeams>,
    ring: CanvasPanel<Radar>,
    blocks: [BlockLayout; 3],
}

impl Features {
    pub fn new(canvases: FeatureCanvases, env: &PanelEnv, paused: bool) -> Self {
        let mut features = Self {
            radar: CanvasPanel::new(Radar::new(canvases.radar.clone()), env),
            beams: CanvasPanel::new(CrossBeams::new(canvases.beams.clone()), env),
            ring: CanvasPanel::new(Radar::new(canvases.ring.clone()), env),
            canvases,
            paused: false,
            blocks: [BlockLayout::default(); 3],
        };
        if paused {
            features.set_paused(true);
        }
        features
    }

    /// Lay out from page row `y`; returns the rows used.
    pub fn layout(&mut self, y: u16, width: u16, viewport_px: f64, env: &PanelEnv) -> u16 {
        let column = content_column(Rect::new(0, y, width, 0), env);
        let canvas_cols = env.cols_for(CANVAS_PX).min(column.width.saturating_sub(4));
        let canvas_rows = env.rows_for(canvas_cols as f64 * env.cell_width_px);
        let side_by_side = column.width >= SIDE_BY_SIDE_COLS;

        let mut top = y + env.rows_for(48.0);
        for (i, (title, subtitle)) in FEATURES.iter().enumerate() {
            let inner_x = column.x + 2;
            let inner_width = column.width.saturating_sub(4);
            let mut block = BlockLayout::default();
            let height = if side_by_side {
                let text_x = inner_x + canvas_cols + 4;
                let text_width = (column.x + column.width).saturating_sub(text_x + 2);
                let sub_rows = wrapped_rows(subtitle, text_width);
                block.canvas = Rect::new(inner_x, top + 1, canvas_cols, canvas_rows);
                block.title = Rect::new(text_x, top + 2, text_width, 1);
                block.subtitle = Rect::new(text_x, top + 4, text_width, sub_rows);
                canvas_rows.max(3 + sub_rows) + 2
            } else {
                let text_y = top + 1 + canvas_rows + 1;
                let sub_rows = wrapped_rows(subtitle, inner_width);
                let title_rows = wrapped_rows(title, inner_width);
                block.canvas = Rect::new(inner_x, top + 1, canvas_cols, canvas_rows);
                block.title = Rect::new(inner_x, text_y, inner_width, title_rows);
                block.subtitle = Rect::new(inner_x, text_y + title_rows + 1, inner_width, sub_rows);
                canvas_rows + title_rows + sub_rows + 5
            };
            block.frame = Rect::new(column.x, top, column.width, height);
            self.blocks[i] = block;
            top += height + 2;
        }

        let size = env.layout_size(canvas_cols, canvas_rows);
        self.radar.place(self.blocks[0].canvas, size, viewport_px);
        self.beams.place(self.blocks[1].canvas, size, viewport_px);
        self.ring.place(self.blocks[2].canvas, size, viewport_px);
        top + env.rows_for(48.0) - y
    }

    pub fn tick(&mut self, time_ms: f64, visible: Rect) {
        if self.radar.is_visible(visible) {
            self.radar.tick(time_ms);
        }
        if self.beams.is_visible(visible) {
            self.beams.tick(time_ms);
        }
        if self.ring.is_visible(visible) {
            self.ring.tick(time_ms);
        }
    }

    pub fn render(&mut self, buf: &mut Buffer, ctx: &PaintCtx) {
        let presentation = Presentation {
            tint: ctx.tint,
            ..Default::default()
        };
        for (i, block) in self.blocks.iter().enumerate() {
            // The first block sits flush with the page.
            if i > 0 {
                Block::bordered()
                    .border_style(Style::new().fg(BORDER))
                    .render(block.frame.intersection(buf.area), buf);
            }
            let (title, subtitle) = FEATURES[i];
            Paragraph::new(Text::styled(title, Style::new().fg(FOREGROUND).add_modifier(Modifier::BOLD)))
                .wrap(Wrap { trim: true })
                .render(block.title.intersection(buf.area), buf);
            Paragraph::new(Text::styled(subtitle, Style::new().fg(FOREGROUND)))
                .wrap(Wrap { trim: true })
                .render(block.subtitle.intersection(buf.area), buf);
        }
        self.radar.render(buf, &presentation);
        self.beams.render(buf, &presentation);
        self.ring.render(buf, &presentation);
    }

    /// Stop or restart every canvas; a stopped canvas holds its first frame.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }
        self.paused = paused;
        let running = |configured: bool| configured && !paused;

        let mut radar = self.canvases.radar.clone();
        radar.running = running(radar.running);
        self.radar.reconfigure(Radar::new(radar));

        let mut beams = self.canvases.beams.clone();
        beams.running = running(beams.running);
        self.beams.reconfigure(CrossBeams::new(beams));

        let mut ring = self.canvases.ring.clone();
        ring.running = running(ring.running);
        self.ring.reconfigure(Radar::new(ring));
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.radar.set_reduced_motion(reduced_motion);
        self.beams.set_reduced_motion(reduced_motion);
        self.ring.set_reduced_motion(reduced_motion);
    }

    pub fn unmount(&mut self) {
        self.radar.unmount();
        self.beams.unmount();
        self.ring.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasyard_canvas::DriverState;

    fn env() -> PanelEnv {
        PanelEnv {
            cell_width_px: 6.0,
            cell_height_px: 12.0,
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }

    #[test]
    fn test_canvases_are_square() {
        let env = env();
        let mut features = Features::new(FeatureCanvases::default(), &env, false);
        features.layout(0, 200, 1200.0, &env);
        let canvas = features.blocks[0].canvas;
        assert_eq!((canvas.width, canvas.height), (40, 20));
        let grid = features.radar.renderer().grid().unwrap();
        assert_eq!(grid.geometry.backing.width, 240);
        assert_eq!(grid.geometry.backing.height, 240);
        assert_eq!(features.radar.state(), DriverState::Running);
        assert_eq!(features.beams.state(), DriverState::Running);
        assert_eq!(features.ring.state(), DriverState::Running);
    }

    #[test]
    fn test_side_by_side_and_stacked() {
        let env = env();
        let mut features = Features::new(FeatureCanvases::default(), &env, false);
        let wide = features.layout(0, 200, 1200.0, &env);
        let block = features.blocks[1];
        assert_eq!(block.title.y, block.frame.y + 2);
        assert!(block.title.x > block.canvas.right());

        let narrow = features.layout(0, 80, 480.0, &env);
        let block = features.blocks[1];
        assert!(block.title.y > block.canvas.bottom());
        assert_eq!(block.title.x, block.canvas.x);
        assert!(narrow > wide);
    }

    #[test]
    fn test_paused_canvases_are_static() {
        let env = env();
        let mut features = Features::new(FeatureCanvases::default(), &env, true);
        features.layout(0, 200, 1200.0, &env);
        assert_eq!(features.radar.state(), DriverState::Static);
        assert_eq!(features.beams.state(), DriverState::Static);

        features.set_paused(false);
        assert_eq!(features.beams.state(), DriverState::Running);
    }

    #[test]
    fn test_render_blocks() {
        let env = env();
        let mut features = Features::new(FeatureCanvases::default(), &env, false);
        features.layout(0, 200, 1200.0, &env);
        let first = features.blocks[0].frame;
        features.tick(16.0, Rect::new(0, first.y, 200, first.height));
        assert_eq!(features.radar.state(), DriverState::Running);

        let mut buf = Buffer::empty(Rect::new(0, 0, 200, 200));
        let ctx = PaintCtx {
            time_ms: 16.0,
            tint: Default::default(),
            motion: true,
        };
        features.render(&mut buf, &ctx);
        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("SOLVER-POWERED EXECUTION"));
        assert!(text.contains("▀"));
    }
}
