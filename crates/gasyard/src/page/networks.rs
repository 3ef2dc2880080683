//! Supported networks: a row of chain names scrolling right to left.

use gasyard_canvas::{Tint, blend};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Widget};

use super::{PaintCtx, SOFT, content_column};
use crate::panel::PanelEnv;

const TITLE: &str = "SUPPORTED NETWORKS";
const NETWORKS: [&str; 8] = [
    "Ethereum",
    "Polygon",
    "Optimism",
    "Arbitrum",
    "Base",
    "Avalanche",
    "Hyperliquid",
    "Move",
];
/// Names visible across the track at once.
const SLOTS: u16 = 8;
const NAME: Tint = Tint(230, 230, 230);
const BLACK: Tint = Tint(0, 0, 0);

#[derive(Debug)]
pub struct Networks {
    /// Layout pixels per second.
    speed: f64,
    env: PanelEnv,
    title: Rect,
    track: Rect,
}

impl Networks {
    pub fn new(speed: f64, env: &PanelEnv) -> Self {
        Self {
            speed,
            env: *env,
            title: Rect::default(),
            track: Rect::default(),
        }
    }

    /// Lay out from page row `y`; returns the rows used.
    pub fn layout(&mut self, y: u16, width: u16) -> u16 {
        let pad = self.env.rows_for(48.0);
        let column = content_column(Rect::new(0, y, width, 0), &self.env);
        self.title = Rect::new(column.x, y + pad, column.width, 1);
        self.track = Rect::new(column.x, y + pad + 3, column.width, 1);
        pad * 2 + 4
    }

    fn slot_width(&self) -> u16 {
        self.track.width / SLOTS
    }

    /// Columns the doubled list has scrolled left at `time_ms`.
    fn shift(&self, time_ms: f64, motion: bool) -> i64 {
        let period = (self.slot_width() * SLOTS) as i64;
        if !motion || period == 0 {
            return 0;
        }
        let cols = (time_ms / 1000.0 * self.speed / self.env.cell_width_px).floor();
        if cols.is_finite() { (cols as i64).rem_euclid(period) } else { 0 }
    }

    /// Name brightness at track column `col`, dimming over one slot at each end.
    fn fade(&self, col: i64) -> Tint {
        let fade_cols = self.slot_width().max(1) as f64;
        let edge = col.min(self.track.width as i64 - 1 - col) as f64;
        blend(BLACK, NAME, (edge + 1.0) / fade_cols)
    }

    pub fn render(&self, buf: &mut Buffer, ctx: &PaintCtx) {
        Paragraph::new(Text::styled(TITLE, Style::new().fg(SOFT)))
            .alignment(Alignment::Center)
            .render(self.title.intersection(buf.area), buf);

        let slot = self.slot_width() as i64;
        if slot == 0 {
            return;
        }
        let shift = self.shift(ctx.time_ms, ctx.motion);
        let width = self.track.width as i64;
        for (i, name) in NETWORKS.iter().chain(NETWORKS.iter()).enumerate() {
            let start = i as i64 * slot - shift;
            if start + slot <= 0 || start >= width {
                continue;
            }
            let label: String = name.chars().take(slot.saturating_sub(1) as usize).collect();
            let lead = (slot - label.chars().count() as i64) / 2;
            for (k, ch) in label.chars().enumerate() {
                let col = start + lead + k as i64;
                if !(0..width).contains(&col) {
                    continue;
                }
                let position = Position::new(self.track.x + col as u16, self.track.y);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_char(ch).set_fg(self.fade(col).color());
                }
            }
        }
    }
}
