//! Hero: two full-width dotted bands behind the headline, a cycling status
//! line and three skewed slabs for the Intent / Execution / Finality steps.

use gasyard_core::{BandMode, DottedBandParams};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Widget, Wrap};
use serde::Serialize;
use tracing::debug;

use super::band::HeroBand;
use super::{DIM, FOREGROUND, PaintCtx, content_column};
use crate::panel::PanelEnv;

pub const HEADLINE: &str = "INTENT EXECUTION ENGINE";
const SUBHEADLINE: &str = "Bridge, reserve assets, and gas across any chain. Solver-powered and trust-minimized.";

/// Status line for each step, shown in turn.
const STATUS_PERIOD_MS: f64 = 3000.0;
const STATUS_COLORS: [Color; 3] = [
    Color::Rgb(0x86, 0x97, 0xFF),
    Color::Rgb(0xFF, 0xEF, 0x0E),
    Color::Rgb(0x00, 0xB3, 0x2D),
];

const SLAB_LABELS: [&str; 3] = ["Intent", "Execution", "Finality"];
const SLAB_BASE_OPACITY: [f64; 3] = [0.18, 0.28, 0.42];
const SLAB_TOPS_PX: [f64; 3] = [20.0, 80.0, 140.0];
const SLAB_HEIGHT_PX: f64 = 90.0;
const SLAB_MAX_WIDTH_PX: f64 = 720.0;
const SLAB_SKEW_DEG: f64 = 45.0;
const LAYERS_HEIGHT_PX: f64 = 280.0;
const LABEL_COLUMN_PX: f64 = 100.0;

/// The example bridge request shown while the first step is active.
#[derive(Debug, Clone, Serialize)]
struct BridgeIntent<'a> {
    asset: &'a str,
    from: &'a str,
    to: &'a str,
    amount: &'a str,
}

fn status_texts() -> [String; 3] {
    let intent = BridgeIntent {
        asset: "USDC",
        from: "Arbitrum",
        to: "Base",
        amount: "500",
    };
    [
        serde_json::to_string(&intent).unwrap_or_default(),
        "solver bids shown (fastest + cheapest route)".to_string(),
        "Settlement and transaction complete in ~7s".to_string(),
    ]
}

/// Step highlighted at `time_ms`.
pub fn active_index(time_ms: f64) -> usize {
    let step = (time_ms / STATUS_PERIOD_MS).floor();
    if step.is_finite() && step > 0.0 { step as usize % 3 } else { 0 }
}

/// Band behind the headline, painted on a canvas.
fn top_band_params() -> DottedBandParams {
    DottedBandParams {
        twinkle: true,
        running: true,
        scroll_speed_x: -12.0,
        height: 520.0.into(),
        height_mobile: Some(320.0.into()),
        height_desktop: Some(520.0.into()),
        opacity: 0.25,
        edge_fade_pct: 20.0,
        ..Default::default()
    }
}

/// Band behind the subheadline, realised as markup.
fn sub_band_params() -> DottedBandParams {
    DottedBandParams {
        twinkle: true,
        scroll_speed_x: -10.0,
        height: 360.0.into(),
        height_mobile: Some(220.0.into()),
        height_desktop: Some(360.0.into()),
        opacity: 0.08,
        edge_fade_pct: 20.0,
        mode: BandMode::Markup,
        ..Default::default()
    }
}

/// Slab `index` while step `active` is highlighted.
pub fn slab_params(index: usize, active: usize) -> DottedBandParams {
    let on = index == active;
    DottedBandParams {
        scroll_speed_x: -24.0,
        height: SLAB_HEIGHT_PX.into(),
        opacity: (SLAB_BASE_OPACITY[index] * if on { 2.6 } else { 0.4 }).min(1.0),
        edge_fade_pct: 18.0,
        cell: if on { 6.0 } else { 10.0 },
        dot_size: if on { 3.2 } else { 2.2 },
        counter_skew_x_deg: SLAB_SKEW_DEG,
        ..Default::default()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct HeroLayout {
    top: Rect,
    headline: Rect,
    sub: Rect,
    sub_text: Rect,
    status: Rect,
    labels: [Rect; 3],
    /// Columns a slab row is shifted right of the row below it.
    slant: f64,
}

#[derive(Debug)]
pub struct Hero {
    top: HeroBand,
    sub: HeroBand,
    slabs: Vec<HeroBand>,
    active: usize,
    status: [String; 3],
    layout: HeroLayout,
}

impl Hero {
    pub fn new(env: &PanelEnv, paused: bool) -> Self {
        let slabs = (0..SLAB_LABELS.len())
            .map(|i| HeroBand::new(slab_params(i, 0), env, paused))
            .collect();
        Self {
            top: HeroBand::new(top_band_params(), env, paused),
            sub: HeroBand::new(sub_band_params(), env, paused),
            slabs,
            active: 0,
            status: status_texts(),
            layout: HeroLayout::default(),
        }
    }

    /// Lay out from page row `y`; returns the rows used.
    pub fn layout(&mut self, y: u16, width: u16, viewport_px: f64, env: &PanelEnv) -> u16 {
        let mut layout = HeroLayout::default();

        let top_rows = env.rows_for(self.top.params().resolved_height(viewport_px));
        layout.top = Rect::new(0, y, width, top_rows);
        self.top.place(layout.top, env.layout_size(width, top_rows), viewport_px);
        let column = content_column(layout.top, env);
        layout.headline = Rect::new(column.x, (y + top_rows).saturating_sub(2), column.width, 1);

        let sub_y = y + top_rows;
        let sub_rows = env.rows_for(self.sub.params().resolved_height(viewport_px));
        layout.sub = Rect::new(0, sub_y, width, sub_rows);
        self.sub.place(layout.sub, env.layout_size(width, sub_rows), viewport_px);
        let text_width = column.width.min(env.cols_for(576.0));
        layout.sub_text = Rect::new(
            (width - text_width) / 2,
            sub_y + sub_rows / 2,
            text_width,
            3.min(sub_rows),
        );

        let status_y = sub_y + sub_rows + env.rows_for(48.0);
        layout.status = Rect::new(column.x, status_y, column.width, 1);

        let layers_y = status_y + 1 + env.rows_for(32.0);
        let layers_rows = env.rows_for(LAYERS_HEIGHT_PX);
        let label_cols = env.cols_for(LABEL_COLUMN_PX);
        let layer_x = column.x + label_cols + 2;
        let layer_width = column.width.saturating_sub(label_cols + 2);

        let slab_rows = env.rows_for(SLAB_HEIGHT_PX);
        layout.slant = SLAB_SKEW_DEG.to_radians().tan() * env.cell_height_px / env.cell_width_px;
        let extra = (layout.slant * slab_rows.saturating_sub(1) as f64).round() as u16;
        let body = env.cols_for(SLAB_MAX_WIDTH_PX).min(layer_width.saturating_sub(extra));
        for (i, slab) in self.slabs.iter_mut().enumerate() {
            let area = Rect::new(
                layer_x + (layer_width - (body + extra).min(layer_width)) / 2,
                layers_y + env.rows_for(SLAB_TOPS_PX[i]),
                (body + extra).min(layer_width),
                slab_rows,
            );
            slab.place(area, env.layout_size(body, slab_rows), viewport_px);
            layout.labels[i] = Rect::new(column.x, area.y + slab_rows / 2, label_cols, 1);
        }

        self.layout = layout;
        layers_y + layers_rows + env.rows_for(96.0) - y
    }

    pub fn tick(&mut self, time_ms: f64, visible: Rect) {
        let active = active_index(time_ms);
        if active != self.active {
            self.active = active;
            for (i, slab) in self.slabs.iter_mut().enumerate() {
                slab.reconfigure(slab_params(i, active));
            }
            debug!(active, "hero step changed");
        }

        self.top.tick(time_ms, visible);
        self.sub.tick(time_ms, visible);
        for slab in &mut self.slabs {
            slab.tick(time_ms, visible);
        }
    }

    pub fn render(&mut self, buf: &mut Buffer, ctx: &PaintCtx) {
        let layout = self.layout;

        self.top.render(buf, ctx.tint, ctx.time_ms, 0.0);
        let bold = Style::new().fg(FOREGROUND).add_modifier(Modifier::BOLD);
        Paragraph::new(Text::styled(HEADLINE, bold))
            .alignment(Alignment::Right)
            .render(layout.headline.intersection(buf.area), buf);

        self.sub.render(buf, ctx.tint, ctx.time_ms, 0.0);
        Paragraph::new(Text::styled(SUBHEADLINE, Style::new().fg(FOREGROUND)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.sub_text.intersection(buf.area), buf);

        let status = Style::new().fg(STATUS_COLORS[self.active]);
        Paragraph::new(Text::styled(self.status[self.active].as_str(), status))
            .alignment(Alignment::Center)
            .render(layout.status.intersection(buf.area), buf);

        for (i, slab) in self.slabs.iter_mut().enumerate() {
            slab.render(buf, ctx.tint, ctx.time_ms, layout.slant);
            let style = if i == self.active { bold } else { Style::new().fg(DIM) };
            Paragraph::new(Text::styled(SLAB_LABELS[i], style))
                .render(layout.labels[i].intersection(buf.area), buf);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        for band in self.bands_mut() {
            band.set_paused(paused);
        }
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        for band in self.bands_mut() {
            band.set_reduced_motion(reduced_motion);
        }
    }

    pub fn unmount(&mut self) {
        for band in self.bands_mut() {
            band.unmount();
        }
    }

    fn bands_mut(&mut self) -> impl Iterator<Item = &mut HeroBand> {
        [&mut self.top, &mut self.sub].into_iter().chain(self.slabs.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::band::Band;

    fn env() -> PanelEnv {
        PanelEnv {
            cell_width_px: 6.0,
            cell_height_px: 12.0,
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }

    #[test]
    fn test_status_cycles_every_three_seconds() {
        assert_eq!(active_index(0.0), 0);
        assert_eq!(active_index(2999.0), 0);
        assert_eq!(active_index(3000.0), 1);
        assert_eq!(active_index(6500.0), 2);
        assert_eq!(active_index(9000.0), 0);
    }

    #[test]
    fn test_intent_status_is_json() {
        let texts = status_texts();
        assert_eq!(texts[0], r#"{"asset":"USDC","from":"Arbitrum","to":"Base","amount":"500"}"#);
    }

    #[test]
    fn test_slab_params_follow_active_step() {
        let active = slab_params(1, 1);
        assert!((active.opacity - 0.28 * 2.6).abs() < 1e-12);
        assert_eq!(active.cell, 6.0);
        assert_eq!(active.dot_size, 3.2);

        let idle = slab_params(2, 1);
        assert!((idle.opacity - 0.42 * 0.4).abs() < 1e-12);
        assert_eq!(idle.cell, 10.0);
        assert_eq!(idle.dot_size, 2.2);

        // Capped at full opacity.
        assert_eq!(slab_params(2, 2).opacity, 1.0);
    }

    #[test]
    fn test_step_change_remounts_slabs() {
        let env = env();
        let mut hero = Hero::new(&env, false);
        hero.layout(0, 200, 1200.0, &env);
        assert_eq!(hero.slabs[0].params().cell, 6.0);
        assert!(!hero.slabs[0].is_animated());

        let visible = Rect::new(0, 0, 200, 200);
        hero.tick(3100.0, visible);
        assert_eq!(hero.active, 1);
        assert_eq!(hero.slabs[0].params().cell, 10.0);
        assert_eq!(hero.slabs[1].params().cell, 6.0);
        assert!(!hero.slabs[1].is_animated());
    }

    #[test]
    fn test_responsive_band_rows() {
        let env = env();
        let mut hero = Hero::new(&env, false);
        hero.layout(0, 100, 600.0, &env);
        assert_eq!(hero.layout.top.height, env.rows_for(320.0));
        hero.layout(0, 200, 1200.0, &env);
        assert_eq!(hero.layout.top.height, env.rows_for(520.0));
    }

    #[test]
    fn test_paused_top_band_is_static() {
        let env = env();
        let mut hero = Hero::new(&env, false);
        hero.layout(0, 200, 1200.0, &env);
        assert!(hero.top.is_animated());
        assert!(hero.sub.is_animated());

        hero.set_paused(true);
        assert!(!hero.top.is_animated());
        assert!(!hero.sub.is_animated());
    }

    #[test]
    fn test_bands_follow_their_mode() {
        let env = env();
        let hero = Hero::new(&env, false);
        assert!(matches!(hero.top.band(), Band::Canvas(_)));
        assert!(matches!(hero.sub.band(), Band::Markup(_)));
        assert!(hero.slabs.iter().all(|slab| matches!(slab.band(), Band::Canvas(_))));
    }
}
