//! The landing page, laid out as one tall buffer that the viewport scrolls over.

mod band;
mod features;
mod footer;
mod hero;
mod navbar;
mod networks;

use gasyard_canvas::Tint;
use gasyard_config::Config;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use tracing::debug;

use crate::panel::PanelEnv;

pub use navbar::Navbar;

pub(crate) const FOREGROUND: Color = Color::Rgb(255, 255, 255);
pub(crate) const SOFT: Color = Color::Rgb(163, 163, 163);
pub(crate) const DIM: Color = Color::Rgb(153, 153, 153);

/// Widest content column, in layout pixels.
const CONTENT_MAX_PX: f64 = 1152.0;

/// What every section needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintCtx {
    /// Milliseconds on the page clock.
    pub time_ms: f64,
    pub tint: Tint,
    /// Whether decorative motion is allowed.
    pub motion: bool,
}

/// Centered content column of at most [`CONTENT_MAX_PX`], with side padding.
pub(crate) fn content_column(area: Rect, env: &PanelEnv) -> Rect {
    let max = env.cols_for(CONTENT_MAX_PX);
    let pad = if area.width >= 80 { 4 } else { 2 };
    let width = area.width.saturating_sub(pad * 2).min(max);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

/// All page sections below the fixed navbar.
#[derive(Debug)]
pub struct Page {
    env: PanelEnv,
    paused: bool,
    hero: hero::Hero,
    features: features::Features,
    networks: networks::Networks,
    footer: footer::Footer,
    width: u16,
    height: u16,
}

impl Page {
    pub fn new(config: &Config) -> Self {
        let env = PanelEnv {
            cell_width_px: config.cell_width_px,
            cell_height_px: config.cell_height_px,
            device_pixel_ratio: config.device_pixel_ratio,
            reduced_motion: config.reduced_motion,
        };
        Self {
            hero: hero::Hero::new(&env, config.paused),
            features: features::Features::new(config.features.clone(), &env, config.paused),
            networks: networks::Networks::new(config.marquee_speed, &env),
            footer: footer::Footer::new(&env),
            env,
            paused: config.paused,
            width: 0,
            height: 0,
        }
    }

    pub fn env(&self) -> &PanelEnv {
        &self.env
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether decorative motion is currently allowed.
    pub fn motion(&self) -> bool {
        !self.paused && !self.env.reduced_motion
    }

    /// Lay every section out for a terminal `width` columns wide.
    pub fn layout(&mut self, width: u16) {
        if width == self.width && self.height > 0 {
            return;
        }
        let viewport_px = width as f64 * self.env.cell_width_px;
        let mut y = 0;
        y += self.hero.layout(y, width, viewport_px, &self.env);
        y += self.features.layout(y, width, viewport_px, &self.env);
        y += self.networks.layout(y, width);
        y += self.footer.layout(y, width);
        debug!(width, height = y, "page laid out");
        self.width = width;
        self.height = y;
    }

    /// Service frame callbacks of the panels inside `visible` (page cells).
    pub fn tick(&mut self, time_ms: f64, visible: Rect) {
        self.hero.tick(time_ms, visible);
        self.features.tick(time_ms, visible);
    }

    /// Draw the page into `buf`, which spans the whole page.
    pub fn render(&mut self, buf: &mut Buffer, ctx: &PaintCtx) {
        self.hero.render(buf, ctx);
        self.features.render(buf, ctx);
        self.networks.render(buf, ctx);
        self.footer.render(buf);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.hero.set_paused(paused);
        self.features.set_paused(paused);
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.env.reduced_motion = reduced_motion;
        self.hero.set_reduced_motion(reduced_motion);
        self.features.set_reduced_motion(reduced_motion);
    }

    /// Stop every canvas; nothing paints after this.
    pub fn unmount(&mut self) {
        self.hero.unmount();
        self.features.unmount();
        debug!("page unmounted");
    }
}
