//! A dotted band realised the way its parameters ask: painted every frame on
//! a canvas panel, or laid out as markup elements that animate themselves.

use gasyard_canvas::{CellSurface, DottedBand, DriverState, MarkupBand, Presentation, Tint};
use gasyard_core::{BandMode, DottedBandParams, LayoutSize};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::panel::{CanvasPanel, PanelEnv};

/// Band parameters with motion stripped while paused.
fn effective(params: &DottedBandParams, paused: bool) -> DottedBandParams {
    let mut params = params.clone();
    if paused {
        params.twinkle = false;
        params.running = false;
    }
    params
}

/// Markup elements composited onto a cell surface when drawn.
#[derive(Debug)]
pub struct MarkupPanel {
    params: DottedBandParams,
    band: Option<MarkupBand>,
    surface: CellSurface,
    area: Rect,
    size: LayoutSize,
    viewport_px: f64,
    reduced_motion: bool,
}

impl MarkupPanel {
    fn new(params: DottedBandParams, env: &PanelEnv) -> Self {
        Self {
            params,
            band: None,
            surface: CellSurface::new(env.cell_width_px, env.cell_height_px),
            area: Rect::default(),
            size: LayoutSize::default(),
            viewport_px: 0.0,
            reduced_motion: env.reduced_motion,
        }
    }

    fn rebuild(&mut self) {
        self.band = MarkupBand::build(&self.params, self.size.width, self.viewport_px, self.reduced_motion);
        if let Some(band) = &self.band {
            band.size_surface(&mut self.surface);
        }
    }
}

#[derive(Debug)]
pub enum Band {
    Canvas(CanvasPanel<DottedBand>),
    Markup(MarkupPanel),
}

#[derive(Debug)]
pub struct HeroBand {
    /// Parameters as configured, before pausing.
    params: DottedBandParams,
    paused: bool,
    env: PanelEnv,
    band: Band,
    /// Last placement, replayed when the mechanism changes.
    placement: Option<(Rect, LayoutSize, f64)>,
}

impl HeroBand {
    /// Mount a band of the kind `params.mode` names.
    pub fn new(params: DottedBandParams, env: &PanelEnv, paused: bool) -> Self {
        let band = Self::mount(&params, env, paused);
        Self {
            params,
            paused,
            env: *env,
            band,
            placement: None,
        }
    }

    fn mount(params: &DottedBandParams, env: &PanelEnv, paused: bool) -> Band {
        let live = effective(params, paused);
        match params.mode {
            BandMode::Canvas => Band::Canvas(CanvasPanel::new(DottedBand::new(live), env)),
            BandMode::Markup => Band::Markup(MarkupPanel::new(live, env)),
        }
    }

    pub fn params(&self) -> &DottedBandParams {
        &self.params
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    /// Whether the band changes over time.
    pub fn is_animated(&self) -> bool {
        match &self.band {
            Band::Canvas(panel) => panel.state() == DriverState::Running,
            Band::Markup(panel) => panel.band.as_ref().is_some_and(MarkupBand::is_animated),
        }
    }

    /// Lay the band out at `area` (page cells) with `size` as its content box.
    pub fn place(&mut self, area: Rect, size: LayoutSize, viewport_px: f64) {
        self.placement = Some((area, size, viewport_px));
        match &mut self.band {
            Band::Canvas(panel) => panel.place(area, size, viewport_px),
            Band::Markup(panel) => {
                panel.area = area;
                if panel.size != size || panel.viewport_px != viewport_px || panel.band.is_none() {
                    panel.size = size;
                    panel.viewport_px = viewport_px;
                    panel.rebuild();
                }
            }
        }
    }

    /// Service the canvas frame callback when the band is in view.
    pub fn tick(&mut self, time_ms: f64, visible: Rect) {
        if let Band::Canvas(panel) = &mut self.band
            && panel.is_visible(visible)
        {
            panel.tick(time_ms);
        }
    }

    pub fn render(&mut self, buf: &mut Buffer, tint: Tint, time_ms: f64, slant: f64) {
        match &mut self.band {
            Band::Canvas(panel) => {
                let presentation = Presentation {
                    tint,
                    mask: Some(panel.renderer().mask()),
                    slant,
                };
                panel.render(buf, &presentation);
            }
            Band::Markup(panel) => {
                let Some(band) = &panel.band else {
                    return;
                };
                band.composite(&mut panel.surface, time_ms);
                let presentation = Presentation {
                    tint,
                    mask: Some(band.mask()),
                    slant,
                };
                let area = panel.area.intersection(buf.area);
                if !area.is_empty() {
                    panel.surface.render(buf, area, &presentation);
                }
            }
        }
    }

    /// Swap in new parameters; this is a remount.
    pub fn reconfigure(&mut self, params: DottedBandParams) {
        if params == self.params {
            return;
        }
        if params.mode != self.params.mode {
            self.unmount();
            self.band = Self::mount(&params, &self.env, self.paused);
            self.params = params;
            if let Some((area, size, viewport_px)) = self.placement {
                self.place(area, size, viewport_px);
            }
            return;
        }
        self.params = params;
        self.remount();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            self.paused = paused;
            self.remount();
        }
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.env.reduced_motion = reduced_motion;
        match &mut self.band {
            Band::Canvas(panel) => panel.set_reduced_motion(reduced_motion),
            Band::Markup(panel) => {
                panel.reduced_motion = reduced_motion;
                panel.rebuild();
            }
        }
    }

    pub fn unmount(&mut self) {
        match &mut self.band {
            Band::Canvas(panel) => panel.unmount(),
            Band::Markup(panel) => panel.band = None,
        }
    }

    fn remount(&mut self) {
        let live = effective(&self.params, self.paused);
        match &mut self.band {
            Band::Canvas(panel) => panel.reconfigure(DottedBand::new(live)),
            Band::Markup(panel) => {
                panel.params = live;
                panel.rebuild();
            }
        }
    }
}
