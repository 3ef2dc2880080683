//! Canvas panels: a renderer mounted on a rectangle of terminal cells.

use gasyard_canvas::{CellSurface, Driver, DriverState, Presentation, Renderer};
use gasyard_core::{FrameHandle, Host, LayoutSize, ObserverHandle, Surface};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Page-wide settings every panel is mounted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelEnv {
    pub cell_width_px: f64,
    pub cell_height_px: f64,
    pub device_pixel_ratio: f64,
    pub reduced_motion: bool,
}

impl PanelEnv {
    /// Layout size of `cols x rows` terminal cells.
    pub fn layout_size(&self, cols: u16, rows: u16) -> LayoutSize {
        LayoutSize::new(cols as f64 * self.cell_width_px, rows as f64 * self.cell_height_px)
    }

    /// Rows needed to show `px` layout pixels of height.
    pub fn rows_for(&self, px: f64) -> u16 {
        (px / self.cell_height_px).round().clamp(0.0, u16::MAX as f64) as u16
    }

    /// Columns needed to show `px` layout pixels of width.
    pub fn cols_for(&self, px: f64) -> u16 {
        (px / self.cell_width_px).round().clamp(0.0, u16::MAX as f64) as u16
    }
}

/// Host for one panel: the event loop is its frame scheduler.
#[derive(Debug)]
pub struct TerminalHost {
    surface: CellSurface,
    size: LayoutSize,
    viewport_width: f64,
    dpr: f64,
    reduced_motion: bool,
    pending: Option<FrameHandle>,
    observer: Option<ObserverHandle>,
    next_id: u64,
}

impl TerminalHost {
    fn new(env: &PanelEnv) -> Self {
        Self {
            surface: CellSurface::new(env.cell_width_px, env.cell_height_px),
            size: LayoutSize::default(),
            viewport_width: 0.0,
            dpr: env.device_pixel_ratio,
            reduced_motion: env.reduced_motion,
            pending: None,
            observer: None,
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for TerminalHost {
    fn surface(&mut self) -> Option<&mut dyn Surface> {
        Some(&mut self.surface)
    }

    fn content_size(&self) -> LayoutSize {
        self.size
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn observe_resize(&mut self) -> Option<ObserverHandle> {
        let handle = ObserverHandle(self.next_id());
        self.observer = Some(handle);
        Some(handle)
    }

    fn disconnect_resize(&mut self, handle: ObserverHandle) {
        if self.observer == Some(handle) {
            self.observer = None;
        }
    }
}

/// A mounted renderer together with its host and on-screen placement.
#[derive(Debug)]
pub struct CanvasPanel<R> {
    driver: Driver<R>,
    host: TerminalHost,
    /// Content box in page cells.
    area: Rect,
}

impl<R: Renderer> CanvasPanel<R> {
    /// Mount `renderer` on a panel that has not been laid out yet.
    pub fn new(renderer: R, env: &PanelEnv) -> Self {
        let mut host = TerminalHost::new(env);
        let driver = Driver::mount(renderer, &mut host);
        Self {
            driver,
            host,
            area: Rect::default(),
        }
    }

    pub fn renderer(&self) -> &R {
        self.driver.renderer()
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    /// Lay the panel out at `area` (page cells) with `size` as its content box.
    /// A changed size or viewport is delivered as a resize notification.
    pub fn place(&mut self, area: Rect, size: LayoutSize, viewport_width: f64) {
        self.area = area;
        if self.host.size == size && self.host.viewport_width == viewport_width {
            return;
        }
        self.host.size = size;
        self.host.viewport_width = viewport_width;
        if self.host.observer.is_some() {
            self.driver.on_resize(&mut self.host);
        }
    }

    /// Fire the scheduled frame callback, if any.
    pub fn tick(&mut self, time_ms: f64) {
        if let Some(handle) = self.host.pending.take() {
            // The driver still holds the handle and checks it.
            self.driver.on_frame(&mut self.host, handle, time_ms);
        }
    }

    /// Draw onto the page buffer at the last placed area.
    pub fn render(&self, buf: &mut Buffer, presentation: &Presentation) {
        let area = self.area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        self.host.surface.render(buf, area, presentation);
    }

    /// Whether the panel overlaps `visible` and should be serviced.
    pub fn is_visible(&self, visible: Rect) -> bool {
        self.area.intersects(visible)
    }

    /// Swap in a new configuration; this is a remount.
    pub fn reconfigure(&mut self, renderer: R) {
        self.driver.reconfigure(renderer, &mut self.host);
    }

    /// Remount under a new reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.host.reduced_motion = reduced_motion;
        self.driver.remount(&mut self.host);
    }

    /// Drop the frame chain and resize observation.
    pub fn unmount(&mut self) {
        self.driver.unmount(&mut self.host);
    }
}
