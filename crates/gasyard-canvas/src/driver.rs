//! Frame driver: mounts a renderer on a host and keeps it painted.
//!
//! ```text
//! Idle --(mount / resize with a drawable size)--> Built --+--> Running
//!                                                         +--> Static
//! ```
//!
//! Running vs Static is decided once at mount from the renderer's own
//! configuration and the host's reduced-motion preference. Unmounting
//! cancels the pending frame and the resize observation and returns to
//! Idle.

use gasyard_core::{FrameHandle, Host, LayoutSize, ObserverHandle, Surface, effective_dpr};
use tracing::{debug, trace};

/// What a renderer needs to (re)build its grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildEnv {
    /// Content box of the host element.
    pub size: LayoutSize,
    pub viewport_width: f64,
    /// Device pixel ratio, already clamped to at least 1.
    pub dpr: f64,
    /// Reduced motion is both preferred by the host and honoured by the renderer.
    pub reduced_motion: bool,
}

/// A dotted-grid animation that can be driven frame by frame.
pub trait Renderer {
    /// Size the surface and rebuild the grid. Returns `false`, leaving
    /// prior state untouched, when there is nothing drawable yet.
    fn build(&mut self, env: &BuildEnv, surface: &mut dyn Surface) -> bool;

    /// Repaint every point for the frame at `time_ms`.
    fn draw(&mut self, surface: &mut dyn Surface, time_ms: f64);

    /// Whether the configuration asks for continuous animation.
    fn animates(&self) -> bool;

    /// Whether the host's reduced-motion preference stops the animation.
    fn respects_reduced_motion(&self) -> bool {
        true
    }

    /// Drop per-mount state (grid, precomputed frames).
    fn release(&mut self);
}

/// Lifecycle state of a mounted renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Nothing built: before mount, before the host has a size, or after unmount.
    #[default]
    Idle,
    /// Grid built for the current size; transient during mount.
    Built,
    /// A frame callback is pending and every frame repaints.
    Running,
    /// One frame has been painted and nothing is scheduled.
    Static,
}

/// Owns one renderer instance and its subscriptions on a host.
#[derive(Debug)]
pub struct Driver<R> {
    renderer: R,
    state: DriverState,
    /// Motion decision made at mount; applied once a grid exists.
    animate: bool,
    attached: bool,
    pending: Option<FrameHandle>,
    observer: Option<ObserverHandle>,
}

impl<R: Renderer> Driver<R> {
    /// Mount `renderer` on `host`.
    pub fn mount<H: Host + ?Sized>(renderer: R, host: &mut H) -> Self {
        let mut driver = Self {
            renderer,
            state: DriverState::Idle,
            animate: false,
            attached: false,
            pending: None,
            observer: None,
        };
        driver.attach(host);
        driver
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Whether a frame callback is currently scheduled.
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the renderer is mounted and observing its host.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Frame callback from the host scheduler.
    ///
    /// Callbacks for handles that are no longer pending (cancelled or
    /// superseded) are ignored.
    pub fn on_frame<H: Host + ?Sized>(&mut self, host: &mut H, handle: FrameHandle, time_ms: f64) {
        if self.pending != Some(handle) {
            trace!(?handle, "ignoring stale frame callback");
            return;
        }
        self.pending = None;
        if self.state != DriverState::Running {
            return;
        }
        let Some(surface) = host.surface() else {
            return;
        };
        self.renderer.draw(surface, time_ms);
        self.pending = Some(host.request_frame());
    }

    /// Resize notification for the observed element.
    ///
    /// Rebuilds the grid; a static renderer repaints its single frame, a
    /// running one keeps its clock and picks the new grid up next frame.
    pub fn on_resize<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.attached || self.observer.is_none() {
            return;
        }
        let env = self.build_env(host);
        let Some(surface) = host.surface() else {
            return;
        };
        if !self.renderer.build(&env, surface) {
            trace!(width = env.size.width, height = env.size.height, "resize to undrawable size ignored");
            return;
        }
        trace!(width = env.size.width, height = env.size.height, "grid rebuilt");

        match self.state {
            DriverState::Idle | DriverState::Built => {
                self.state = DriverState::Built;
                self.start(host);
            }
            DriverState::Static => {
                if let Some(surface) = host.surface() {
                    self.renderer.draw(surface, 0.0);
                }
            }
            DriverState::Running => {}
        }
    }

    /// Cancel the frame chain and resize observation and release the grid.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        if let Some(handle) = self.observer.take() {
            host.disconnect_resize(handle);
        }
        if self.attached {
            debug!(state = ?self.state, "renderer unmounted");
        }
        self.renderer.release();
        self.attached = false;
        self.state = DriverState::Idle;
    }

    /// Replace the renderer; any configuration change is a full remount.
    pub fn reconfigure<H: Host + ?Sized>(&mut self, renderer: R, host: &mut H) {
        self.unmount(host);
        self.renderer = renderer;
        self.attach(host);
    }

    /// Unmount and mount again with the same configuration, e.g. after the
    /// motion preference changed.
    pub fn remount<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.unmount(host);
        self.attach(host);
    }

    fn attach<H: Host + ?Sized>(&mut self, host: &mut H) {
        let env = self.build_env(host);
        self.animate = self.renderer.animates() && !env.reduced_motion;

        let Some(surface) = host.surface() else {
            debug!("no drawing surface, renderer not mounted");
            return;
        };
        self.attached = true;

        if self.renderer.build(&env, surface) {
            self.state = DriverState::Built;
            self.start(host);
        } else {
            debug!("host element not laid out yet, waiting for a resize");
        }

        self.observer = host.observe_resize();
        if self.observer.is_none() {
            debug!("host cannot observe resizes, grid stays at its mount size");
        }
    }

    /// Leave `Built` for `Running` or `Static`.
    fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.animate {
            self.state = DriverState::Running;
            if self.pending.is_none() {
                self.pending = Some(host.request_frame());
            }
            debug!("renderer running");
        } else {
            self.state = DriverState::Static;
            if let Some(surface) = host.surface() {
                self.renderer.draw(surface, 0.0);
            }
            debug!("renderer static");
        }
    }

    fn build_env<H: Host + ?Sized>(&self, host: &H) -> BuildEnv {
        BuildEnv {
            size: host.content_size(),
            viewport_width: host.viewport_width(),
            dpr: effective_dpr(host.device_pixel_ratio()),
            reduced_motion: host.prefers_reduced_motion() && self.renderer.respects_reduced_motion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Radar;
    use crate::testing::FakeHost;
    use gasyard_core::RadarParams;

    fn radar(running: bool) -> Radar {
        Radar::new(RadarParams {
            grid: 10.0,
            running,
            ..Default::default()
        })
    }

    #[test]
    fn test_running_mount_schedules_one_frame() {
        let mut host = FakeHost::new(200.0, 200.0);
        let driver = Driver::mount(radar(true), &mut host);
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(host.requested.len(), 1);
        assert_eq!(host.surface.clears, 0);
        assert!(host.observing());
    }

    #[test]
    fn test_frames_repaint_and_requeue() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(true), &mut host);
        for i in 0..3 {
            let handle = host.take_pending().unwrap();
            driver.on_frame(&mut host, handle, i as f64 * 16.0);
        }
        assert_eq!(host.surface.clears, 3);
        assert_eq!(host.requested.len(), 4);
        assert!(driver.has_pending_frame());
    }

    #[test]
    fn test_not_running_renders_exactly_once() {
        let mut host = FakeHost::new(200.0, 200.0);
        let driver = Driver::mount(radar(false), &mut host);
        assert_eq!(driver.state(), DriverState::Static);
        assert_eq!(host.surface.clears, 1);
        assert!(host.requested.is_empty());
    }

    #[test]
    fn test_reduced_motion_renders_exactly_once() {
        let mut host = FakeHost::new(200.0, 200.0);
        host.reduced_motion = true;
        let driver = Driver::mount(radar(true), &mut host);
        assert_eq!(driver.state(), DriverState::Static);
        assert_eq!(host.surface.clears, 1);
        assert!(host.requested.is_empty());
    }

    #[test]
    fn test_reduced_motion_can_be_ignored() {
        let mut host = FakeHost::new(200.0, 200.0);
        host.reduced_motion = true;
        let renderer = Radar::new(RadarParams {
            respect_reduced_motion: false,
            ..Default::default()
        });
        let driver = Driver::mount(renderer, &mut host);
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn test_unmount_cancels_frame_and_observer() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(true), &mut host);
        let handle = host.take_pending().unwrap();
        driver.on_frame(&mut host, handle, 16.0);
        let fills_before = host.surface.fills;
        let pending = *host.requested.last().unwrap();

        driver.unmount(&mut host);
        assert_eq!(host.cancelled, vec![pending]);
        assert!(!host.observing());
        assert_eq!(driver.state(), DriverState::Idle);

        // A late callback for the cancelled handle paints nothing.
        driver.on_frame(&mut host, pending, 32.0);
        assert_eq!(host.surface.fills, fills_before);
        assert!(!driver.has_pending_frame());
    }

    #[test]
    fn test_missing_surface_skips_mount() {
        let mut host = FakeHost::new(200.0, 200.0);
        host.has_surface = false;
        let driver = Driver::mount(radar(true), &mut host);
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(!driver.is_attached());
        assert!(host.requested.is_empty());
        assert!(!host.observing());
    }

    #[test]
    fn test_zero_size_waits_for_resize() {
        let mut host = FakeHost::new(0.0, 0.0);
        let mut driver = Driver::mount(radar(false), &mut host);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(host.surface.clears, 0);

        host.size = LayoutSize::new(120.0, 120.0);
        driver.on_resize(&mut host);
        assert_eq!(driver.state(), DriverState::Static);
        assert_eq!(host.surface.clears, 1);
    }

    #[test]
    fn test_resize_to_zero_keeps_grid() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(true), &mut host);
        let before = driver.renderer().grid().cloned();
        host.size = LayoutSize::new(0.0, 300.0);
        driver.on_resize(&mut host);
        assert_eq!(driver.renderer().grid().cloned(), before);
    }

    #[test]
    fn test_static_resize_repaints() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(false), &mut host);
        host.size = LayoutSize::new(300.0, 100.0);
        driver.on_resize(&mut host);
        assert_eq!(host.surface.clears, 2);
        assert!(host.requested.is_empty());
    }

    #[test]
    fn test_running_resize_recenters_without_restarting_clock() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(true), &mut host);
        let first = host.take_pending().unwrap();
        driver.on_frame(&mut host, first, 1000.0);

        host.size = LayoutSize::new(320.0, 240.0);
        driver.on_resize(&mut host);
        assert_eq!(driver.state(), DriverState::Running);
        // No extra frame request and no repaint until the next callback.
        assert_eq!(host.requested.len(), 2);
        assert_eq!(host.surface.clears, 1);

        let grid = driver.renderer().grid().unwrap();
        assert_eq!((grid.geometry.cx, grid.geometry.cy), (160.0, 120.0));
        assert!(grid.points.iter().any(|p| p.x == 160.0 && p.y == 120.0));

        // The next frame continues from host time, matching a fresh mount at
        // the new size drawn at the same instant.
        host.surface.ops.clear();
        let next = host.take_pending().unwrap();
        driver.on_frame(&mut host, next, 5000.0);
        let resized_ops = std::mem::take(&mut host.surface.ops);

        let mut fresh_host = FakeHost::new(320.0, 240.0);
        let mut fresh = Driver::mount(radar(true), &mut fresh_host);
        fresh_host.surface.ops.clear();
        let handle = fresh_host.take_pending().unwrap();
        fresh.on_frame(&mut fresh_host, handle, 5000.0);
        assert_eq!(resized_ops, fresh_host.surface.ops);
    }

    #[test]
    fn test_reconfigure_is_a_remount() {
        let mut host = FakeHost::new(200.0, 200.0);
        let mut driver = Driver::mount(radar(true), &mut host);
        let pending = *host.requested.last().unwrap();
        driver.reconfigure(radar(false), &mut host);
        assert_eq!(host.cancelled, vec![pending]);
        assert_eq!(driver.state(), DriverState::Static);
        assert_eq!(host.observers_started, 2);
        assert!(host.observing());
    }

    #[test]
    fn test_no_resize_facility_still_renders() {
        let mut host = FakeHost::new(200.0, 200.0);
        host.can_observe = false;
        let mut driver = Driver::mount(radar(false), &mut host);
        assert_eq!(driver.state(), DriverState::Static);
        host.size = LayoutSize::new(10.0, 10.0);
        driver.on_resize(&mut host);
        assert_eq!(host.surface.clears, 1);
    }
}
