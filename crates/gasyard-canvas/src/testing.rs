//! Recording host and surface for tests.

use gasyard_core::{BackingSize, FrameHandle, Host, LayoutSize, ObserverHandle, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(BackingSize, LayoutSize),
    Clear,
    Rect { x: f64, y: f64, size: f64, alpha: f64 },
    Circle { x: f64, y: f64, radius: f64, alpha: f64 },
}

/// Surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    pub clears: usize,
    pub fills: usize,
    pub backing: BackingSize,
    pub layout: LayoutSize,
    alpha: f64,
}

impl RecordingSurface {
    /// Alpha of every painted dot in the most recent frame, in paint order.
    pub fn last_frame_alphas(&self) -> Vec<f64> {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == Op::Clear)
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                Op::Rect { alpha, .. } | Op::Circle { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, backing: BackingSize, layout: LayoutSize) {
        self.backing = backing;
        self.layout = layout;
        self.ops.push(Op::Resize(backing, layout));
    }

    fn clear_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {
        self.clears += 1;
        self.ops.push(Op::Clear);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, _height: f64) {
        self.fills += 1;
        self.ops.push(Op::Rect {
            x,
            y,
            size: width,
            alpha: self.alpha,
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        self.fills += 1;
        self.ops.push(Op::Circle {
            x: cx,
            y: cy,
            radius,
            alpha: self.alpha,
        });
    }
}

/// Host with a manual frame scheduler and resize facility.
#[derive(Debug)]
pub struct FakeHost {
    pub surface: RecordingSurface,
    pub has_surface: bool,
    pub size: LayoutSize,
    pub viewport_width: f64,
    pub dpr: f64,
    pub reduced_motion: bool,
    pub can_observe: bool,
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub observers_started: usize,
    observers: Vec<ObserverHandle>,
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl FakeHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            surface: RecordingSurface::default(),
            has_surface: true,
            size: LayoutSize::new(width, height),
            viewport_width: 1024.0,
            dpr: 1.0,
            reduced_motion: false,
            can_observe: true,
            requested: Vec::new(),
            cancelled: Vec::new(),
            observers_started: 0,
            observers: Vec::new(),
            pending: None,
            next_id: 0,
        }
    }

    /// Hand out the scheduled frame, as the scheduler does when it fires.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn observing(&self) -> bool {
        !self.observers.is_empty()
    }
}

impl Host for FakeHost {
    fn surface(&mut self) -> Option<&mut dyn Surface> {
        if self.has_surface {
            Some(&mut self.surface)
        } else {
            None
        }
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
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.requested.push(handle);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn observe_resize(&mut self) -> Option<ObserverHandle> {
        if !self.can_observe {
            return None;
        }
        self.next_id += 1;
        let handle = ObserverHandle(self.next_id);
        self.observers_started += 1;
        self.observers.push(handle);
        Some(handle)
    }

    fn disconnect_resize(&mut self, handle: ObserverHandle) {
        self.observers.retain(|h| *h != handle);
    }
}
