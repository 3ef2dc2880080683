//! Markup rendition of a dotted band: one styled element per dot, each
//! twinkling through a shared keyframe rule with its own duration, phase and
//! easing. Nothing is recomputed per frame; `opacity_at` evaluates the
//! keyframes the way a style engine would.

use gasyard_core::{BackingSize, DotShape, DottedBandParams, LayoutSize, Surface, clamp01, paint_dot, rand01};

use crate::animations::SKIP_ALPHA;
use crate::animations::band::{BandDot, BandMask, layout_dots};

/// Name of the shared keyframe rule.
pub const KEYFRAMES_NAME: &str = "gasyard-twinkle";

const MIN_DURATION_MS: f64 = 1600.0;
const DURATION_SPREAD_MS: f64 = 2400.0;

/// Timing function of one dot's twinkle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut];

    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    /// Eased progress for linear progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }
}

/// One coordinate of a unit cubic bezier with control values `a1`, `a2`.
fn bezier(a1: f64, a2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * a1 * s * inv * inv + 3.0 * a2 * s * s * inv + s * s * s
}

fn bezier_slope(a1: f64, a2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * a1 * inv * inv + 6.0 * (a2 - a1) * s * inv + 3.0 * (1.0 - a2) * s * s
}

/// Evaluate `cubic-bezier(x1, y1, x2, y2)` at progress `t`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    // Newton first, bisection when the slope flattens out.
    let mut s = t;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - t;
        if err.abs() < EPSILON {
            return bezier(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = bezier(x1, x2, s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(y1, y2, s)
}

/// One dot element of a markup band, positioned in layout pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DotElement {
    pub row: u32,
    pub col: u32,
    /// Center of the dot.
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Opacity at the start and end of each cycle.
    pub base: f64,
    /// Opacity halfway through each cycle.
    pub peak: f64,
    pub duration_ms: f64,
    /// Negative delay, so dots start mid-cycle instead of in lockstep.
    pub delay_ms: f64,
    pub easing: Easing,
    pub animated: bool,
}

impl DotElement {
    fn new(dot: &BandDot, size: f64, animated: bool) -> Self {
        let (r, c) = (dot.row as f64, dot.col as f64);
        let duration_ms = MIN_DURATION_MS + DURATION_SPREAD_MS * rand01(r * 15731.0 + c * 7193.0 + 307.0);
        let delay_ms = -duration_ms * rand01(r * 5323.0 + c * 49297.0 + 503.0);
        let pick = (rand01(r * 3571.0 + c * 8963.0 + 709.0) * Easing::ALL.len() as f64) as usize;
        Self {
            row: dot.row,
            col: dot.col,
            x: dot.x,
            y: dot.y,
            size,
            base: dot.base,
            peak: dot.base + dot.amp,
            duration_ms,
            delay_ms,
            easing: Easing::ALL[pick.min(Easing::ALL.len() - 1)],
            animated,
        }
    }

    /// Opacity at `time_ms` on the document clock.
    pub fn opacity_at(&self, time_ms: f64) -> f64 {
        if !self.animated || self.duration_ms <= 0.0 {
            return self.base;
        }
        let progress = ((time_ms - self.delay_ms) / self.duration_ms).rem_euclid(1.0);
        // The timing function applies to each keyframe interval separately.
        if progress < 0.5 {
            let eased = self.easing.apply(progress * 2.0);
            self.base + (self.peak - self.base) * eased
        } else {
            let eased = self.easing.apply((progress - 0.5) * 2.0);
            self.peak + (self.base - self.peak) * eased
        }
    }

    /// Inline style declarations for the element.
    pub fn style(&self) -> String {
        let mut style = format!(
            "left:{:.2}px;top:{:.2}px;width:{:.2}px;height:{:.2}px;opacity:{:.4};--dot-base:{:.4};--dot-peak:{:.4};",
            self.x - self.size / 2.0,
            self.y - self.size / 2.0,
            self.size,
            self.size,
            self.base,
            self.base,
            self.peak,
        );
        if self.animated {
            style.push_str(&format!(
                "animation:{KEYFRAMES_NAME} {:.0}ms {} {:.0}ms infinite;",
                self.duration_ms,
                self.easing.css(),
                self.delay_ms,
            ));
        }
        style
    }
}

/// A dotted band laid out as individual elements.
#[derive(Debug, Clone)]
pub struct MarkupBand {
    layout: LayoutSize,
    mask: BandMask,
    elements: Vec<DotElement>,
    animated: bool,
}

impl MarkupBand {
    /// Lay the band out for a container of `container_width` layout pixels.
    ///
    /// Returns `None` until the container has a width.
    pub fn build(
        params: &DottedBandParams,
        container_width: f64,
        viewport_width: f64,
        reduced_motion: bool,
    ) -> Option<Self> {
        if !(params.cell.is_finite() && params.cell > 0.0) {
            return None;
        }
        let height = params.resolved_height(viewport_width);
        if !LayoutSize::new(container_width, height).is_drawable() {
            return None;
        }
        let layout = LayoutSize::new(container_width + params.skew_extra_width(height), height);
        let size = params.dot_size.max(1.0);
        let animated = params.twinkle && !reduced_motion;

        let elements = layout_dots(layout.width, layout.height, params.cell, size)
            .into_iter()
            .map(|dot| DotElement::new(&dot, size, animated))
            .collect();

        Some(Self {
            layout,
            mask: BandMask::new(params),
            elements,
            animated,
        })
    }

    pub fn elements(&self) -> &[DotElement] {
        &self.elements
    }

    /// Size of the band including any skew allowance.
    pub fn layout(&self) -> LayoutSize {
        self.layout
    }

    pub fn mask(&self) -> BandMask {
        self.mask
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// The keyframe rule every element refers to.
    pub fn keyframes_css() -> String {
        format!(
            "@keyframes {KEYFRAMES_NAME} {{\n  0%, 100% {{ opacity: var(--dot-base); }}\n  50% {{ opacity: var(--dot-peak); }}\n}}\n"
        )
    }

    /// Size `surface` to hold the band at one device pixel per layout pixel.
    pub fn size_surface(&self, surface: &mut dyn Surface) {
        surface.resize(BackingSize::for_layout(self.layout, 1.0), self.layout);
    }

    /// Paint every element as it appears at `time_ms`.
    pub fn composite(&self, surface: &mut dyn Surface, time_ms: f64) {
        surface.clear_rect(0.0, 0.0, self.layout.width, self.layout.height);
        for element in &self.elements {
            let alpha = element.opacity_at(time_ms);
            if alpha <= SKIP_ALPHA {
                continue;
            }
            paint_dot(surface, element.x, element.y, element.size, DotShape::Square, alpha);
        }
        surface.set_global_alpha(1.0);
    }
}
