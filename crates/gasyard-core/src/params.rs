//! Renderer parameters, each with its defaults enumerated once.
//!
//! Parameters are fixed for the lifetime of a mounted renderer; changing
//! any of them means remounting.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::surface::DotShape;

/// Viewport width (layout pixels) at and above which desktop band heights apply.
pub const DESKTOP_BREAKPOINT_PX: f64 = 640.0;

/// Band height used when nothing usable is configured.
const FALLBACK_BAND_HEIGHT_PX: f64 = 192.0;

/// Radar: dotted grid with a bright ring, optional sweeping wedge and hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarParams {
    /// Dot size in layout pixels.
    pub dot_size: f64,
    /// Grid spacing in layout pixels.
    pub grid: f64,
    /// Half-width of the ring band in layout pixels.
    pub ring_thickness: f64,
    /// Sweep speed in radians per second.
    pub speed: f64,
    /// Full angular width of the sweep wedge in radians.
    pub wedge_width: f64,
    /// When false a single static frame is drawn.
    pub running: bool,
    pub sweep_wedge: bool,
    pub show_hand: bool,
    /// Hand thickness in layout pixels, constant along its length.
    pub hand_width_px: f64,
    /// Ring brightness follows the sweep angle.
    pub animate_ring: bool,
    pub center_dot: bool,
    /// Ring radius in layout pixels; the usable radius when unset.
    pub ring_radius_px: Option<f64>,
    /// Bright center radius in layout pixels; `0.45 * grid` when unset.
    pub center_dot_radius_px: Option<f64>,
    /// Ring brightness travels clockwise as a cosine wave.
    pub ring_wave: bool,
    pub ring_wave_base: f64,
    pub ring_wave_boost: f64,
    /// Wave speed in radians per second; `speed` when unset.
    pub ring_wave_speed: Option<f64>,
    /// Background dots follow the same wave at low amplitude.
    pub grid_wave: bool,
    pub grid_wave_amp: f64,
    pub respect_reduced_motion: bool,
    /// Scales every final alpha.
    pub brightness_scale: f64,
    pub dot_shape: DotShape,
}

impl Default for RadarParams {
    fn default() -> Self {
        Self {
            dot_size: 2.2,
            grid: 10.0,
            ring_thickness: 10.0,
            speed: PI / 6.0,
            wedge_width: PI / 10.0,
            running: true,
            sweep_wedge: false,
            show_hand: true,
            hand_width_px: 6.0,
            animate_ring: false,
            center_dot: false,
            ring_radius_px: None,
            center_dot_radius_px: None,
            ring_wave: false,
            ring_wave_base: 0.35,
            ring_wave_boost: 0.65,
            ring_wave_speed: None,
            grid_wave: false,
            grid_wave_amp: 0.06,
            respect_reduced_motion: true,
            brightness_scale: 1.0,
            dot_shape: DotShape::Square,
        }
    }
}

impl RadarParams {
    /// Speed of the ring and background waves.
    pub fn wave_speed(&self) -> f64 {
        self.ring_wave_speed.unwrap_or(self.speed)
    }
}

/// Cross-beams: four tapering arms leaving a central square, with a
/// bright front travelling outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossBeamsParams {
    pub dot_size: f64,
    pub grid: f64,
    /// Ambient alpha of background dots.
    pub base_alpha: f64,
    /// Half-width of an arm where it leaves the square.
    pub beam_max_width_px: f64,
    pub beam_length_px: f64,
    /// Length of the bright segment behind the front.
    pub tail_px: f64,
    /// Front speed in layout pixels per second.
    pub speed: f64,
    /// Half-size of the central square the arms start from.
    pub core_half_px: f64,
    /// Radius of the bright center hole; 0 keeps only the center dot bright.
    pub hole_radius_px: f64,
    pub running: bool,
    pub dot_shape: DotShape,
}

impl Default for CrossBeamsParams {
    fn default() -> Self {
        Self {
            dot_size: 2.0,
            grid: 6.0,
            base_alpha: 0.12,
            beam_max_width_px: 24.0,
            beam_length_px: 220.0,
            tail_px: 120.0,
            speed: 90.0,
            core_half_px: 3.0 * 6.0,
            hole_radius_px: 0.0,
            running: true,
            dot_shape: DotShape::Square,
        }
    }
}

/// A band height given either as a number or as CSS-ish text such as `"320px"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BandHeight {
    Px(f64),
    Css(String),
}

impl BandHeight {
    /// Height in layout pixels, reading the leading integer of text values.
    pub fn px(&self) -> Option<f64> {
        match self {
            BandHeight::Px(v) if v.is_finite() => Some(*v),
            BandHeight::Px(_) => None,
            BandHeight::Css(text) => {
                let text = text.trim_start();
                let end = text
                    .char_indices()
                    .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                    .map_or(text.len(), |(i, _)| i);
                text[..end].parse::<i64>().ok().map(|v| v as f64)
            }
        }
    }
}

impl From<f64> for BandHeight {
    fn from(px: f64) -> Self {
        BandHeight::Px(px)
    }
}

/// How a dotted band is realised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandMode {
    /// Painted every frame on a surface.
    #[default]
    Canvas,
    /// One element per dot with a declarative keyframe animation.
    Markup,
}

/// Dotted band: a horizontal strip of twinkling, panning dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DottedBandParams {
    pub twinkle: bool,
    pub height: BandHeight,
    /// Height below the desktop breakpoint.
    pub height_mobile: Option<BandHeight>,
    /// Height at and above the desktop breakpoint.
    pub height_desktop: Option<BandHeight>,
    /// Opacity of the whole band, applied when presenting.
    pub opacity: f64,
    /// Grid spacing in layout pixels.
    pub cell: f64,
    pub dot_size: f64,
    /// Percent of the height faded at the top and bottom edges (0-49).
    pub edge_fade_pct: f64,
    /// Skew of the parent that the drawing surface is widened to cover.
    pub counter_skew_x_deg: f64,
    /// Keep panning even without twinkle.
    pub running: bool,
    /// Panning speed in layout pixels per second (positive is right).
    pub scroll_speed_x: f64,
    /// Panning speed in layout pixels per second (positive is down).
    pub scroll_speed_y: f64,
    /// Number of precomputed twinkle frames.
    pub twinkle_patterns: f64,
    pub twinkle_fps: f64,
    /// How strongly twinkle frames modulate the baseline (0..1).
    pub twinkle_depth: f64,
    pub mode: BandMode,
}

impl Default for DottedBandParams {
    fn default() -> Self {
        Self {
            twinkle: false,
            height: BandHeight::Px(FALLBACK_BAND_HEIGHT_PX),
            height_mobile: None,
            height_desktop: None,
            opacity: 0.35,
            cell: 12.0,
            dot_size: 4.0,
            edge_fade_pct: 12.0,
            counter_skew_x_deg: 0.0,
            running: false,
            scroll_speed_x: -20.0,
            scroll_speed_y: 0.0,
            twinkle_patterns: 4.0,
            twinkle_fps: 1.0,
            twinkle_depth: 0.6,
            mode: BandMode::Canvas,
        }
    }
}

impl DottedBandParams {
    /// Band height for a viewport of the given width.
    pub fn resolved_height(&self, viewport_width: f64) -> f64 {
        let specific = if viewport_width >= DESKTOP_BREAKPOINT_PX {
            self.height_desktop.as_ref()
        } else {
            self.height_mobile.as_ref()
        };
        specific
            .and_then(BandHeight::px)
            .or_else(|| self.height.px())
            .unwrap_or(FALLBACK_BAND_HEIGHT_PX)
    }

    /// Extra drawing width needed so a skewed parent shows no empty corners.
    pub fn skew_extra_width(&self, height: f64) -> f64 {
        let extra = self.counter_skew_x_deg.abs().to_radians().tan() * height;
        if extra.is_finite() { extra } else { 0.0 }
    }

    /// Edge fade percentage clamped to `[0, 49]`.
    pub fn edge_fade(&self) -> f64 {
        if self.edge_fade_pct.is_nan() {
            0.0
        } else {
            self.edge_fade_pct.clamp(0.0, 49.0)
        }
    }
}
