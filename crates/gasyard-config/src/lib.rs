//! Configuration for the gasyard landing page.
//!
//! Settings live in `config.toml` under the platform config directory (or
//! wherever `GASYARD_CONFIG` points). Every field is optional.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::{fs, io};

use directories::ProjectDirs;
use gasyard_core::{CrossBeamsParams, RadarParams};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GASYARD_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Backing stores grow with the square of the ratio; keep them bounded.
const MIN_DEVICE_PIXEL_RATIO: f64 = 1.0;
const MAX_DEVICE_PIXEL_RATIO: f64 = 4.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Landing page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame callbacks per second serviced by the event loop.
    pub fps: u32,
    /// Start with every animation stopped.
    pub paused: bool,
    /// Force the reduced-motion preference.
    pub reduced_motion: bool,
    /// Dot color as `#RRGGBB`.
    pub tint: String,
    pub device_pixel_ratio: f64,
    /// Layout pixels covered by one terminal column.
    pub cell_width_px: f64,
    /// Layout pixels covered by one terminal row.
    pub cell_height_px: f64,
    /// Supported-networks marquee speed in layout pixels per second.
    pub marquee_speed: f64,
    /// Overrides layered over the landing-page canvases, key by key.
    #[serde(deserialize_with = "overlay_features")]
    pub features: FeatureCanvases,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            paused: false,
            reduced_motion: false,
            tint: "#FFFFFF".to_string(),
            device_pixel_ratio: 1.0,
            cell_width_px: 6.0,
            cell_height_px: 12.0,
            marquee_speed: 40.0,
            features: FeatureCanvases::default(),
        }
    }
}

/// Parameters of the three feature-block canvases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureCanvases {
    /// Radar with a sweeping hand (finality).
    pub radar: RadarParams,
    /// Cross-beams with a bright hole (solver execution).
    pub beams: CrossBeamsParams,
    /// Radar with a travelling ring wave (liquidity).
    pub ring: RadarParams,
}

impl Default for FeatureCanvases {
    fn default() -> Self {
        Self {
            radar: RadarParams {
                dot_size: 2.0,
                grid: 6.0,
                ring_thickness: 10.0,
                speed: PI / 6.0,
                running: true,
                sweep_wedge: false,
                show_hand: true,
                hand_width_px: 8.0,
                ring_radius_px: Some(100.0),
                brightness_scale: 0.95,
                ..Default::default()
            },
            beams: CrossBeamsParams {
                dot_size: 2.0,
                grid: 6.0,
                base_alpha: 0.12,
                beam_max_width_px: 26.0,
                beam_length_px: 100.0,
                tail_px: 120.0,
                speed: 90.0,
                core_half_px: 19.0,
                hole_radius_px: 13.0,
                running: true,
                ..Default::default()
            },
            ring: RadarParams {
                dot_size: 2.0,
                grid: 6.0,
                ring_thickness: 8.0,
                ring_radius_px: Some(50.0),
                speed: PI / 6.0,
                running: true,
                animate_ring: false,
                ring_wave: true,
                ring_wave_base: 0.25,
                ring_wave_boost: 0.95,
                grid_wave: true,
                grid_wave_amp: 0.06,
                ring_wave_speed: Some(PI / 4.0),
                center_dot: true,
                sweep_wedge: false,
                show_hand: false,
                center_dot_radius_px: Some(12.0),
                ..Default::default()
            },
        }
    }
}

/// Read `[features]` as changes to [`FeatureCanvases::default`] rather than to
/// the bare parameter defaults.
fn overlay_features<'de, D>(deserializer: D) -> Result<FeatureCanvases, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = toml::Table::deserialize(deserializer)?;
    let mut merged = toml::Table::try_from(FeatureCanvases::default()).map_err(de::Error::custom)?;
    merge_tables(&mut merged, overrides);
    merged.try_into().map_err(de::Error::custom)
}

/// Nested tables merge; any other value replaces what was there.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base)), toml::Value::Table(value)) => merge_tables(base, value),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("xyz", "gasyard", "gasyard").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unusable config");
            Self::default()
        })
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.sanitize();
        Ok(config)
    }

    /// Tint as an RGB triple; white when the text is not `#RRGGBB`.
    pub fn tint_rgb(&self) -> (u8, u8, u8) {
        parse_hex_rgb(&self.tint).unwrap_or((255, 255, 255))
    }

    /// Replace values the page cannot work with.
    fn sanitize(&mut self) {
        let defaults = Config::default();
        self.fps = self.fps.clamp(1, 120);
        if !(self.cell_width_px.is_finite() && self.cell_width_px > 0.0) {
            self.cell_width_px = defaults.cell_width_px;
        }
        if !(self.cell_height_px.is_finite() && self.cell_height_px > 0.0) {
            self.cell_height_px = defaults.cell_height_px;
        }
        if !self.marquee_speed.is_finite() {
            self.marquee_speed = defaults.marquee_speed;
        }
        self.device_pixel_ratio = if self.device_pixel_ratio.is_finite() {
            self.device_pixel_ratio.clamp(MIN_DEVICE_PIXEL_RATIO, MAX_DEVICE_PIXEL_RATIO)
        } else {
            defaults.device_pixel_ratio
        };
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_rgb(text: &str) -> Option<(u8, u8, u8)> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
