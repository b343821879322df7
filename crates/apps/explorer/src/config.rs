use std::env;
use std::ops::RangeInclusive;

use ingest::OVERPASS_ENDPOINT;
use scene::Viewport;

/// Resolutions offered by the slider.
pub const RESOLUTION_RANGE: RangeInclusive<u8> = 6..=10;
pub const DEFAULT_RESOLUTION: u8 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ResolutionOutOfRange(u8),
    InvalidViewport { width: f64, height: f64 },
    InvalidFly(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ResolutionOutOfRange(res) => write!(
                f,
                "resolution {res} outside {}..={}",
                RESOLUTION_RANGE.start(),
                RESOLUTION_RANGE.end()
            ),
            ConfigError::InvalidViewport { width, height } => {
                write!(f, "invalid viewport {width}x{height}")
            }
            ConfigError::InvalidFly(msg) => write!(f, "invalid fly-to settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Camera framing used when a selection is confirmed or cleared.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlySettings {
    pub viewport: Viewport,
    pub padding_px: f64,
    pub max_zoom: f64,
    pub duration_ms: u32,
    pub reset_duration_ms: u32,
}

impl Default for FlySettings {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1024.0, 768.0),
            padding_px: 60.0,
            max_zoom: 16.0,
            duration_ms: 1500,
            reset_duration_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub overpass_url: String,
    pub resolution: u8,
    pub fly: FlySettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            overpass_url: OVERPASS_ENDPOINT.to_string(),
            resolution: DEFAULT_RESOLUTION,
            fly: FlySettings::default(),
        }
    }
}

impl ExplorerConfig {
    /// Reads the `OVERPASS_URL` and `EXPLORER_*` environment variables.
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            overpass_url: lookup("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            resolution: parsed(&lookup, "EXPLORER_RESOLUTION", defaults.resolution),
            fly: FlySettings {
                viewport: Viewport::new(
                    parsed(&lookup, "EXPLORER_VIEWPORT_WIDTH", defaults.fly.viewport.width_px),
                    parsed(&lookup, "EXPLORER_VIEWPORT_HEIGHT", defaults.fly.viewport.height_px),
                ),
                padding_px: parsed(&lookup, "EXPLORER_FLY_PADDING_PX", defaults.fly.padding_px),
                max_zoom: parsed(&lookup, "EXPLORER_FLY_MAX_ZOOM", defaults.fly.max_zoom),
                duration_ms: parsed(&lookup, "EXPLORER_FLY_DURATION_MS", defaults.fly.duration_ms),
                reset_duration_ms: parsed(
                    &lookup,
                    "EXPLORER_RESET_DURATION_MS",
                    defaults.fly.reset_duration_ms,
                ),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !RESOLUTION_RANGE.contains(&self.resolution) {
            return Err(ConfigError::ResolutionOutOfRange(self.resolution));
        }
        let vp = self.fly.viewport;
        if !(vp.width_px > 0.0 && vp.height_px > 0.0) {
            return Err(ConfigError::InvalidViewport {
                width: vp.width_px,
                height: vp.height_px,
            });
        }
        if !(self.fly.padding_px >= 0.0) {
            return Err(ConfigError::InvalidFly(format!(
                "padding {} px",
                self.fly.padding_px
            )));
        }
        if !self.fly.max_zoom.is_finite() {
            return Err(ConfigError::InvalidFly(format!(
                "max zoom {}",
                self.fly.max_zoom
            )));
        }
        Ok(())
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
