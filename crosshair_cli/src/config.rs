/*!
Configuration management for the crosshair tool.
*/

use anyhow::{Context, Result};
use crosshair_core::{RecoilParams, RenderMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub overlay: OverlayConfig,
    pub preview: PreviewConfig,
    pub recoil: RecoilConfig,
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            preview: PreviewConfig::default(),
            recoil: RecoilConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file as TOML: {}", path.as_ref().display())
        })?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config file at {}, using defaults", path.as_ref().display());
            Ok(Self::new())
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What to draw and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Share code to load; the fallback dot is drawn without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,

    /// Display scale factor applied to every dimension
    pub scale_factor: f32,

    /// Which parts of the crosshair are drawn
    pub render_mode: RenderMode,

    /// Animate the vertical arms for recoil-following styles
    pub simulate_recoil: bool,

    /// Crosshair center on the surface
    pub center_x: f32,
    pub center_y: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            share_code: None,
            scale_factor: 1.0,
            render_mode: RenderMode::Full,
            simulate_recoil: false,
            center_x: 960.0,
            center_y: 540.0,
        }
    }
}

/// Render preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Frame rate of the preview clock
    pub frames_per_second: u32,

    /// Frames rendered when no count is given on the command line
    pub frame_limit: u64,

    /// Frames buffered between the render and writer threads
    pub channel_capacity: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            frame_limit: 1,
            channel_capacity: 64,
        }
    }
}

/// Recoil animation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoilConfig {
    /// Oscillation speed in cycles per second
    pub speed_hz: f64,

    /// Peak vertical offset in pixels
    pub amplitude: f64,
}

impl RecoilConfig {
    pub fn params(&self) -> RecoilParams {
        RecoilParams {
            speed_hz: self.speed_hz,
            amplitude: self.amplitude,
        }
    }
}

impl Default for RecoilConfig {
    fn default() -> Self {
        let params = RecoilParams::default();
        Self {
            speed_hz: params.speed_hz,
            amplitude: params.amplitude,
        }
    }
}
