//! RGBA colors and the preset palette selected by the color index.

use serde::{Deserialize, Serialize};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    /// Create a new color with explicit RGBA components.
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Create an opaque color (alpha = 255).
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    /// Same color with alpha scaled from a 0.0-1.0 factor.
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let alpha = (factor * 255.0).clamp(0.0, 255.0) as u8;
        self.with_alpha(alpha)
    }

    /// `#RRGGBB`, alpha ignored.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
}

/// Fixed palette entries selected by color indices 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorPreset {
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl ColorPreset {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0, 255, 0),
            Self::Yellow => (255, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Cyan => (0, 255, 255),
        }
    }
}

/// How the color index picks the crosshair color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSelection {
    /// One of the fixed presets, overriding the encoded RGB
    Preset(ColorPreset),
    /// The encoded RGB bytes
    Custom,
}

impl ColorSelection {
    /// Interpret a 3-bit color index.
    ///
    /// Index 0 and 5 keep the encoded RGB. Unassigned slots fall back to green.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Preset(ColorPreset::Green),
            2 => Self::Preset(ColorPreset::Yellow),
            3 => Self::Preset(ColorPreset::Blue),
            4 => Self::Preset(ColorPreset::Cyan),
            0 | 5 => Self::Custom,
            other => {
                tracing::debug!("Unassigned color index {}, using the green preset", other);
                Self::Preset(ColorPreset::Green)
            }
        }
    }

    /// Apply the selection to the encoded color, keeping its alpha
    pub fn resolve(self, encoded: Rgba) -> Rgba {
        match self {
            Self::Preset(preset) => {
                let (red, green, blue) = preset.rgb();
                Rgba::new(red, green, blue, encoded.alpha)
            }
            Self::Custom => encoded,
        }
    }
}
