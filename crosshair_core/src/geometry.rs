/*!
Render geometry derived from a configuration and a scale factor.

All quantities are `f32`, matching the configuration fields. Arm sizes are
rounded up to odd pixel counts so each arm is symmetric around its center
line.
*/

use crate::layout::CrosshairConfig;
use serde::{Deserialize, Serialize};

/// Dot diameter relative to the line thickness
pub const DOT_SIZE_MULTIPLIER: f32 = 1.5;

/// Round up to the next odd integer (`ceil`, plus one if even)
pub fn round_up_to_odd(value: f32) -> f32 {
    let ceiled = value.ceil();
    if ceiled % 2.0 == 0.0 {
        ceiled + 1.0
    } else {
        ceiled
    }
}

/// Map a configured gap onto the game's pixel gap curve.
///
/// Above -5 the gap is offset by 5. Below -5 the offset is reflected and
/// shifted down by 5. Exactly -5 maps to zero.
pub fn map_gap_value(x: f32) -> f32 {
    if x > -5.0 {
        x + 5.0
    } else if x < -5.0 {
        -(x + 5.0) - 5.0
    } else {
        0.0
    }
}

/// Length, thickness, gap and outline multiplied by the scale factor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaledDimensions {
    pub length: f32,
    pub thickness: f32,
    pub gap: f32,
    pub outline: f32,
}

impl ScaledDimensions {
    /// Scale the configuration; the gap is the effective gap (fixed or regular)
    pub fn new(config: &CrosshairConfig, scale: f32) -> Self {
        Self {
            length: config.length * scale,
            thickness: config.thickness * scale,
            gap: config.effective_gap() * scale,
            outline: config.outline * scale,
        }
    }
}

/// `round_up_to_odd(2 * length)`
pub fn render_size(scaled_length: f32) -> f32 {
    round_up_to_odd(2.0 * scaled_length)
}

/// `floor(round_up_to_odd(2 * thickness) / 2)`
pub fn render_thickness(scaled_thickness: f32) -> f32 {
    (round_up_to_odd(2.0 * scaled_thickness) / 2.0).floor()
}

/// `round_up_to_odd(2 * map_gap_value(gap))`
pub fn render_gap(scaled_gap: f32) -> f32 {
    round_up_to_odd(2.0 * map_gap_value(scaled_gap))
}

/// Pixel quantities used to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderGeometry {
    /// Full odd size across both arms of one axis
    pub size: f32,
    /// Length of a single arm (`size / 2`)
    pub arm_length: f32,
    /// Line width of the main pass
    pub thickness: f32,
    /// Distance between opposite arms
    pub gap: f32,
    /// Outline thickness added on each side
    pub outline: f32,
    /// Vertical offset of each split arm set
    pub split_offset: f32,
}

impl RenderGeometry {
    /// Compute the geometry for a configuration at a given scale
    pub fn compute(config: &CrosshairConfig, scale: f32) -> Self {
        let scaled = ScaledDimensions::new(config, scale);
        let size = render_size(scaled.length);

        Self {
            size,
            arm_length: size / 2.0,
            thickness: render_thickness(scaled.thickness),
            gap: render_gap(scaled.gap),
            outline: scaled.outline,
            split_offset: f32::from(config.split_distance) * scale,
        }
    }

    pub fn half_gap(&self) -> f32 {
        self.gap / 2.0
    }

    /// Pen width of the outline pass
    pub fn outline_width(&self) -> f32 {
        self.thickness + 2.0 * self.outline
    }

    pub fn dot_diameter(&self) -> f32 {
        self.thickness * DOT_SIZE_MULTIPLIER
    }

    pub fn outline_dot_diameter(&self) -> f32 {
        self.dot_diameter() + 2.0 * self.outline
    }
}
