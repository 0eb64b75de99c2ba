/*!
Bit-field layout of the decoded share-code buffer.

The buffer is read through a single table of `(field, byte, shift, width,
transform)` entries. Every entry is extracted by the same routine, so adding
or moving a field is a one-line table change.

| Byte  | Bits | Field                                  |
|-------|------|----------------------------------------|
| 2     | 0-7  | gap (signed, /10)                      |
| 3     | 0-7  | outline thickness (/2)                 |
| 4-7   | 0-7  | red, green, blue, alpha                |
| 8     | 0-6  | split distance                         |
| 8     | 7    | follow recoil                          |
| 9     | 0-7  | fixed crosshair gap (signed, /10)      |
| 10    | 0-2  | color index                            |
| 10    | 3    | draw outline                           |
| 10    | 4-7  | inner split alpha (/10, clamped)       |
| 11    | 0-3  | outer split alpha (/10, clamped)       |
| 11    | 4-7  | split size ratio (/10, clamped)        |
| 12    | 0-5  | thickness (/10)                        |
| 13    | 1-3  | style                                  |
| 13    | 4-7  | center dot, deployed gap, alpha, T     |
| 14-15 | 13   | length (/10)                           |
*/

use crate::color::{ColorSelection, Rgba};
use crate::error::{CrosshairError, Result};
use crate::protocol::MIN_LAYOUT_LEN;
use serde::{Deserialize, Serialize};

/// Crosshair style, packed in bits 1-3 of byte 13
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CrosshairStyle {
    #[default]
    Default = 0,
    ClassicStatic = 1,
    ClassicDynamic = 2,
    FullStatic = 3,
    Classic = 4,
}

impl CrosshairStyle {
    /// Map the 3-bit style value. Values above 4 are read as Classic.
    pub fn from_u8(value: u8) -> Self {
        match value & 0b111 {
            0 => Self::Default,
            1 => Self::ClassicStatic,
            2 => Self::ClassicDynamic,
            3 => Self::FullStatic,
            _ => Self::Classic,
        }
    }

    /// Styles whose arms move with weapon spread and recoil
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Default | Self::ClassicDynamic | Self::Classic)
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::ClassicStatic => "Classic Static",
            Self::ClassicDynamic => "Classic Dynamic",
            Self::FullStatic => "Full Static",
            Self::Classic => "Classic",
        }
    }
}

/// Semantic fields carried by the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Gap,
    Outline,
    Red,
    Green,
    Blue,
    Alpha,
    SplitDistance,
    FollowRecoil,
    FixedCrosshairGap,
    ColorIndex,
    HasOutline,
    InnerSplitAlpha,
    OuterSplitAlpha,
    SplitSizeRatio,
    Thickness,
    Style,
    HasCenterDot,
    DeployedWeaponGapEnabled,
    HasAlpha,
    IsTStyle,
    Length,
}

impl Field {
    /// Parse a field name (case-insensitive, underscores optional)
    pub fn from_name(s: &str) -> Option<Self> {
        let wanted = s.to_lowercase().replace('_', "");
        LAYOUT
            .iter()
            .map(|spec| spec.field)
            .find(|field| field.as_str().replace('_', "") == wanted)
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Outline => "outline",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Alpha => "alpha",
            Self::SplitDistance => "split_distance",
            Self::FollowRecoil => "follow_recoil",
            Self::FixedCrosshairGap => "fixed_crosshair_gap",
            Self::ColorIndex => "color_index",
            Self::HasOutline => "has_outline",
            Self::InnerSplitAlpha => "inner_split_alpha",
            Self::OuterSplitAlpha => "outer_split_alpha",
            Self::SplitSizeRatio => "split_size_ratio",
            Self::Thickness => "thickness",
            Self::Style => "style",
            Self::HasCenterDot => "has_center_dot",
            Self::DeployedWeaponGapEnabled => "deployed_weapon_gap_enabled",
            Self::HasAlpha => "has_alpha",
            Self::IsTStyle => "is_t_style",
            Self::Length => "length",
        }
    }
}

/// How raw bits become a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Raw unsigned integer
    Integer,
    /// Single bit
    Flag,
    /// Unsigned fixed point, one decimal place
    Tenths,
    /// Two's complement, one decimal place
    SignedTenths,
    /// Unsigned fixed point, half-unit steps
    Halves,
    /// Unsigned fixed point, one decimal place, clamped to [0, 1]
    ClampedTenths,
}

/// A decoded field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Flag(bool),
    Integer(u32),
    Number(f32),
}

impl FieldValue {
    pub fn as_bool(self) -> bool {
        match self {
            Self::Flag(b) => b,
            Self::Integer(i) => i != 0,
            Self::Number(n) => n != 0.0,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Flag(b) => b as u8,
            Self::Integer(i) => i.min(u8::MAX as u32) as u8,
            Self::Number(n) => n.clamp(0.0, u8::MAX as f32) as u8,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Self::Flag(b) => b as u8 as f32,
            Self::Integer(i) => i as f32,
            Self::Number(n) => n,
        }
    }
}

impl Transform {
    /// Apply the transform to `raw`, which holds `width` extracted bits
    pub fn apply(self, raw: u32, width: u8) -> FieldValue {
        match self {
            Self::Integer => FieldValue::Integer(raw),
            Self::Flag => FieldValue::Flag(raw != 0),
            Self::Tenths => FieldValue::Number(raw as f32 / 10.0),
            Self::SignedTenths => FieldValue::Number(sign_extend(raw, width) as f32 / 10.0),
            Self::Halves => FieldValue::Number(raw as f32 / 2.0),
            Self::ClampedTenths => FieldValue::Number((raw as f32 / 10.0).clamp(0.0, 1.0)),
        }
    }
}

/// Reinterpret the low `width` bits of `raw` as two's complement
fn sign_extend(raw: u32, width: u8) -> i32 {
    let unused = 32 - u32::from(width);
    ((raw << unused) as i32) >> unused
}

/// A run of bits starting at `shift` within `byte`.
///
/// Fields wider than the rest of their byte continue into the following
/// bytes, least significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub byte: usize,
    pub shift: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(byte: usize, shift: u8, width: u8) -> Self {
        Self { byte, shift, width }
    }

    /// Index one past the last byte this field touches
    pub const fn end(&self) -> usize {
        self.byte + (self.shift as usize + self.width as usize + 7) / 8
    }

    /// Extract the field from a buffer; bytes past the end read as zero
    pub fn extract(&self, bytes: &[u8]) -> u32 {
        let mut word: u32 = 0;
        for (i, index) in (self.byte..self.end()).enumerate() {
            let byte = bytes.get(index).copied().unwrap_or(0);
            word |= u32::from(byte) << (i * 8);
        }
        let mask = (1u32 << self.width) - 1;
        (word >> self.shift) & mask
    }
}

/// One entry of the layout table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub bits: BitField,
    pub transform: Transform,
}

impl FieldSpec {
    const fn new(field: Field, byte: usize, shift: u8, width: u8, transform: Transform) -> Self {
        Self {
            field,
            bits: BitField::new(byte, shift, width),
            transform,
        }
    }

    /// Extract and transform this field
    pub fn decode(&self, bytes: &[u8]) -> FieldValue {
        self.transform.apply(self.bits.extract(bytes), self.bits.width)
    }
}

/// The canonical field layout
pub const LAYOUT: &[FieldSpec] = &[
    FieldSpec::new(Field::Gap, 2, 0, 8, Transform::SignedTenths),
    FieldSpec::new(Field::Outline, 3, 0, 8, Transform::Halves),
    FieldSpec::new(Field::Red, 4, 0, 8, Transform::Integer),
    FieldSpec::new(Field::Green, 5, 0, 8, Transform::Integer),
    FieldSpec::new(Field::Blue, 6, 0, 8, Transform::Integer),
    FieldSpec::new(Field::Alpha, 7, 0, 8, Transform::Integer),
    FieldSpec::new(Field::SplitDistance, 8, 0, 7, Transform::Integer),
    FieldSpec::new(Field::FollowRecoil, 8, 7, 1, Transform::Flag),
    FieldSpec::new(Field::FixedCrosshairGap, 9, 0, 8, Transform::SignedTenths),
    FieldSpec::new(Field::ColorIndex, 10, 0, 3, Transform::Integer),
    FieldSpec::new(Field::HasOutline, 10, 3, 1, Transform::Flag),
    FieldSpec::new(Field::InnerSplitAlpha, 10, 4, 4, Transform::ClampedTenths),
    FieldSpec::new(Field::OuterSplitAlpha, 11, 0, 4, Transform::ClampedTenths),
    FieldSpec::new(Field::SplitSizeRatio, 11, 4, 4, Transform::ClampedTenths),
    FieldSpec::new(Field::Thickness, 12, 0, 6, Transform::Tenths),
    FieldSpec::new(Field::Style, 13, 1, 3, Transform::Integer),
    FieldSpec::new(Field::HasCenterDot, 13, 4, 1, Transform::Flag),
    FieldSpec::new(Field::DeployedWeaponGapEnabled, 13, 5, 1, Transform::Flag),
    FieldSpec::new(Field::HasAlpha, 13, 6, 1, Transform::Flag),
    FieldSpec::new(Field::IsTStyle, 13, 7, 1, Transform::Flag),
    FieldSpec::new(Field::Length, 14, 0, 13, Transform::Tenths),
];

/// Look up the layout entry for a field
pub fn spec_for(field: Field) -> Option<&'static FieldSpec> {
    LAYOUT.iter().find(|spec| spec.field == field)
}

/// Crosshair configuration decoded from a share code
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrosshairConfig {
    pub style: CrosshairStyle,
    pub has_center_dot: bool,
    pub length: f32,
    pub thickness: f32,
    pub gap: f32,
    pub has_outline: bool,
    pub outline: f32,
    /// Encoded color with any preset override applied. Alpha is the raw byte.
    pub color: Rgba,
    pub color_index: u8,
    pub has_alpha: bool,
    pub split_distance: u8,
    pub follow_recoil: bool,
    pub fixed_crosshair_gap: f32,
    pub deployed_weapon_gap_enabled: bool,
    pub inner_split_alpha: f32,
    pub outer_split_alpha: f32,
    pub split_size_ratio: f32,
    pub is_t_style: bool,
}

impl CrosshairConfig {
    /// Decode a configuration from a buffer of at least 16 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_LAYOUT_LEN {
            return Err(CrosshairError::insufficient_data(MIN_LAYOUT_LEN, bytes.len()));
        }

        let mut config = Self::default();
        for spec in LAYOUT {
            config.set(spec.field, spec.decode(bytes));
        }

        config.color = ColorSelection::from_index(config.color_index).resolve(config.color);

        Ok(config)
    }

    fn set(&mut self, field: Field, value: FieldValue) {
        match field {
            Field::Gap => self.gap = value.as_f32(),
            Field::Outline => self.outline = value.as_f32(),
            Field::Red => self.color.red = value.as_u8(),
            Field::Green => self.color.green = value.as_u8(),
            Field::Blue => self.color.blue = value.as_u8(),
            Field::Alpha => self.color.alpha = value.as_u8(),
            Field::SplitDistance => self.split_distance = value.as_u8(),
            Field::FollowRecoil => self.follow_recoil = value.as_bool(),
            Field::FixedCrosshairGap => self.fixed_crosshair_gap = value.as_f32(),
            Field::ColorIndex => self.color_index = value.as_u8(),
            Field::HasOutline => self.has_outline = value.as_bool(),
            Field::InnerSplitAlpha => self.inner_split_alpha = value.as_f32(),
            Field::OuterSplitAlpha => self.outer_split_alpha = value.as_f32(),
            Field::SplitSizeRatio => self.split_size_ratio = value.as_f32(),
            Field::Thickness => self.thickness = value.as_f32(),
            Field::Style => self.style = CrosshairStyle::from_u8(value.as_u8()),
            Field::HasCenterDot => self.has_center_dot = value.as_bool(),
            Field::DeployedWeaponGapEnabled => self.deployed_weapon_gap_enabled = value.as_bool(),
            Field::HasAlpha => self.has_alpha = value.as_bool(),
            Field::IsTStyle => self.is_t_style = value.as_bool(),
            Field::Length => self.length = value.as_f32(),
        }
    }

    /// How the color index selected the color
    pub fn color_selection(&self) -> ColorSelection {
        ColorSelection::from_index(self.color_index)
    }

    /// Color used for drawing: alpha only applies when `has_alpha` is set
    pub fn draw_color(&self) -> Rgba {
        if self.has_alpha {
            self.color
        } else {
            self.color.with_alpha(255)
        }
    }

    /// Gap value the renderer should use before scaling and mapping
    pub fn effective_gap(&self) -> f32 {
        if self.uses_fixed_gap() {
            self.fixed_crosshair_gap
        } else {
            self.gap
        }
    }

    /// Classic Static with the deployed weapon gap enabled uses the fixed gap
    pub fn uses_fixed_gap(&self) -> bool {
        self.style == CrosshairStyle::ClassicStatic && self.deployed_weapon_gap_enabled
    }
}

/// Decode a configuration from a buffer of at least 16 bytes
pub fn decode_config(bytes: &[u8]) -> Result<CrosshairConfig> {
    CrosshairConfig::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPreset;

    fn buffer() -> Vec<u8> {
        vec![0u8; crate::protocol::DECODED_BUFFER_LEN]
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(CrosshairStyle::from_u8(0), CrosshairStyle::Default);
        assert_eq!(CrosshairStyle::from_u8(1), CrosshairStyle::ClassicStatic);
        assert_eq!(CrosshairStyle::from_u8(3), CrosshairStyle::FullStatic);
        assert_eq!(CrosshairStyle::from_u8(4), CrosshairStyle::Classic);
        assert_eq!(CrosshairStyle::from_u8(7), CrosshairStyle::Classic);
    }

    #[test]
    fn test_style_classification() {
        assert!(CrosshairStyle::Default.is_dynamic());
        assert!(CrosshairStyle::ClassicDynamic.is_dynamic());
        assert!(CrosshairStyle::Classic.is_dynamic());
        assert!(!CrosshairStyle::ClassicStatic.is_dynamic());
        assert!(!CrosshairStyle::FullStatic.is_dynamic());
    }

    #[test]
    fn test_field_name_parsing() {
        assert_eq!(Field::from_name("gap"), Some(Field::Gap));
        assert_eq!(Field::from_name("Split_Distance"), Some(Field::SplitDistance));
        assert_eq!(Field::from_name("isTStyle"), Some(Field::IsTStyle));
        assert_eq!(Field::from_name("invalid"), None);
    }

    #[test]
    fn test_table_covers_every_field_once() {
        for spec in LAYOUT {
            let count = LAYOUT.iter().filter(|s| s.field == spec.field).count();
            assert_eq!(count, 1, "{:?} appears {} times", spec.field, count);
            assert!(spec.bits.end() <= MIN_LAYOUT_LEN, "{:?} reads past the minimum", spec.field);
            assert_eq!(spec_for(spec.field), Some(spec));
        }
        assert_eq!(LAYOUT.len(), 21);

        let length = spec_for(Field::Length).unwrap();
        assert_eq!(length.bits, BitField::new(14, 0, 13));
        assert_eq!(length.transform, Transform::Tenths);
    }

    #[test]
    fn test_bitfield_extraction() {
        let bytes = [0b1010_0110u8, 0xFF];
        assert_eq!(BitField::new(0, 0, 3).extract(&bytes), 0b110);
        assert_eq!(BitField::new(0, 1, 3).extract(&bytes), 0b011);
        assert_eq!(BitField::new(0, 4, 4).extract(&bytes), 0b1010);
        assert_eq!(BitField::new(0, 7, 1).extract(&bytes), 1);
        // Spans both bytes, top three bits of the second byte dropped
        assert_eq!(BitField::new(0, 0, 13).extract(&bytes), 0x1FA6);
        // Reads past the end are zero
        assert_eq!(BitField::new(1, 0, 13).extract(&bytes), 0xFF);
    }

    #[test]
    fn test_sign_extension() {
        assert_eq!(sign_extend(0x7F, 8), 127);
        assert_eq!(sign_extend(0x80, 8), -128);
        assert_eq!(sign_extend(0xFF, 8), -1);
        assert_eq!(sign_extend(0b111, 3), -1);
    }

    #[test]
    fn test_all_zero_buffer() {
        let config = decode_config(&vec![0u8; MIN_LAYOUT_LEN]).unwrap();
        assert_eq!(config, CrosshairConfig::default());
        assert_eq!(config.style, CrosshairStyle::Default);
        assert_eq!(config.color, Rgba::new(0, 0, 0, 0));
        assert_eq!(config.length, 0.0);
        assert!(!config.has_outline && !config.has_center_dot && !config.is_t_style);
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            decode_config(&[0u8; 15]),
            Err(CrosshairError::insufficient_data(16, 15))
        );
        assert!(decode_config(&[]).is_err());
    }

    #[test]
    fn test_signed_fields() {
        let mut bytes = buffer();
        bytes[2] = 234; // -22
        bytes[9] = 0x80; // -128
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.gap, -2.2);
        assert_eq!(config.fixed_crosshair_gap, -12.8);

        bytes[2] = 127;
        bytes[9] = 30;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.gap, 12.7);
        assert_eq!(config.fixed_crosshair_gap, 3.0);
    }

    #[test]
    fn test_split_byte() {
        let mut bytes = buffer();
        bytes[8] = 0x83;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.split_distance, 3);
        assert!(config.follow_recoil);

        bytes[8] = 0x7F;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.split_distance, 127);
        assert!(!config.follow_recoil);
    }

    #[test]
    fn test_split_alpha_clamping() {
        let mut bytes = buffer();
        bytes[10] = 0xF5;
        bytes[11] = 0xFF;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.inner_split_alpha, 1.0);
        assert_eq!(config.outer_split_alpha, 1.0);
        assert_eq!(config.split_size_ratio, 1.0);

        bytes[10] = 0x55;
        bytes[11] = 0x3A;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.inner_split_alpha, 0.5);
        assert_eq!(config.outer_split_alpha, 1.0);
        assert_eq!(config.split_size_ratio, 0.3);
    }

    #[test]
    fn test_preset_overrides_raw_rgb() {
        let mut bytes = buffer();
        bytes[4..8].copy_from_slice(&[255, 0, 255, 200]);
        bytes[10] = 0x01;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.color_index, 1);
        assert_eq!(config.color_selection(), ColorSelection::Preset(ColorPreset::Green));
        assert_eq!((config.color.red, config.color.green, config.color.blue), (0, 255, 0));
        assert_eq!(config.color.alpha, 200);
    }

    #[test]
    fn test_custom_color_and_unassigned_index() {
        let mut bytes = buffer();
        bytes[4..8].copy_from_slice(&[50, 250, 84, 200]);
        bytes[10] = 0x05;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.color, Rgba::new(50, 250, 84, 200));

        bytes[10] = 0x07;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.color_index, 7);
        assert_eq!(config.color, Rgba::new(0, 255, 0, 200));
    }

    #[test]
    fn test_flag_byte() {
        let mut bytes = buffer();
        bytes[13] = 0xA2;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.style, CrosshairStyle::ClassicStatic);
        assert!(!config.has_center_dot);
        assert!(config.deployed_weapon_gap_enabled);
        assert!(!config.has_alpha);
        assert!(config.is_t_style);

        bytes[13] = 0x54;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.style, CrosshairStyle::ClassicDynamic);
        assert!(config.has_center_dot);
        assert!(config.has_alpha);
        assert!(!config.is_t_style);
    }

    #[test]
    fn test_low_style_bit_is_ignored() {
        let mut bytes = buffer();
        bytes[13] = 0x05;
        assert_eq!(decode_config(&bytes).unwrap().style, CrosshairStyle::ClassicDynamic);
    }

    #[test]
    fn test_thickness_and_length() {
        let mut bytes = buffer();
        bytes[12] = 0xC5; // top two bits are not part of thickness
        bytes[14] = 0x00;
        bytes[15] = 0xE1; // top three bits are not part of length
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.thickness, 0.5);
        assert_eq!(config.length, 25.6);
    }

    #[test]
    fn test_outline_halves() {
        let mut bytes = buffer();
        bytes[3] = 3;
        assert_eq!(decode_config(&bytes).unwrap().outline, 1.5);
    }

    #[test]
    fn test_alpha_gating() {
        let mut bytes = buffer();
        bytes[4..8].copy_from_slice(&[10, 20, 30, 40]);
        bytes[10] = 0x05;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.draw_color().alpha, 255);

        bytes[13] = 0x40;
        let config = decode_config(&bytes).unwrap();
        assert_eq!(config.draw_color().alpha, 40);
    }

    #[test]
    fn test_fixed_gap_selection() {
        let mut config = CrosshairConfig {
            gap: 1.0,
            fixed_crosshair_gap: -1.5,
            style: CrosshairStyle::ClassicStatic,
            ..Default::default()
        };
        assert_eq!(config.effective_gap(), 1.0);

        config.deployed_weapon_gap_enabled = true;
        assert_eq!(config.effective_gap(), -1.5);

        config.style = CrosshairStyle::ClassicDynamic;
        assert_eq!(config.effective_gap(), 1.0);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let mut bytes = buffer();
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37);
        }
        assert_eq!(decode_config(&bytes).unwrap(), decode_config(&bytes).unwrap());
    }
}
