/*!
# Crosshair Core

Decoding, geometry and frame rendering for game crosshair share codes.

## Core Types

- [`ShareCode`] - validated `CSGO-XXXXX-...` share code
- [`CrosshairConfig`] - configuration decoded from the share-code bit-fields
- [`RenderGeometry`] - pixel quantities derived from a configuration and a scale factor
- [`RenderEngine`] - per-frame renderer with recoil simulation

## Modules

- [`share_code`] - share-code validation and base-57 decoding
- [`color`] - RGBA colors and the preset palette
- [`layout`] - bit-field table and configuration decoding
- [`geometry`] - odd rounding, gap mapping and render geometry
- [`recoil`] - recoil phase state and step function
- [`render`] - draw primitives, drawing-surface trait and the render engine
- [`export`] - console-command and JSON exports
- [`error`] - error types
*/

pub mod color;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod recoil;
pub mod render;
pub mod share_code;

// Re-export commonly used types
pub use color::{ColorPreset, ColorSelection, Rgba};
pub use error::{CrosshairError, Result};
pub use export::{to_console_commands, to_json};
pub use geometry::{map_gap_value, round_up_to_odd, RenderGeometry};
pub use layout::{decode_config, CrosshairConfig, CrosshairStyle};
pub use recoil::{RecoilParams, RecoilState};
pub use render::{DrawCommand, DrawSurface, RenderEngine, RenderMode, RenderStats};
pub use share_code::{checksum_matches, decode_share_code, decode_share_code_padded, ShareCode};

/// Version information for the crosshair core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Literal prefix of every share code
    pub const SHARE_CODE_PREFIX: &str = "CSGO";

    /// Share-code digit alphabet (base 57, no `I`, `l`, `g`, `0`, `1`)
    pub const ALPHABET: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZabcdefhijkmnopqrstuvwxyz23456789";

    /// Number of base-57 digits in a share code
    pub const SHARE_CODE_DIGITS: usize = 25;

    /// Length of the decoded buffer: checksum byte plus 17 payload bytes
    pub const DECODED_BUFFER_LEN: usize = 18;

    /// Buffer length used by the older 19-byte decoding
    pub const LEGACY_BUFFER_LEN: usize = 19;

    /// Minimum buffer length the bit-field layout reads from
    pub const MIN_LAYOUT_LEN: usize = 16;
}

/// A share code decoded all the way to a configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCrosshair {
    pub share_code: ShareCode,
    pub raw: Vec<u8>,
    pub config: CrosshairConfig,
}

impl DecodedCrosshair {
    /// Check the checksum byte of the raw buffer
    pub fn checksum_ok(&self) -> bool {
        checksum_matches(&self.raw)
    }

    /// Console commands reproducing this crosshair
    pub fn console_commands(&self) -> String {
        to_console_commands(&self.config)
    }

    /// JSON export including the share code
    pub fn to_json(&self) -> serde_json::Result<String> {
        to_json(&self.config, Some(&self.share_code))
    }
}

/// Decode a share code into its raw buffer and configuration
pub fn decode(input: &str) -> Result<DecodedCrosshair> {
    let share_code = ShareCode::parse(input)?;
    let raw = share_code.to_bytes();
    let config = decode_config(&raw)?;

    Ok(DecodedCrosshair {
        share_code,
        raw,
        config,
    })
}
