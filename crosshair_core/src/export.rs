//! Text exports of a decoded configuration: game console commands and JSON.

use crate::color::Rgba;
use crate::layout::CrosshairConfig;
use crate::share_code::ShareCode;
use serde::Serialize;
use std::fmt::Write;

/// First line of the console export
pub const CONSOLE_HEADER: &str = "// CS:GO Console Commands for this crosshair";

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Render the configuration as console commands, one cvar per line.
pub fn to_console_commands(config: &CrosshairConfig) -> String {
    let c = config;
    let mut out = String::with_capacity(768);
    let mut line = |name: &str, value: &dyn std::fmt::Display| {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{name} {value}");
    };

    line("cl_crosshairstyle", &(c.style as u8));
    line("cl_crosshairdot", &flag(c.has_center_dot));
    line("cl_crosshairsize", &c.length);
    line("cl_crosshairthickness", &c.thickness);
    line("cl_crosshairgap", &c.gap);
    line("cl_crosshair_drawoutline", &flag(c.has_outline));
    line("cl_crosshair_outlinethickness", &c.outline);
    line("cl_crosshaircolor", &c.color_index);
    line("cl_crosshaircolor_r", &c.color.red);
    line("cl_crosshaircolor_g", &c.color.green);
    line("cl_crosshaircolor_b", &c.color.blue);
    line("cl_crosshairusealpha", &flag(c.has_alpha));
    line("cl_crosshairalpha", &c.color.alpha);
    line("cl_crosshair_t", &flag(c.is_t_style));
    line("cl_crosshairgap_useweaponvalue", &flag(c.deployed_weapon_gap_enabled));
    line("cl_fixedcrosshairgap", &c.fixed_crosshair_gap);
    line("cl_crosshair_dynamic_splitdist", &c.split_distance);
    line("cl_crosshair_recoil", &flag(c.follow_recoil));
    line("cl_crosshair_dynamic_splitalpha_innermod", &c.inner_split_alpha);
    line("cl_crosshair_dynamic_splitalpha_outermod", &c.outer_split_alpha);
    line("cl_crosshair_dynamic_maxdist_splitratio", &c.split_size_ratio);

    format!("{CONSOLE_HEADER}\n{out}")
}

#[derive(Debug, Serialize)]
struct ColorExport {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
    hex: String,
}

impl From<Rgba> for ColorExport {
    fn from(color: Rgba) -> Self {
        Self {
            red: color.red,
            green: color.green,
            blue: color.blue,
            alpha: color.alpha,
            hex: color.hex(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    share_code: Option<&'a str>,
    style: &'static str,
    style_value: u8,
    has_center_dot: bool,
    length: f32,
    thickness: f32,
    gap: f32,
    has_outline: bool,
    outline: f32,
    color: ColorExport,
    color_index: u8,
    has_alpha: bool,
    split_distance: u8,
    follow_recoil: bool,
    fixed_crosshair_gap: f32,
    deployed_weapon_gap_enabled: bool,
    inner_split_alpha: f32,
    outer_split_alpha: f32,
    split_size_ratio: f32,
    is_t_style: bool,
}

impl<'a> ConfigExport<'a> {
    fn new(config: &CrosshairConfig, share_code: Option<&'a ShareCode>) -> Self {
        Self {
            share_code: share_code.map(ShareCode::as_str),
            style: config.style.display_name(),
            style_value: config.style as u8,
            has_center_dot: config.has_center_dot,
            length: config.length,
            thickness: config.thickness,
            gap: config.gap,
            has_outline: config.has_outline,
            outline: config.outline,
            color: config.color.into(),
            color_index: config.color_index,
            has_alpha: config.has_alpha,
            split_distance: config.split_distance,
            follow_recoil: config.follow_recoil,
            fixed_crosshair_gap: config.fixed_crosshair_gap,
            deployed_weapon_gap_enabled: config.deployed_weapon_gap_enabled,
            inner_split_alpha: config.inner_split_alpha,
            outer_split_alpha: config.outer_split_alpha,
            split_size_ratio: config.split_size_ratio,
            is_t_style: config.is_t_style,
        }
    }
}

/// Pretty-printed JSON with camelCase keys. `shareCode` is included when given.
pub fn to_json(
    config: &CrosshairConfig,
    share_code: Option<&ShareCode>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ConfigExport::new(config, share_code))
}
