//! End-to-end decoding and rendering of real share codes.

use crosshair_core::protocol::{DECODED_BUFFER_LEN, LEGACY_BUFFER_LEN};
use crosshair_core::render::Point;
use crosshair_core::{
    decode, decode_share_code, decode_share_code_padded, CrosshairConfig, CrosshairError,
    CrosshairStyle, DrawCommand, DrawSurface, RenderEngine, RenderMode, Rgba,
};

const DYNAMIC_SPLIT: &str = "CSGO-kZRSL-TEe5b-GeyVE-48ubk-kcRVP";
const STATIC_T_STYLE: &str = "CSGO-emDEA-LNt9B-o6hr3-EdLv3-LRVeL";
const CLAMPED_SPLIT: &str = "CSGO-3SQGp-4pA3w-Ombj4-aYSXr-BWRZQ";
const ALL_ZERO: &str = "CSGO-AAAAA-AAAAA-AAAAA-AAAAA-AAAAA";
const ALL_MAX: &str = "CSGO-99999-99999-99999-99999-99999";

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

/// Surface that tallies what it is asked to draw
#[derive(Default)]
struct TallySurface {
    lines: Vec<(Point, Point, Rgba, f32)>,
    ellipses: Vec<(Point, f32, Rgba)>,
    order: Vec<char>,
}

impl DrawSurface for TallySurface {
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, width: f32) {
        self.lines.push((Point::new(x1, y1), Point::new(x2, y2), color, width));
        self.order.push('L');
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, radius_x: f32, radius_y: f32, color: Rgba) {
        assert_eq!(radius_x, radius_y);
        self.ellipses.push((Point::new(cx, cy), radius_x, color));
        self.order.push('E');
    }
}

#[test]
fn test_decode_dynamic_split_code() {
    let decoded = decode(DYNAMIC_SPLIT).unwrap();
    assert_eq!(
        hex::encode(&decoded.raw),
        "e401ea0232fa54c8831e5d3a05541e000000"
    );
    assert!(decoded.checksum_ok());

    let c = &decoded.config;
    assert_eq!(c.style, CrosshairStyle::ClassicDynamic);
    assert!(approx(c.gap, -2.2));
    assert!(approx(c.outline, 1.0));
    assert_eq!(c.color, Rgba::new(50, 250, 84, 200));
    assert_eq!(c.split_distance, 3);
    assert!(c.follow_recoil);
    assert!(approx(c.fixed_crosshair_gap, 3.0));
    assert_eq!(c.color_index, 5);
    assert!(c.has_outline);
    assert!(approx(c.inner_split_alpha, 0.5));
    assert!(approx(c.outer_split_alpha, 1.0));
    assert!(approx(c.split_size_ratio, 0.3));
    assert!(approx(c.thickness, 0.5));
    assert!(c.has_center_dot);
    assert!(c.has_alpha);
    assert!(!c.is_t_style);
    assert!(!c.deployed_weapon_gap_enabled);
    assert!(approx(c.length, 3.0));
}

#[test]
fn test_decode_static_t_style_code() {
    let decoded = decode(STATIC_T_STYLE).unwrap();
    assert_eq!(
        hex::encode(&decoded.raw),
        "a7010a00ff00ffff00f101000aa200010000"
    );
    assert!(decoded.checksum_ok());

    let c = &decoded.config;
    assert_eq!(c.style, CrosshairStyle::ClassicStatic);
    assert_eq!(c.color_index, 1);
    // Preset green replaces the encoded magenta
    assert_eq!(c.color, Rgba::new(0, 255, 0, 255));
    assert!(c.deployed_weapon_gap_enabled);
    assert!(c.uses_fixed_gap());
    assert!(approx(c.effective_gap(), -1.5));
    assert!(approx(c.gap, 1.0));
    assert!(approx(c.thickness, 1.0));
    assert!(approx(c.length, 25.6));
    assert!(c.is_t_style);
    assert!(!c.has_outline);
    assert!(!c.has_center_dot);
    assert_eq!(c.split_distance, 0);
}

#[test]
fn test_split_values_are_clamped() {
    let c = decode(CLAMPED_SPLIT).unwrap().config;
    assert_eq!(c.inner_split_alpha, 1.0);
    assert_eq!(c.outer_split_alpha, 1.0);
    assert_eq!(c.split_size_ratio, 1.0);
}

#[test]
fn test_zero_and_max_codes() {
    let zero = decode(ALL_ZERO).unwrap();
    assert_eq!(zero.raw, vec![0u8; DECODED_BUFFER_LEN]);
    assert_eq!(zero.config, CrosshairConfig::default());
    assert!(zero.checksum_ok());

    // 57^25 - 1 needs 19 bytes and keeps them
    let max = decode_share_code(ALL_MAX).unwrap();
    assert_eq!(max.len(), LEGACY_BUFFER_LEN);
    assert!(decode(ALL_MAX).is_ok());
}

#[test]
fn test_legacy_padding_prefixes_zero() {
    let canonical = decode_share_code(DYNAMIC_SPLIT).unwrap();
    let legacy = decode_share_code_padded(DYNAMIC_SPLIT, LEGACY_BUFFER_LEN).unwrap();
    assert_eq!(legacy.len(), LEGACY_BUFFER_LEN);
    assert_eq!(legacy[0], 0);
    assert_eq!(&legacy[1..], &canonical[..]);
}

#[test]
fn test_rejects_bad_codes() {
    assert!(matches!(decode("CSGO-12345"), Err(CrosshairError::Format(_))));
    assert!(matches!(decode("csgo-kZRSL-TEe5b-GeyVE-48ubk-kcRVP"), Err(CrosshairError::Format(_))));
    assert_eq!(
        decode("CSGO-kZRSL-TEe5b-GeyVE-48ubk-kcRV0").unwrap_err(),
        CrosshairError::InvalidCharacter('0')
    );
}

#[test]
fn test_render_dynamic_split_code() {
    let config = decode(DYNAMIC_SPLIT).unwrap().config;
    let mut engine = RenderEngine::with_config(config);
    let mut surface = TallySurface::default();
    engine.render_to(&mut surface, 0.0, 640.0, 360.0);

    // Outlined split arms, outline dot, dot, then the two split sets
    let order: String = surface.order.iter().collect();
    assert_eq!(order, "LLLLLLLLEELLLLLLLL");

    let black = Rgba::rgb(0, 0, 0);
    assert!(surface.lines[..8].iter().all(|l| l.2 == black));
    let inner = &surface.lines[8..12];
    let outer = &surface.lines[12..];
    assert!(inner.iter().all(|l| l.2 == Rgba::new(50, 250, 84, 127)));
    assert!(outer.iter().all(|l| l.2 == Rgba::new(50, 250, 84, 255)));
    // Split distance 3 moves each set off the center line
    assert_eq!(inner[0].0.y, 357.0);
    assert_eq!(outer[0].0.y, 363.0);

    // Dot uses the encoded alpha because has_alpha is set
    assert_eq!(surface.ellipses[1].2, Rgba::new(50, 250, 84, 200));
}

#[test]
fn test_render_static_t_style_code() {
    let config = decode(STATIC_T_STYLE).unwrap().config;
    let mut engine = RenderEngine::with_config(config);
    engine.set_mode(RenderMode::MainOnly);
    engine.set_simulate_recoil(true);
    assert!(!engine.recoil_active());

    let mut surface = TallySurface::default();
    engine.render_to(&mut surface, 0.0, 100.0, 100.0);

    assert_eq!(surface.lines.len(), 3);
    assert!(surface.ellipses.is_empty());
    // Size 53 per axis, fixed gap -1.5 maps to 7
    let left = surface.lines[0];
    assert_eq!(left.0, Point::new(70.0, 100.0));
    assert_eq!(left.1, Point::new(96.5, 100.0));
    assert_eq!(left.2, Rgba::rgb(0, 255, 0));
    assert_eq!(left.3, 1.0);
    // No arm above the center
    assert!(surface.lines.iter().all(|l| l.0.y >= 100.0));
}

fn bottom_arm_offset(engine: &mut RenderEngine, now: f64) -> f32 {
    let commands = engine.render(now, 0.0, 0.0);
    let bottom = commands
        .iter()
        .filter_map(|c| match *c {
            DrawCommand::Line { from, .. } => Some(from),
            _ => None,
        })
        .nth(3)
        .unwrap();
    // Half gap is 3.5 for this code
    bottom.y - 3.5
}

#[test]
fn test_recoil_keeps_cycling() {
    let config = decode(DYNAMIC_SPLIT).unwrap().config;
    let mut engine = RenderEngine::with_config(config);
    engine.set_mode(RenderMode::MainOnly);
    engine.set_simulate_recoil(true);

    assert_eq!(bottom_arm_offset(&mut engine, 0.0), 0.0);
    assert!((bottom_arm_offset(&mut engine, 25.0) - 7.6).abs() < 1e-3);
    // Five full periods in: back at rest
    assert!(bottom_arm_offset(&mut engine, 500.0).abs() < 1e-3);
    // A quarter period later the arms move again at full strength
    assert!((bottom_arm_offset(&mut engine, 525.0) - 7.6).abs() < 1e-3);
    assert!((bottom_arm_offset(&mut engine, 5025.0) - 7.6).abs() < 1e-3);
    assert_eq!(engine.stats().recoil_frames, 5);
}
