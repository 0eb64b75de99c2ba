/*!
Frame rendering.

The [`RenderEngine`] turns the current configuration into an ordered list
of [`DrawCommand`]s once per frame:

1. outline pass (black, widened lines and dot)
2. main pass (arms in the crosshair color)
3. center dot
4. split arm sets, which replace the main arms in [`RenderMode::Full`]

The engine never reads a clock. The host passes a timestamp with every
frame and the recoil phase advances by the delta since the previous one.
*/

use crate::color::Rgba;
use crate::geometry::RenderGeometry;
use crate::layout::CrosshairConfig;
use crate::recoil::{RecoilParams, RecoilState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Diameter of the fallback dot drawn when no configuration is loaded
pub const FALLBACK_DOT_SIZE: f32 = 10.0;

/// Color of the fallback dot
pub const FALLBACK_DOT_COLOR: Rgba = Rgba::RED;

/// Color of the outline pass
pub const OUTLINE_COLOR: Rgba = Rgba::BLACK;

/// Which parts of the crosshair are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Everything, including split arm sets
    #[default]
    Full,
    /// Arms and dot, never split
    MainOnly,
    /// Center dot only
    DotOnly,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::MainOnly => "main-only",
            Self::DotOnly => "dot-only",
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "full" => Ok(Self::Full),
            "main-only" | "main" => Ok(Self::MainOnly),
            "dot-only" | "dot" => Ok(Self::DotOnly),
            other => Err(format!(
                "unknown render mode: {other} (expected full, main-only or dot-only)"
            )),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn offset_y(self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy)
    }
}

/// A single drawing primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Stroked line
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f32,
    },
    /// Filled ellipse
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        color: Rgba,
    },
}

impl DrawCommand {
    /// Filled circle of the given diameter
    pub fn dot(center: Point, diameter: f32, color: Rgba) -> Self {
        Self::Ellipse {
            center,
            radius_x: diameter / 2.0,
            radius_y: diameter / 2.0,
            color,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Self::Line { color, .. } | Self::Ellipse { color, .. } => *color,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    /// Issue this command on a surface
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        match *self {
            Self::Line { from, to, color, width } => {
                surface.draw_line(from.x, from.y, to.x, to.y, color, width)
            }
            Self::Ellipse { center, radius_x, radius_y, color } => {
                surface.fill_ellipse(center.x, center.y, radius_x, radius_y, color)
            }
        }
    }
}

/// Destination for draw commands.
///
/// Calls are synchronous and issued in order; implementations must not
/// reorder them.
pub trait DrawSurface {
    /// Stroke a line from (x1, y1) to (x2, y2).
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, width: f32);

    /// Fill an axis-aligned ellipse.
    fn fill_ellipse(&mut self, cx: f32, cy: f32, radius_x: f32, radius_y: f32, color: Rgba);
}

/// Recording surface
impl DrawSurface for Vec<DrawCommand> {
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, width: f32) {
        self.push(DrawCommand::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            color,
            width,
        });
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, radius_x: f32, radius_y: f32, color: Rgba) {
        self.push(DrawCommand::Ellipse {
            center: Point::new(cx, cy),
            radius_x,
            radius_y,
            color,
        });
    }
}

/// Replay a list of commands onto a surface
pub fn replay<S: DrawSurface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        command.draw(surface);
    }
}

/// Line segments of the visible arms
#[derive(Debug, Clone, PartialEq)]
struct Arms {
    segments: Vec<(Point, Point)>,
}

impl Arms {
    fn new(center: Point, geometry: &RenderGeometry, recoil_offset: f32, t_style: bool) -> Self {
        let Point { x: cx, y: cy } = center;
        let arm = geometry.arm_length;
        let half_gap = geometry.half_gap();
        let vy = cy + recoil_offset;

        let mut segments = Vec::with_capacity(4);
        segments.push((Point::new(cx - arm - half_gap, cy), Point::new(cx - half_gap, cy)));
        segments.push((Point::new(cx + half_gap, cy), Point::new(cx + arm + half_gap, cy)));
        if !t_style {
            segments.push((Point::new(cx, vy - arm - half_gap), Point::new(cx, vy - half_gap)));
        }
        segments.push((Point::new(cx, vy + half_gap), Point::new(cx, vy + arm + half_gap)));

        Self { segments }
    }

    fn shifted(&self, dy: f32) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|&(from, to)| (from.offset_y(dy), to.offset_y(dy)))
                .collect(),
        }
    }

    fn emit(&self, out: &mut Vec<DrawCommand>, color: Rgba, width: f32) {
        for &(from, to) in &self.segments {
            out.push(DrawCommand::Line { from, to, color, width });
        }
    }
}

/// Render counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderStats {
    pub frames_rendered: u64,
    pub fallback_frames: u64,
    pub recoil_frames: u64,
    pub primitives_emitted: u64,
}

/// Per-frame crosshair renderer
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: Option<CrosshairConfig>,
    scale_factor: f32,
    mode: RenderMode,
    simulate_recoil: bool,
    recoil_params: RecoilParams,
    recoil: RecoilState,
    stats: RenderStats,
}

impl RenderEngine {
    /// Create an engine with no configuration (draws the fallback dot)
    pub fn new() -> Self {
        Self {
            config: None,
            scale_factor: 1.0,
            mode: RenderMode::Full,
            simulate_recoil: false,
            recoil_params: RecoilParams::default(),
            recoil: RecoilState::new(),
            stats: RenderStats::default(),
        }
    }

    /// Create an engine with a configuration loaded
    pub fn with_config(config: CrosshairConfig) -> Self {
        let mut engine = Self::new();
        engine.set_config(Some(config));
        engine
    }

    /// Replace the configuration wholesale
    pub fn set_config(&mut self, config: Option<CrosshairConfig>) {
        if let Some(ref c) = config {
            debug!(
                "Loaded crosshair: style {}, length {}, gap {}, split {}",
                c.style.display_name(),
                c.length,
                c.gap,
                c.split_distance
            );
        }
        self.config = config;
    }

    pub fn config(&self) -> Option<&CrosshairConfig> {
        self.config.as_ref()
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_simulate_recoil(&mut self, simulate: bool) {
        self.simulate_recoil = simulate;
    }

    pub fn simulate_recoil(&self) -> bool {
        self.simulate_recoil
    }

    pub fn set_recoil_params(&mut self, params: RecoilParams) {
        self.recoil_params = params;
    }

    pub fn recoil_state(&self) -> RecoilState {
        self.recoil
    }

    /// Restart the recoil envelope from full amplitude
    pub fn reset_recoil(&mut self) {
        debug!("Recoil simulation reset");
        self.recoil = self.recoil.reset();
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Whether the recoil animation applies to the current configuration
    pub fn recoil_active(&self) -> bool {
        match &self.config {
            Some(config) => {
                self.simulate_recoil && config.follow_recoil && config.style.is_dynamic()
            }
            None => false,
        }
    }

    /// Produce the primitives for one frame.
    ///
    /// `now_secs` must increase from call to call; it drives the recoil phase.
    pub fn render(&mut self, now_secs: f64, center_x: f32, center_y: f32) -> Vec<DrawCommand> {
        let center = Point::new(center_x, center_y);
        self.stats.frames_rendered += 1;

        let recoil_active = self.recoil_active();
        let commands = match &self.config {
            None => {
                self.recoil = self.recoil.touch(now_secs);
                self.stats.fallback_frames += 1;
                vec![DrawCommand::dot(
                    center,
                    FALLBACK_DOT_SIZE * self.scale_factor,
                    FALLBACK_DOT_COLOR,
                )]
            }
            Some(config) => {
                let recoil_offset = if recoil_active {
                    self.recoil = self.recoil.advance_to(now_secs, &self.recoil_params);
                    self.stats.recoil_frames += 1;
                    self.recoil.offset_y(&self.recoil_params)
                } else {
                    self.recoil = self.recoil.touch(now_secs);
                    0.0
                };
                build_frame(config, self.scale_factor, self.mode, center, recoil_offset)
            }
        };

        self.stats.primitives_emitted += commands.len() as u64;
        commands
    }

    /// Render one frame straight onto a surface
    pub fn render_to<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        now_secs: f64,
        center_x: f32,
        center_y: f32,
    ) {
        let commands = self.render(now_secs, center_x, center_y);
        replay(&commands, surface);
    }
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the command list for a configuration. Pure apart from its inputs.
pub fn build_frame(
    config: &CrosshairConfig,
    scale_factor: f32,
    mode: RenderMode,
    center: Point,
    recoil_offset: f32,
) -> Vec<DrawCommand> {
    let geometry = RenderGeometry::compute(config, scale_factor);
    let color = config.draw_color();
    let mut out = Vec::with_capacity(16);

    if mode == RenderMode::DotOnly {
        if config.has_center_dot {
            if config.has_outline {
                out.push(DrawCommand::dot(center, geometry.outline_dot_diameter(), OUTLINE_COLOR));
            }
            out.push(DrawCommand::dot(center, geometry.dot_diameter(), color));
        }
        return out;
    }

    let arms = Arms::new(center, &geometry, recoil_offset, config.is_t_style);
    let split = config.split_distance > 0 && mode == RenderMode::Full;
    let split_width = geometry.thickness * config.split_size_ratio;
    let inner = arms.shifted(-geometry.split_offset);
    let outer = arms.shifted(geometry.split_offset);

    if config.has_outline {
        if split {
            let width = split_width + 2.0 * geometry.outline;
            inner.emit(&mut out, OUTLINE_COLOR, width);
            outer.emit(&mut out, OUTLINE_COLOR, width);
        } else {
            arms.emit(&mut out, OUTLINE_COLOR, geometry.outline_width());
        }
        if config.has_center_dot {
            out.push(DrawCommand::dot(center, geometry.outline_dot_diameter(), OUTLINE_COLOR));
        }
    }

    if !split {
        arms.emit(&mut out, color, geometry.thickness);
    }

    if config.has_center_dot {
        out.push(DrawCommand::dot(center, geometry.dot_diameter(), color));
    }

    if split {
        inner.emit(&mut out, color.with_alpha_factor(config.inner_split_alpha), split_width);
        outer.emit(&mut out, color.with_alpha_factor(config.outer_split_alpha), split_width);
    }

    out
}
