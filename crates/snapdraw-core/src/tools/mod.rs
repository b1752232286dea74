//! Tool system: turns drags and gestures into strokes and measurements.

mod line_reference;
mod protractor;

pub use line_reference::LineReference;
pub use protractor::{Protractor, ProtractorMeasurement};

use crate::config::CanvasConfig;
use crate::snap::snap_to_grid;
use crate::stroke::{DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH, MIN_PEN_WIDTH, SerializableColor, Stroke};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Width of strokes drawn along the ruler or set-square.
pub const GUIDED_STROKE_WIDTH: f64 = 4.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Ruler,
    SetSquare,
    Protractor,
    Pan,
}

impl ToolKind {
    /// Whether the tool constrains strokes to a [`LineReference`].
    pub fn is_line_tool(self) -> bool {
        matches!(self, ToolKind::Ruler | ToolKind::SetSquare)
    }
}

/// State of a drag interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for a drag to start.
    #[default]
    Idle,
    /// A drag is in progress; `points` is the uncommitted stroke.
    Accumulating { points: Vec<Point> },
}

/// Snapping parameters in effect for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapContext {
    /// Global snapping switch.
    pub enabled: bool,
    /// Current viewport scale.
    pub scale: f64,
    /// Grid spacing in screen pixels.
    pub grid_spacing_px: f64,
    /// Maximum world distance for grid snapping.
    pub grid_threshold: f64,
    /// Rotation snap threshold at scale 1.
    pub rotation_threshold_deg: f64,
    /// Protractor snap threshold.
    pub protractor_threshold_deg: f64,
}

impl SnapContext {
    /// Build the context for the given scale from configuration.
    pub fn from_config(config: &CanvasConfig, scale: f64) -> Self {
        Self {
            enabled: config.snap_enabled,
            scale,
            grid_spacing_px: config.grid_spacing_px,
            grid_threshold: config.grid_snap_threshold,
            rotation_threshold_deg: config.rotation_snap_threshold_deg,
            protractor_threshold_deg: config.protractor_snap_threshold_deg,
        }
    }

    /// Grid spacing in world units at the current scale.
    pub fn grid_spacing_world(&self) -> f64 {
        self.grid_spacing_px / self.scale
    }

    /// Rotation snap threshold at the current scale.
    ///
    /// Zooming in tightens the threshold.
    pub fn rotation_threshold(&self) -> f64 {
        self.rotation_threshold_deg / self.scale
    }
}

impl Default for SnapContext {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default(), 1.0)
    }
}

/// What a finished interaction produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A stroke ready to be committed.
    Stroke(Stroke),
    /// A completed protractor measurement.
    Measurement(ProtractorMeasurement),
}

/// Manages the current tool and its state.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the drag interaction.
    pub state: ToolState,
    /// Ruler reference line.
    pub ruler: LineReference,
    /// Set-square reference line.
    pub set_square: LineReference,
    /// Pending protractor taps.
    pub protractor: Protractor,
    /// Most recent protractor measurement, for display.
    pub last_measurement: Option<ProtractorMeasurement>,
    /// Color for new pen strokes.
    pub pen_color: SerializableColor,
    /// Width for new pen strokes.
    pen_width: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager with references and pen style from configuration.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            ruler: LineReference::new(config.ruler_center, 0.0),
            set_square: LineReference::new(config.set_square_center, 0.0),
            protractor: Protractor::new(),
            last_measurement: None,
            pen_color: config.pen_color,
            pen_width: config.pen_width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
        }
    }

    /// Set the current tool, dropping any uncommitted stroke.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.current_tool, tool);
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    pub fn pen_width(&self) -> f64 {
        self.pen_width
    }

    /// Set the pen width, clamped to the supported range.
    pub fn set_pen_width(&mut self, width: f64) {
        self.pen_width = if width.is_finite() {
            width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH)
        } else {
            DEFAULT_PEN_WIDTH
        };
    }

    /// Color and width of strokes committed by `tool`, if it draws at all.
    pub fn stroke_style(&self, tool: ToolKind) -> Option<(SerializableColor, f64)> {
        match tool {
            ToolKind::Pen => Some((self.pen_color, self.pen_width)),
            ToolKind::Ruler => Some((SerializableColor::dark_gray(), GUIDED_STROKE_WIDTH)),
            ToolKind::SetSquare => Some((SerializableColor::blue(), GUIDED_STROKE_WIDTH)),
            ToolKind::Protractor | ToolKind::Pan => None,
        }
    }

    /// Color the in-progress stroke is previewed in.
    pub fn preview_color(&self) -> SerializableColor {
        self.stroke_style(self.current_tool)
            .map(|(color, _)| color)
            .unwrap_or_else(SerializableColor::magenta)
    }

    /// The reference line of `tool`, for ruler and set-square.
    pub fn line_reference(&self, tool: ToolKind) -> Option<&LineReference> {
        match tool {
            ToolKind::Ruler => Some(&self.ruler),
            ToolKind::SetSquare => Some(&self.set_square),
            _ => None,
        }
    }

    fn line_reference_mut(&mut self, tool: ToolKind) -> Option<&mut LineReference> {
        match tool {
            ToolKind::Ruler => Some(&mut self.ruler),
            ToolKind::SetSquare => Some(&mut self.set_square),
            _ => None,
        }
    }

    /// Move and rotate the active tool's reference line.
    ///
    /// `pan_delta` is in world space. Returns the updated reference, or
    /// `None` when the active tool has no reference line.
    pub fn apply_transform(
        &mut self,
        pan_delta: Vec2,
        rotation_delta_deg: f64,
        snap: &SnapContext,
    ) -> Option<LineReference> {
        let reference = self.line_reference_mut(self.current_tool)?;
        reference.apply_transform(pan_delta, rotation_delta_deg, snap.enabled, snap.rotation_threshold());
        Some(*reference)
    }

    /// Begin a drag at a world point.
    ///
    /// Only the protractor produces output here, on its third tap.
    pub fn begin(&mut self, point: Point, snap: &SnapContext) -> Option<ToolOutput> {
        match self.current_tool {
            ToolKind::Pen => {
                self.state = ToolState::Accumulating { points: vec![point] };
                None
            }
            ToolKind::Ruler | ToolKind::SetSquare => {
                let reference = self.line_reference(self.current_tool)?;
                let projected = reference.project(point);
                self.state = ToolState::Accumulating {
                    points: vec![projected],
                };
                None
            }
            ToolKind::Protractor => {
                let measurement =
                    self.protractor
                        .tap(point, snap.enabled, snap.protractor_threshold_deg)?;
                log::debug!("Protractor measured {:.1}°", measurement.measured_deg);
                self.last_measurement = Some(measurement);
                Some(ToolOutput::Measurement(measurement))
            }
            ToolKind::Pan => None,
        }
    }

    /// Extend the current drag with a world point.
    pub fn update(&mut self, point: Point, snap: &SnapContext) {
        let point = match self.current_tool {
            ToolKind::Pen => point,
            ToolKind::Ruler => {
                let projected = self.ruler.project(point);
                if snap.enabled {
                    snap_to_grid(projected, snap.grid_spacing_world(), snap.grid_threshold).point
                } else {
                    projected
                }
            }
            // Set-square strokes follow the edge but never grid-snap
            ToolKind::SetSquare => self.set_square.project(point),
            ToolKind::Protractor | ToolKind::Pan => return,
        };

        if let ToolState::Accumulating { points } = &mut self.state {
            points.push(point);
        }
    }

    /// End the current drag and return the stroke it produced, if any.
    ///
    /// Drags with fewer than two points produce nothing.
    pub fn end(&mut self) -> Option<ToolOutput> {
        let ToolState::Accumulating { points } = std::mem::take(&mut self.state) else {
            return None;
        };
        if points.len() < 2 {
            log::trace!("Discarding {}-point drag", points.len());
            return None;
        }
        let (color, width) = self.stroke_style(self.current_tool)?;
        Some(ToolOutput::Stroke(Stroke::new(points, color, width)))
    }

    /// Cancel the current drag without producing anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Accumulating { .. })
    }

    /// Points of the uncommitted stroke.
    pub fn preview_points(&self) -> &[Point] {
        match &self.state {
            ToolState::Accumulating { points } => points,
            ToolState::Idle => &[],
        }
    }
}
