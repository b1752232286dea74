//! Canvas session: strokes, history, viewport and tools in one place.

use crate::config::{CanvasConfig, ConfigResult};
use crate::history::History;
use crate::input::GestureEvent;
use crate::stroke::{SerializableColor, Stroke, StrokeCollection};
use crate::tools::{
    LineReference, ProtractorMeasurement, SnapContext, ToolKind, ToolManager, ToolOutput,
};
use crate::viewport::ViewportTransform;
use kurbo::{Point, Vec2};

/// Runtime drawing state for one canvas.
///
/// All mutation goes through the handlers below; the renderer reads the
/// accessors after each call.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Committed strokes.
    strokes: StrokeCollection,
    /// Undo/redo history of `strokes`.
    history: History,
    /// Viewport transform.
    pub viewport: ViewportTransform,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Active configuration.
    config: CanvasConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(CanvasConfig::default())
    }

    /// Create a canvas from a configuration, validating it first.
    pub fn with_config(config: CanvasConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CanvasConfig) -> Self {
        Self {
            strokes: StrokeCollection::new(),
            history: History::with_capacity(config.history_capacity),
            viewport: ViewportTransform::with_scale_range(config.min_scale, config.max_scale),
            tool_manager: ToolManager::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Committed strokes, back to front.
    pub fn strokes(&self) -> &StrokeCollection {
        &self.strokes
    }

    fn snap_context(&self) -> SnapContext {
        SnapContext::from_config(&self.config, self.viewport.scale())
    }

    // --- Settings ---

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool_manager.set_tool(tool);
    }

    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    pub fn snap_enabled(&self) -> bool {
        self.config.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
    }

    pub fn show_grid(&self) -> bool {
        self.config.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.config.show_grid = show;
    }

    pub fn set_pen_color(&mut self, color: SerializableColor) {
        self.tool_manager.pen_color = color;
    }

    /// Set the pen width, clamped to the supported range.
    pub fn set_pen_width(&mut self, width: f64) {
        self.tool_manager.set_pen_width(width);
    }

    // --- Gestures ---

    /// Route a gesture event from the platform layer.
    ///
    /// Returns what the event produced, if anything.
    pub fn handle_event(&mut self, event: GestureEvent) -> Option<ToolOutput> {
        match event {
            GestureEvent::DragStart { position } => self.handle_drag_start_screen(position),
            GestureEvent::DragMove { position } => {
                self.handle_drag_move_screen(position);
                None
            }
            GestureEvent::DragEnd => self.handle_drag_end(),
            GestureEvent::DragCancel => {
                self.cancel_drag();
                None
            }
            GestureEvent::Transform {
                pan,
                zoom,
                rotation_deg,
            } => {
                if self.tool().is_line_tool() {
                    self.apply_transform_event(pan, rotation_deg);
                } else {
                    self.pan_zoom(pan, zoom);
                }
                None
            }
        }
    }

    /// Move and rotate the active ruler or set-square.
    ///
    /// `pan_delta` is in screen pixels and is converted with the current
    /// scale. Returns the updated reference, or `None` (and changes nothing)
    /// when the active tool is neither ruler nor set-square.
    pub fn apply_transform_event(&mut self, pan_delta: Vec2, rotation_delta_deg: f64) -> Option<LineReference> {
        let snap = self.snap_context();
        let world_delta = self.viewport.screen_delta_to_world(pan_delta);
        self.tool_manager.apply_transform(world_delta, rotation_delta_deg, &snap)
    }

    /// Pan the viewport by a screen delta and zoom it by `zoom`, clamped.
    pub fn pan_zoom(&mut self, pan_delta: Vec2, zoom: f64) {
        self.viewport.pan(pan_delta);
        self.viewport.zoom_by(zoom);
    }

    /// Begin a drag at a world point.
    pub fn handle_drag_start(&mut self, world_point: Point) -> Option<ToolOutput> {
        let snap = self.snap_context();
        self.tool_manager.begin(world_point, &snap)
    }

    /// Begin a drag at a screen point.
    pub fn handle_drag_start_screen(&mut self, screen_point: Point) -> Option<ToolOutput> {
        self.handle_drag_start(self.viewport.screen_to_world(screen_point))
    }

    /// Extend the drag with a world point.
    pub fn handle_drag_move(&mut self, world_point: Point) {
        let snap = self.snap_context();
        self.tool_manager.update(world_point, &snap);
    }

    /// Extend the drag with a screen point.
    pub fn handle_drag_move_screen(&mut self, screen_point: Point) {
        self.handle_drag_move(self.viewport.screen_to_world(screen_point));
    }

    /// Finish the drag, committing its stroke if it has at least two points.
    pub fn handle_drag_end(&mut self) -> Option<ToolOutput> {
        let output = self.tool_manager.end()?;
        if let ToolOutput::Stroke(stroke) = &output {
            self.commit(stroke.clone());
        }
        Some(output)
    }

    /// Drop the in-progress stroke without committing anything.
    pub fn cancel_drag(&mut self) {
        self.tool_manager.cancel();
    }

    fn commit(&mut self, stroke: Stroke) {
        // Record the pre-mutation state
        self.history.push_snapshot(&self.strokes);
        log::debug!(
            "Committed {:?} stroke with {} points ({} total)",
            self.tool(),
            stroke.len(),
            self.strokes.len() + 1
        );
        self.strokes.push(stroke);
    }

    // --- History ---

    /// Undo the last change. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> &StrokeCollection {
        if self.history.undo(&mut self.strokes) {
            log::debug!("Undo: {} strokes", self.strokes.len());
        }
        &self.strokes
    }

    /// Redo the last undone change. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> &StrokeCollection {
        if self.history.redo(&mut self.strokes) {
            log::debug!("Redo: {} strokes", self.strokes.len());
        }
        &self.strokes
    }

    /// Remove every stroke, recording the previous state for undo.
    pub fn clear(&mut self) -> &StrokeCollection {
        if !self.strokes.is_empty() {
            self.history.push_snapshot(&self.strokes);
            log::debug!("Cleared {} strokes", self.strokes.len());
            self.strokes.clear();
        }
        &self.strokes
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Render queries ---

    /// Points of the uncommitted stroke, world space.
    pub fn preview_points(&self) -> &[Point] {
        self.tool_manager.preview_points()
    }

    pub fn preview_color(&self) -> SerializableColor {
        self.tool_manager.preview_color()
    }

    pub fn ruler(&self) -> &LineReference {
        &self.tool_manager.ruler
    }

    pub fn set_square(&self) -> &LineReference {
        &self.tool_manager.set_square
    }

    /// Ruler end points for drawing, world space.
    pub fn ruler_endpoints(&self) -> (Point, Point) {
        self.tool_manager.ruler.endpoints(self.config.ruler_length)
    }

    /// Pending protractor taps as `(vertex, ray1)`.
    pub fn protractor_taps(&self) -> (Option<Point>, Option<Point>) {
        let protractor = &self.tool_manager.protractor;
        (protractor.vertex(), protractor.ray1())
    }

    /// Most recent protractor measurement.
    pub fn measurement(&self) -> Option<&ProtractorMeasurement> {
        self.tool_manager.last_measurement.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    fn draw(canvas: &mut Canvas, points: &[Point]) -> Option<ToolOutput> {
        let (first, rest) = points.split_first()?;
        canvas.handle_drag_start(*first);
        for p in rest {
            canvas.handle_drag_move(*p);
        }
        canvas.handle_drag_end()
    }

    fn scribble(canvas: &mut Canvas, n: f64) {
        draw(canvas, &[Point::new(n, 0.0), Point::new(n, 10.0)]);
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new();
        assert!(canvas.strokes().is_empty());
        assert_eq!(canvas.tool(), ToolKind::Pen);
        assert!(!canvas.can_undo());
        assert!(!canvas.can_redo());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = CanvasConfig {
            history_capacity: 0,
            ..CanvasConfig::default()
        };
        assert!(matches!(Canvas::with_config(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_with_config_rejects_oversized_history() {
        let config = CanvasConfig::from_json(r#"{ "history_capacity": 5000 }"#);
        assert!(matches!(config, Err(ConfigError::Invalid(_))));

        let config = CanvasConfig {
            history_capacity: usize::MAX,
            ..CanvasConfig::default()
        };
        assert!(matches!(Canvas::with_config(config), Err(ConfigError::Invalid(_))));
    }

    /// Undo then redo, and redo then undo, must each leave the strokes as they were.
    fn assert_inverse_pairs(canvas: &mut Canvas) {
        let before = canvas.strokes().clone();
        if canvas.can_undo() {
            canvas.undo();
            assert_eq!(canvas.redo(), &before);
        }
        if canvas.can_redo() {
            canvas.redo();
            assert_eq!(canvas.undo(), &before);
        }
        assert_eq!(canvas.strokes(), &before);
    }

    #[test]
    fn test_undo_redo_inverse_across_mixed_sequence() {
        let mut canvas = Canvas::new();
        let steps: [fn(&mut Canvas); 12] = [
            |c| scribble(c, 1.0),
            |c| scribble(c, 2.0),
            |c| {
                c.undo();
            },
            |c| {
                c.redo();
            },
            |c| {
                c.undo();
            },
            |c| scribble(c, 3.0),
            |c| {
                c.clear();
            },
            |c| {
                c.undo();
            },
            |c| {
                c.undo();
            },
            |c| {
                c.redo();
            },
            |c| scribble(c, 4.0),
            |c| {
                c.undo();
            },
        ];

        for step in steps {
            step(&mut canvas);
            assert_inverse_pairs(&mut canvas);
        }
        // Last step undid stroke 4, leaving strokes 1 and 3
        assert_eq!(canvas.strokes().len(), 2);
        assert!(canvas.can_redo());
    }

    #[test]
    fn test_commit_pen_stroke() {
        let mut canvas = Canvas::new();
        canvas.set_pen_color(SerializableColor::red());
        canvas.set_pen_width(10.0);
        let output = draw(&mut canvas, &[Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);

        assert!(matches!(output, Some(ToolOutput::Stroke(_))));
        assert_eq!(canvas.strokes().len(), 1);
        let stroke = &canvas.strokes().strokes()[0];
        assert_eq!(stroke.color, SerializableColor::red());
        assert_eq!(stroke.width_px, 10.0);
        assert!(canvas.can_undo());
    }

    #[test]
    fn test_one_point_drag_commits_nothing() {
        let mut canvas = Canvas::new();
        assert!(draw(&mut canvas, &[Point::new(1.0, 2.0)]).is_none());
        assert!(canvas.strokes().is_empty());
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_undo_redo_sequence() {
        let mut canvas = Canvas::new();
        let c0 = canvas.strokes().clone();
        scribble(&mut canvas, 1.0);
        let c1 = canvas.strokes().clone();
        scribble(&mut canvas, 2.0);
        let c2 = canvas.strokes().clone();

        assert_eq!(canvas.undo(), &c1);
        assert_eq!(canvas.undo(), &c0);
        assert_eq!(canvas.redo(), &c1);
        assert_eq!(canvas.redo(), &c2);
        // Nothing left to redo
        assert_eq!(canvas.redo(), &c2);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut canvas = Canvas::new();
        scribble(&mut canvas, 1.0);
        scribble(&mut canvas, 2.0);
        canvas.undo();
        scribble(&mut canvas, 3.0);

        assert!(!canvas.can_redo());
        let before = canvas.strokes().clone();
        assert_eq!(canvas.redo(), &before);
    }

    #[test]
    fn test_history_floor_after_capacity() {
        let mut canvas = Canvas::new();
        for i in 0..25 {
            scribble(&mut canvas, i as f64);
        }
        for _ in 0..20 {
            assert!(canvas.can_undo());
            canvas.undo();
        }
        assert!(!canvas.can_undo());
        assert_eq!(canvas.strokes().len(), 5);
        assert_eq!(canvas.undo().len(), 5);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut canvas = Canvas::new();
        scribble(&mut canvas, 1.0);
        scribble(&mut canvas, 2.0);
        let before = canvas.strokes().clone();

        assert!(canvas.clear().is_empty());
        assert_eq!(canvas.undo(), &before);
    }

    #[test]
    fn test_clear_empty_is_noop() {
        let mut canvas = Canvas::new();
        canvas.clear();
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_screen_drag_uses_viewport() {
        let mut canvas = Canvas::new();
        canvas.viewport.offset = Vec2::new(100.0, 50.0);
        canvas.viewport.set_scale(2.0);

        canvas.handle_event(GestureEvent::DragStart {
            position: Point::new(100.0, 50.0),
        });
        canvas.handle_event(GestureEvent::DragMove {
            position: Point::new(120.0, 90.0),
        });
        assert_eq!(canvas.preview_points(), &[Point::new(0.0, 0.0), Point::new(10.0, 20.0)]);

        let output = canvas.handle_event(GestureEvent::DragEnd);
        assert!(matches!(output, Some(ToolOutput::Stroke(_))));
        assert_eq!(canvas.strokes().strokes()[0].points[1], Point::new(10.0, 20.0));
    }

    #[test]
    fn test_drag_cancel_commits_nothing() {
        let mut canvas = Canvas::new();
        canvas.handle_event(GestureEvent::DragStart { position: Point::ZERO });
        canvas.handle_event(GestureEvent::DragMove {
            position: Point::new(5.0, 5.0),
        });
        canvas.handle_event(GestureEvent::DragCancel);
        assert!(canvas.handle_event(GestureEvent::DragEnd).is_none());
        assert!(canvas.strokes().is_empty());
    }

    #[test]
    fn test_transform_moves_viewport_for_pen() {
        let mut canvas = Canvas::new();
        canvas.handle_event(GestureEvent::Transform {
            pan: Vec2::new(10.0, 20.0),
            zoom: 100.0,
            rotation_deg: 30.0,
        });
        assert_eq!(canvas.viewport.offset, Vec2::new(10.0, 20.0));
        assert_eq!(canvas.viewport.scale(), 4.0);
        assert_eq!(canvas.ruler().rotation_deg, 0.0);
    }

    #[test]
    fn test_transform_moves_ruler_in_world_units() {
        let mut canvas = Canvas::new();
        canvas.viewport.set_scale(2.0);
        canvas.set_tool(ToolKind::Ruler);

        canvas.handle_event(GestureEvent::Transform {
            pan: Vec2::new(20.0, -10.0),
            zoom: 3.0,
            rotation_deg: 10.0,
        });
        assert_eq!(canvas.ruler().center, Point::new(410.0, 395.0));
        assert!((canvas.ruler().rotation_deg - 10.0).abs() < 1e-12);
        // Viewport untouched while a line tool is active
        assert_eq!(canvas.viewport.scale(), 2.0);
        assert_eq!(canvas.viewport.offset, Vec2::ZERO);
    }

    #[test]
    fn test_ruler_rotation_snaps_with_threshold_over_scale() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::SetSquare);
        let updated = canvas.apply_transform_event(Vec2::ZERO, 86.0).unwrap();
        assert_eq!(updated.rotation_deg, 90.0);

        canvas.set_snap_enabled(false);
        let updated = canvas.apply_transform_event(Vec2::ZERO, 1.0).unwrap();
        assert!((updated.rotation_deg - 91.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_transform_event_ignored_for_pen() {
        let mut canvas = Canvas::new();
        assert!(canvas.apply_transform_event(Vec2::new(5.0, 5.0), 45.0).is_none());
        assert_eq!(canvas.ruler().center, Point::new(400.0, 400.0));
    }

    #[test]
    fn test_ruler_stroke_on_rotated_edge() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Ruler);
        canvas.set_snap_enabled(false);
        canvas.apply_transform_event(Vec2::ZERO, 45.0);

        let output = draw(&mut canvas, &[Point::new(400.0, 500.0), Point::new(500.0, 400.0)]);
        let Some(ToolOutput::Stroke(stroke)) = output else {
            panic!("expected a ruler stroke");
        };
        for p in &stroke.points {
            // On the 45° line through (400, 400): y - 400 == x - 400
            assert!(((p.y - 400.0) - (p.x - 400.0)).abs() < 1e-9);
        }
        assert_eq!(stroke.color, SerializableColor::dark_gray());
    }

    #[test]
    fn test_protractor_flow() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Protractor);

        assert!(canvas.handle_drag_start(Point::new(0.0, 0.0)).is_none());
        assert_eq!(canvas.protractor_taps(), (Some(Point::ZERO), None));
        assert!(canvas.handle_drag_start(Point::new(10.0, 0.0)).is_none());
        let output = canvas.handle_drag_start(Point::new(-10.0, 0.05));

        let Some(ToolOutput::Measurement(m)) = output else {
            panic!("expected a measurement");
        };
        assert_eq!(m.measured_deg, 180.0);
        assert_eq!(canvas.measurement(), Some(&m));
        assert_eq!(canvas.protractor_taps(), (None, None));
        // Measurements never touch the strokes
        assert!(canvas.handle_drag_end().is_none());
        assert!(canvas.strokes().is_empty());
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_preview_color_per_tool() {
        let mut canvas = Canvas::new();
        canvas.set_pen_color(SerializableColor::green());
        assert_eq!(canvas.preview_color(), SerializableColor::green());
        canvas.set_tool(ToolKind::SetSquare);
        assert_eq!(canvas.preview_color(), SerializableColor::blue());
        canvas.set_tool(ToolKind::Protractor);
        assert_eq!(canvas.preview_color(), SerializableColor::magenta());
    }

    #[test]
    fn test_ruler_endpoints_use_config_length() {
        let canvas = Canvas::new();
        let (a, b) = canvas.ruler_endpoints();
        assert!((a.distance(b) - 800.0).abs() < 1e-9);
    }
}
