//! SnapDraw Core Library
//!
//! Platform-agnostic drawing engine for a snapping sketch canvas: freehand
//! and guided strokes, ruler and set-square references, protractor
//! measurements, viewport transform and bounded undo/redo.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod history;
pub mod input;
pub mod snap;
pub mod stroke;
pub mod tools;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use geometry::{angle_at_vertex, circular_distance, normalize_angle, project_onto_line, px_to_cm};
pub use history::{History, HistorySnapshot};
pub use input::GestureEvent;
pub use snap::{AngleSnapResult, REFERENCE_ANGLES, SnapResult, snap_angle, snap_to_grid};
pub use stroke::{PALETTE, SerializableColor, Stroke, StrokeCollection, StrokeId};
pub use tools::{LineReference, Protractor, ProtractorMeasurement, SnapContext, ToolKind, ToolManager, ToolOutput};
pub use viewport::ViewportTransform;
