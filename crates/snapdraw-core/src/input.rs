//! Gesture events delivered by the platform layer.
//!
//! Raw touch decomposition happens upstream; these events carry resolved
//! screen-space positions and deltas.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A resolved gesture, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// A single-pointer drag began.
    DragStart { position: Point },
    /// The drag pointer moved.
    DragMove { position: Point },
    /// The drag pointer was released.
    DragEnd,
    /// The drag was interrupted (e.g. a second finger landed).
    DragCancel,
    /// A multi-touch transform step.
    Transform {
        /// Pan delta in screen pixels.
        pan: Vec2,
        /// Multiplicative zoom factor (1.0 for none).
        zoom: f64,
        /// Rotation delta in degrees.
        rotation_deg: f64,
    },
}

impl GestureEvent {
    /// A pure pan step.
    pub fn pan(delta: Vec2) -> Self {
        GestureEvent::Transform {
            pan: delta,
            zoom: 1.0,
            rotation_deg: 0.0,
        }
    }

    /// A pure rotation step.
    pub fn rotate(degrees: f64) -> Self {
        GestureEvent::Transform {
            pan: Vec2::ZERO,
            zoom: 1.0,
            rotation_deg: degrees,
        }
    }

    /// Whether this event belongs to a drag sequence.
    pub fn is_drag(&self) -> bool {
        !matches!(self, GestureEvent::Transform { .. })
    }
}
