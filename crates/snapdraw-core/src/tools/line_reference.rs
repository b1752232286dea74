//! Straight-edge reference shared by the ruler and set-square tools.

use crate::geometry::{direction, normalize_angle, project_onto_line};
use crate::snap::snap_angle;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A line the active tool constrains strokes to.
///
/// Persists across strokes; moved and rotated by transform gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineReference {
    /// A point on the line, in world space.
    pub center: Point,
    /// Direction of the line in degrees, normalized to (-180, 180].
    pub rotation_deg: f64,
}

impl LineReference {
    pub fn new(center: Point, rotation_deg: f64) -> Self {
        Self {
            center,
            rotation_deg: normalize_angle(rotation_deg),
        }
    }

    /// Move and rotate the reference.
    ///
    /// `pan_delta` is in world space. With snapping enabled, a rotation that
    /// lands within `threshold_deg` of a reference angle locks onto that
    /// angle instead of applying the raw delta.
    pub fn apply_transform(
        &mut self,
        pan_delta: Vec2,
        rotation_delta_deg: f64,
        snap_enabled: bool,
        threshold_deg: f64,
    ) {
        self.center += pan_delta;

        let candidate = self.rotation_deg + rotation_delta_deg;
        let snap = snap_angle(candidate, threshold_deg);
        self.rotation_deg = if snap_enabled && snap.snapped {
            log::trace!("Rotation {:.2}° locked to {}°", candidate, snap.angle_degrees);
            snap.angle_degrees
        } else {
            normalize_angle(candidate)
        };
    }

    /// Project a world point onto the line.
    pub fn project(&self, point: Point) -> Point {
        project_onto_line(point, self.center, self.rotation_deg)
    }

    /// End points of a segment of `length` centered on the reference, for drawing.
    pub fn endpoints(&self, length: f64) -> (Point, Point) {
        let half = direction(self.rotation_deg) * (length / 2.0);
        (self.center - half, self.center + half)
    }
}
