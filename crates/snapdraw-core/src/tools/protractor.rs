//! Three-tap angle measurement.

use crate::geometry::angle_at_vertex;
use crate::snap::snap_angle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A finished angle measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtractorMeasurement {
    pub vertex: Point,
    pub ray1: Point,
    pub ray2: Point,
    /// Angle at the vertex in degrees (0..=180), snapped when close to a
    /// reference angle and snapping is enabled.
    pub measured_deg: f64,
    /// Whether `measured_deg` was replaced by a reference angle.
    pub snapped: bool,
}

/// Pending taps of the current measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Protractor {
    vertex: Option<Point>,
    ray1: Option<Point>,
}

impl Protractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap.
    ///
    /// The first tap sets the vertex, the second the first ray. The third
    /// completes the measurement and resets the pending taps.
    pub fn tap(&mut self, point: Point, snap_enabled: bool, threshold_deg: f64) -> Option<ProtractorMeasurement> {
        let Some(vertex) = self.vertex else {
            self.vertex = Some(point);
            return None;
        };
        let Some(ray1) = self.ray1 else {
            self.ray1 = Some(point);
            return None;
        };

        let raw = angle_at_vertex(ray1, vertex, point);
        let snap = snap_angle(raw, threshold_deg);
        let snapped = snap_enabled && snap.snapped;
        self.reset();

        Some(ProtractorMeasurement {
            vertex,
            ray1,
            ray2: point,
            measured_deg: if snapped { snap.angle_degrees } else { raw },
            snapped,
        })
    }

    /// Forget any pending taps.
    pub fn reset(&mut self) {
        self.vertex = None;
        self.ray1 = None;
    }

    pub fn vertex(&self) -> Option<Point> {
        self.vertex
    }

    pub fn ray1(&self) -> Option<Point> {
        self.ray1
    }
}
