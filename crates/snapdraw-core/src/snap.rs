//! Snap functionality for aligning angles to common drafting angles and
//! points to the grid.

use crate::geometry::{circular_distance, normalize_angle};
use kurbo::Point;

/// Reference angles (degrees) that rotations and measurements snap to.
///
/// Order matters: when two references are equally close, the first one in
/// this list wins.
pub const REFERENCE_ANGLES: [f64; 9] = [0.0, 30.0, 45.0, 60.0, 90.0, 120.0, 135.0, 150.0, 180.0];

/// Result of a grid snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point (the input point when nothing snapped).
    pub point: Point,
    /// Whether the point moved onto a grid intersection.
    pub snapped: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped: false,
        }
    }
}

/// Result of an angle snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSnapResult {
    /// Nearest reference angle in degrees, whether or not it is within threshold.
    pub angle_degrees: f64,
    /// Whether the nearest reference angle is within the threshold.
    pub snapped: bool,
}

/// Find the reference angle nearest to `raw_degrees`.
///
/// The input is normalized first and distances wrap around the circle. The
/// returned angle is always the nearest reference; `snapped` reports whether
/// it lies within `threshold_degrees`.
pub fn snap_angle(raw_degrees: f64, threshold_degrees: f64) -> AngleSnapResult {
    let normalized = normalize_angle(raw_degrees);

    let mut best = REFERENCE_ANGLES[0];
    let mut best_delta = f64::MAX;
    for reference in REFERENCE_ANGLES {
        let delta = circular_distance(normalized, reference);
        // Strict comparison keeps the earlier reference on ties
        if delta < best_delta {
            best_delta = delta;
            best = reference;
        }
    }

    AngleSnapResult {
        angle_degrees: best,
        snapped: best_delta <= threshold_degrees,
    }
}

/// Snap a point to the nearest grid intersection if it is close enough.
///
/// Each coordinate is rounded independently to a multiple of `grid_spacing`.
/// The rounded point is only used when it lies within `threshold` of the
/// input. A non-positive or non-finite spacing leaves the point unchanged.
pub fn snap_to_grid(point: Point, grid_spacing: f64, threshold: f64) -> SnapResult {
    if !(grid_spacing > 0.0 && grid_spacing.is_finite()) {
        return SnapResult::none(point);
    }

    let candidate = Point::new(
        (point.x / grid_spacing).round() * grid_spacing,
        (point.y / grid_spacing).round() * grid_spacing,
    );

    if point.distance(candidate) <= threshold {
        SnapResult {
            point: candidate,
            snapped: true,
        }
    } else {
        SnapResult::none(point)
    }
}
