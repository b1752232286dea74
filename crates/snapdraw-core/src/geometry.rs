//! Pure geometry helpers used by the drafting tools.
//!
//! Every function here is a deterministic function of its inputs. Angles are
//! in degrees and normalized to the half-open range (-180, 180].

use crate::viewport::ViewportTransform;
use kurbo::{Point, Vec2};

/// Rays shorter than this are treated as degenerate by [`angle_at_vertex`].
pub const DEGENERATE_LENGTH: f64 = 1e-6;

/// Centimeters per inch, for pixel-to-length conversion.
const CM_PER_INCH: f64 = 2.54;

/// Normalize an angle in degrees to (-180, 180].
///
/// Normalizing an already normalized angle is a no-op, and adding any whole
/// number of turns to the input does not change the result.
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid lands on [-180, 180); the lower bound belongs to the top.
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// Distance between two angles going the short way around the circle.
///
/// The result is in [0, 180]; 179° and -179° are 2° apart.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
}

/// Unit direction vector for an angle in degrees.
pub fn direction(angle_degrees: f64) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Orthogonal projection of `point` onto the infinite line through
/// `line_center` at `line_angle_degrees`.
pub fn project_onto_line(point: Point, line_center: Point, line_angle_degrees: f64) -> Point {
    let dir = direction(line_angle_degrees);
    let t = (point - line_center).dot(dir);
    line_center + dir * t
}

/// Angle in degrees (0..=180) between the rays `vertex -> ray_end1` and
/// `vertex -> ray_end2`.
///
/// Returns 0° when either ray is shorter than [`DEGENERATE_LENGTH`].
pub fn angle_at_vertex(ray_end1: Point, vertex: Point, ray_end2: Point) -> f64 {
    let v1 = ray_end1 - vertex;
    let v2 = ray_end2 - vertex;
    let len1 = v1.hypot();
    let len2 = v2.hypot();
    if len1 <= DEGENERATE_LENGTH || len2 <= DEGENERATE_LENGTH {
        return 0.0;
    }

    // Clamp so floating-point overshoot never leaves acos' domain
    let cos_theta = (v1.dot(v2) / (len1 * len2)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Convert a length in screen pixels to centimeters.
///
/// `dpi` is the display density along the measured axis and `calibration`
/// a user correction factor (1.0 for none).
pub fn px_to_cm(px: f64, dpi: f64, calibration: f64) -> f64 {
    (px / dpi) * CM_PER_INCH * calibration
}

/// Convert a screen-space point to world space.
pub fn screen_to_world(screen_point: Point, transform: &ViewportTransform) -> Point {
    transform.screen_to_world(screen_point)
}

/// Convert a world-space point to screen space.
pub fn world_to_screen(world_point: Point, transform: &ViewportTransform) -> Point {
    transform.world_to_screen(world_point)
}
