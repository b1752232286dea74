//! Viewport transform between screen pixels and world coordinates.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower bound for the viewport scale.
pub const DEFAULT_MIN_SCALE: f64 = 0.3;
/// Default upper bound for the viewport scale.
pub const DEFAULT_MAX_SCALE: f64 = 4.0;

/// Pan offset and zoom scale relating screen space to world space.
///
/// `screen = world * scale + offset`. The scale is always clamped to
/// `[min_scale, max_scale]`, which keeps it strictly positive. Deserialized
/// values go through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportData", into = "ViewportData")]
pub struct ViewportTransform {
    /// Pan offset, in screen pixels.
    pub offset: Vec2,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
}

/// Unchecked wire form of [`ViewportTransform`].
#[derive(Serialize, Deserialize)]
struct ViewportData {
    offset: Vec2,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl TryFrom<ViewportData> for ViewportTransform {
    type Error = String;

    fn try_from(data: ViewportData) -> Result<Self, Self::Error> {
        if !is_valid_scale_range(data.min_scale, data.max_scale) {
            return Err(format!(
                "scale range [{}, {}] must satisfy 0 < min <= max",
                data.min_scale, data.max_scale
            ));
        }
        if !data.scale.is_finite() || !data.offset.is_finite() {
            return Err("viewport scale and offset must be finite".to_string());
        }
        Ok(Self {
            offset: data.offset,
            scale: data.scale.clamp(data.min_scale, data.max_scale),
            min_scale: data.min_scale,
            max_scale: data.max_scale,
        })
    }
}

impl From<ViewportTransform> for ViewportData {
    fn from(viewport: ViewportTransform) -> Self {
        Self {
            offset: viewport.offset,
            scale: viewport.scale,
            min_scale: viewport.min_scale,
            max_scale: viewport.max_scale,
        }
    }
}

/// Whether `[min_scale, max_scale]` is a usable, strictly positive range.
pub fn is_valid_scale_range(min_scale: f64, max_scale: f64) -> bool {
    min_scale.is_finite() && max_scale.is_finite() && min_scale > 0.0 && min_scale <= max_scale
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl ViewportTransform {
    /// Unpanned viewport at scale 1 with the default range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unpanned viewport with a custom scale range.
    ///
    /// An unusable range (non-finite, non-positive or inverted) is replaced
    /// by the default one.
    pub fn with_scale_range(min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if is_valid_scale_range(min_scale, max_scale) {
            (min_scale, max_scale)
        } else {
            log::warn!(
                "Ignoring scale range [{}, {}], using [{}, {}]",
                min_scale,
                max_scale,
                DEFAULT_MIN_SCALE,
                DEFAULT_MAX_SCALE
            );
            (DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
        };
        Self {
            offset: Vec2::ZERO,
            scale: 1.0_f64.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `(min, max)` bounds of the scale.
    pub fn scale_range(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Set the scale, clamped. Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    /// World-to-screen affine, for the renderer.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen-to-world affine, for incoming pointer positions.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// `(screen - offset) / scale`.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// `world * scale + offset`.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-space length (e.g. a pan delta) to world space.
    pub fn screen_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Shift the content by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply the scale by `factor`, clamped. The offset is left alone, so
    /// the world origin stays fixed on screen.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_scale(self.scale * factor);
    }

    /// Pinch zoom: scale by `factor` around `anchor`, which stays put on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let before = self.scale;
        let world_anchor = self.screen_to_world(anchor);
        self.set_scale(before * factor);
        if self.scale == before {
            return;
        }
        self.offset = anchor.to_vec2() - world_anchor.to_vec2() * self.scale;
    }

    /// Back to no pan and scale 1, keeping the scale range.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.set_scale(1.0);
    }
}
