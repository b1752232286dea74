//! Strokes and the ordered collection they are committed to.

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// Default pen stroke width in pixels.
pub const DEFAULT_PEN_WIDTH: f64 = 6.0;
/// Narrowest pen stroke.
pub const MIN_PEN_WIDTH: f64 = 1.0;
/// Widest pen stroke.
pub const MAX_PEN_WIDTH: f64 = 30.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }

    pub const fn green() -> Self {
        Self::new(0, 255, 0, 255)
    }

    pub const fn blue() -> Self {
        Self::new(0, 0, 255, 255)
    }

    pub const fn magenta() -> Self {
        Self::new(255, 0, 255, 255)
    }

    pub const fn dark_gray() -> Self {
        Self::new(68, 68, 68, 255)
    }

    pub const fn amber() -> Self {
        Self::new(255, 160, 0, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Pen colors offered to the user, in display order.
pub const PALETTE: [SerializableColor; 6] = [
    SerializableColor::black(),
    SerializableColor::red(),
    SerializableColor::blue(),
    SerializableColor::green(),
    SerializableColor::magenta(),
    SerializableColor::amber(),
];

/// A committed polyline in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    /// Points in world coordinates, in drawing order.
    pub points: Vec<Point>,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in screen pixels.
    pub width_px: f64,
}

impl Stroke {
    /// Create a stroke from accumulated points.
    pub fn new(points: Vec<Point>, color: SerializableColor, width_px: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width_px,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total polyline length in world units.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Axis-aligned bounds of the points.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Polyline path for rendering.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for point in points {
                path.line_to(*point);
            }
        }
        path
    }
}

/// Ordered sequence of committed strokes, back to front.
///
/// Only appended to, except for wholesale replacement by undo/redo and clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeCollection {
    strokes: Vec<Stroke>,
}

impl StrokeCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Remove every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Bounding box of all strokes, if any.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .filter(|s| !s.is_empty())
            .map(Stroke::bounds)
            .reduce(|a, b| a.union(b))
    }
}

impl From<Vec<Stroke>> for StrokeCollection {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }
}

impl From<StrokeCollection> for Vec<Stroke> {
    fn from(collection: StrokeCollection) -> Self {
        collection.strokes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Stroke {
        Stroke::new(
            vec![Point::new(x0, y0), Point::new(x1, y1)],
            SerializableColor::black(),
            DEFAULT_PEN_WIDTH,
        )
    }

    #[test]
    fn test_stroke_length() {
        let stroke = Stroke::new(
            vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 10.0)],
            SerializableColor::red(),
            2.0,
        );
        assert_eq!(stroke.len(), 3);
        assert!((stroke.length() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_stroke_bounds() {
        let stroke = Stroke::new(
            vec![Point::new(10.0, 5.0), Point::new(-2.0, 40.0), Point::new(7.0, 0.0)],
            SerializableColor::black(),
            1.0,
        );
        let bounds = stroke.bounds();
        assert_eq!(bounds, Rect::new(-2.0, 0.0, 10.0, 40.0));
    }

    #[test]
    fn test_stroke_to_path() {
        let stroke = Stroke::new(
            vec![Point::new(1.0, 2.0), Point::new(5.0, 2.0), Point::new(5.0, 8.0)],
            SerializableColor::blue(),
            4.0,
        );
        let path = stroke.to_path();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(1.0, 2.0)),
                PathEl::LineTo(Point::new(5.0, 2.0)),
                PathEl::LineTo(Point::new(5.0, 8.0)),
            ]
        );

        let empty = Stroke::new(Vec::new(), SerializableColor::black(), 1.0);
        assert!(empty.to_path().elements().is_empty());
    }

    #[test]
    fn test_collection_push_and_bounds() {
        let mut strokes = StrokeCollection::new();
        assert!(strokes.bounds().is_none());

        let a = line(0.0, 0.0, 10.0, 10.0);
        let id = a.id();
        strokes.push(a);
        strokes.push(line(20.0, -5.0, 30.0, 0.0));

        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes.strokes()[0].id(), id);
        assert_eq!(strokes.bounds(), Some(Rect::new(0.0, -5.0, 30.0, 10.0)));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut strokes = StrokeCollection::new();
        strokes.push(line(0.0, 0.0, 1.0, 1.0));
        let copy = strokes.clone();
        strokes.clear();
        assert_eq!(copy.len(), 1);
        assert!(strokes.is_empty());
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = SerializableColor::amber().into();
        assert_eq!(SerializableColor::from(color), SerializableColor::amber());
        assert_eq!(PALETTE[0], SerializableColor::black());
    }
}
