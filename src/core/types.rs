//! Core type definitions used throughout the codebase

use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// An `[x, y]` pair in parcel distance units
pub type Point2 = [f64; 2];

/// An open or closed ring of `[x, y]` vertices, as supplied by callers
pub type Ring = Vec<Point2>;

/// 2D position / direction in parcel distance units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotate counter-clockwise about the origin
    pub fn rotated(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn to_array(self) -> Point2 {
        [self.x, self.y]
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl From<Vec2> for Coord<f64> {
    fn from(v: Vec2) -> Self {
        Coord { x: v.x, y: v.y }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing all points; `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(*first, *first);
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn diagonal(&self) -> f64 {
        self.min.distance(&self.max)
    }

    /// True if `other` lies entirely inside this box (edges may touch)
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// True if the interiors of the two boxes overlap
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Build a single-ring polygon from caller-supplied vertices.
///
/// The ring is closed implicitly; a duplicated closing vertex is harmless.
pub fn ring_to_polygon(ring: &[Point2]) -> Polygon<f64> {
    let coords: Vec<(f64, f64)> = ring.iter().map(|[x, y]| (*x, *y)).collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Exterior vertices of a polygon without the closing duplicate
pub fn polygon_to_ring(polygon: &Polygon<f64>) -> Ring {
    let coords = &polygon.exterior().0;
    let open = if coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        &coords[..]
    };
    open.iter().map(|c| [c.x, c.y]).collect()
}
