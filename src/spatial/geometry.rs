//! Narrow polygon-operations interface used by the optimizer
//!
//! Everything the placement search needs from a computational-geometry
//! library goes through [`GeometryOps`]. [`GeoOps`] implements it on top of
//! the `geo` crate; tests or alternative backends can substitute their own.

use geo::{Area, BooleanOps, BoundingRect, Buffer, Contains, Relate};
use geo_types::{MultiPolygon, Point, Polygon};

use crate::core::types::{BoundingBox, Vec2};

/// Polygon operations consumed by the optimizer
pub trait GeometryOps {
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    fn difference(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    /// Grow (positive) or shrink (negative) a shape by `distance`
    fn offset(&self, shape: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64>;

    fn area(&self, shape: &MultiPolygon<f64>) -> f64;

    fn bounding_box(&self, shape: &MultiPolygon<f64>) -> Option<BoundingBox>;

    /// True if `container` contains `candidate` (boundary contact allowed)
    fn contains(&self, container: &MultiPolygon<f64>, candidate: &Polygon<f64>) -> bool;

    /// Inverse predicate of [`GeometryOps::contains`], evaluated from the candidate's side
    fn within(&self, candidate: &Polygon<f64>, container: &MultiPolygon<f64>) -> bool;

    /// True if the two polygons overlap, or one contains the other.
    /// Shapes that only share boundary points do not count.
    fn interiors_intersect(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;

    /// True if the point lies strictly inside the shape
    fn contains_point(&self, shape: &MultiPolygon<f64>, point: Vec2) -> bool;

    /// Union of any number of polygons; empty input gives an empty shape
    fn union_all(&self, polygons: &[Polygon<f64>]) -> MultiPolygon<f64> {
        polygons.iter().fold(MultiPolygon::new(vec![]), |acc, polygon| {
            self.union(&acc, &MultiPolygon::new(vec![polygon.clone()]))
        })
    }
}

/// A polygon with its bounding box cached for cheap rejection tests
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPolygon {
    pub polygon: Polygon<f64>,
    pub bbox: BoundingBox,
}

impl BoundedPolygon {
    pub fn new(polygon: Polygon<f64>) -> Self {
        let points: Vec<Vec2> = polygon
            .exterior()
            .coords()
            .map(|c| Vec2::new(c.x, c.y))
            .collect();
        let bbox = BoundingBox::from_points(&points).unwrap_or_default();
        Self { polygon, bbox }
    }
}

/// [`GeometryOps`] backed by the `geo` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoOps;

impl GeometryOps for GeoOps {
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        if a.0.is_empty() {
            return b.clone();
        }
        if b.0.is_empty() {
            return a.clone();
        }
        a.union(b)
    }

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        a.intersection(b)
    }

    fn difference(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        if b.0.is_empty() {
            return a.clone();
        }
        a.difference(b)
    }

    fn offset(&self, shape: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
        if distance == 0.0 || shape.0.is_empty() {
            return shape.clone();
        }
        shape.buffer(distance)
    }

    fn area(&self, shape: &MultiPolygon<f64>) -> f64 {
        shape.unsigned_area()
    }

    fn bounding_box(&self, shape: &MultiPolygon<f64>) -> Option<BoundingBox> {
        shape.bounding_rect().map(|rect| {
            BoundingBox::new(
                Vec2::new(rect.min().x, rect.min().y),
                Vec2::new(rect.max().x, rect.max().y),
            )
        })
    }

    fn contains(&self, container: &MultiPolygon<f64>, candidate: &Polygon<f64>) -> bool {
        container.relate(candidate).is_contains()
    }

    fn within(&self, candidate: &Polygon<f64>, container: &MultiPolygon<f64>) -> bool {
        candidate.relate(container).is_within()
    }

    fn interiors_intersect(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        let matrix = a.relate(b);
        matrix.is_intersects() && !matrix.is_touches()
    }

    fn contains_point(&self, shape: &MultiPolygon<f64>, point: Vec2) -> bool {
        shape.contains(&Point::new(point.x, point.y))
    }
}
