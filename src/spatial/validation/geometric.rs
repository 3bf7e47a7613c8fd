//! Geometric validation: vertex count, finiteness, self-intersection, winding

use super::{RingError, Winding};
use crate::core::types::{Point2, Ring};

pub struct RingValidator;

impl RingValidator {
    /// Validate a ring given as `[x, y]` vertices.
    ///
    /// A trailing vertex equal to the first is treated as the implicit
    /// closing vertex and ignored.
    pub fn validate_ring(vertices: &[Point2]) -> Vec<RingError> {
        let mut errors = Vec::new();

        if let Some(index) = vertices
            .iter()
            .position(|[x, y]| !x.is_finite() || !y.is_finite())
        {
            errors.push(RingError::NonFiniteCoordinate { index });
            return errors;
        }

        let ring = Self::open_ring(vertices);

        // Check minimum vertices
        if ring.len() < 3 {
            errors.push(RingError::InsufficientVertices {
                count: ring.len(),
                minimum: 3,
            });
            return errors; // Can't do further checks
        }

        // Crossing edges can cancel out the signed area, so report them first
        if Self::is_self_intersecting(&ring) {
            errors.push(RingError::SelfIntersecting {
                description: "Ring edges cross each other".into(),
            });
            return errors;
        }

        if Self::signed_area(&ring).abs() < f64::EPSILON {
            errors.push(RingError::ZeroArea);
        }

        errors
    }

    /// Drop consecutive duplicates and the explicit closing vertex, then
    /// orient counter-clockwise.
    pub fn normalize(vertices: &[Point2]) -> Ring {
        let mut ring = Self::open_ring(vertices);
        if Self::winding(&ring) == Winding::Clockwise {
            ring.reverse();
        }
        ring
    }

    pub fn winding(ring: &[Point2]) -> Winding {
        if Self::signed_area(ring) >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Shoelace formula: positive area = CCW
    pub fn signed_area(ring: &[Point2]) -> f64 {
        let n = ring.len();
        let mut sum = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            sum += ring[i][0] * ring[j][1] - ring[j][0] * ring[i][1];
        }
        sum / 2.0
    }

    fn open_ring(vertices: &[Point2]) -> Ring {
        let mut ring: Ring = Vec::with_capacity(vertices.len());
        for v in vertices {
            if ring.last() != Some(v) {
                ring.push(*v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }

    /// Check if ring edges intersect each other (excluding adjacent edges)
    fn is_self_intersecting(ring: &[Point2]) -> bool {
        let n = ring.len();
        if n < 4 {
            return false; // Triangle can't self-intersect
        }

        for i in 0..n {
            let a1 = ring[i];
            let a2 = ring[(i + 1) % n];

            for j in (i + 2)..n {
                // Skip adjacent edges
                if j == (i + n - 1) % n {
                    continue;
                }

                let b1 = ring[j];
                let b2 = ring[(j + 1) % n];

                if Self::segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    /// Proper crossing of two segments (touching endpoints don't count)
    fn segments_intersect(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> bool {
        let d1 = Self::cross(b1, b2, a1);
        let d2 = Self::cross(b1, b2, a2);
        let d3 = Self::cross(a1, a2, b1);
        let d4 = Self::cross(a1, a2, b2);

        ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    }

    fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    }
}
