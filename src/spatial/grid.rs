//! Raster scan over a bounding box

use crate::core::types::{BoundingBox, Vec2};

/// Row-major iterator over raster points covering a bounding box.
///
/// Points are spaced `step` apart and centred in the box, bottom row first,
/// left to right within a row. A box narrower than `step` still yields its
/// centre line, so every non-degenerate box produces at least one point.
#[derive(Debug, Clone)]
pub struct RasterScan {
    pub columns: usize,
    pub rows: usize,
    pub step: f64,
    pub origin: Vec2,
    next: usize,
}

impl RasterScan {
    pub fn new(bbox: &BoundingBox, step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
        let (columns, offset_x) = Self::axis(bbox.width(), step);
        let (rows, offset_y) = Self::axis(bbox.height(), step);
        Self {
            columns,
            rows,
            step,
            origin: Vec2::new(bbox.min.x + offset_x, bbox.min.y + offset_y),
            next: 0,
        }
    }

    /// Point count along one axis and the offset that centres them
    fn axis(extent: f64, step: f64) -> (usize, f64) {
        let extent = extent.max(0.0);
        let count = (extent / step).floor() as usize + 1;
        let span = (count - 1) as f64 * step;
        (count, (extent - span) / 2.0)
    }

    /// World position of the point at column `x`, row `y`
    #[inline]
    pub fn point(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + x as f64 * self.step,
            self.origin.y + y as f64 * self.step,
        )
    }

    pub fn total(&self) -> usize {
        self.columns * self.rows
    }
}

impl Iterator for RasterScan {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.next >= self.total() {
            return None;
        }
        let (x, y) = (self.next % self.columns, self.next / self.columns);
        self.next += 1;
        Some(self.point(x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RasterScan {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(w: f64, h: f64) -> BoundingBox {
        BoundingBox::new(Vec2::new(0.0, 0.0), Vec2::new(w, h))
    }

    #[test]
    fn test_points_centered_in_box() {
        let scan = RasterScan::new(&bbox(198.0, 98.0), 10.0);
        assert_eq!(scan.columns, 20);
        assert_eq!(scan.rows, 10);
        assert_eq!(scan.origin, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_row_major_bottom_first() {
        let points: Vec<Vec2> = RasterScan::new(&bbox(2.0, 2.0), 1.0).collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], Vec2::new(0.0, 0.0));
        assert_eq!(points[1], Vec2::new(1.0, 0.0));
        assert_eq!(points[3], Vec2::new(0.0, 1.0));
        assert_eq!(points[8], Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_narrow_box_yields_centre() {
        let points: Vec<Vec2> = RasterScan::new(&bbox(3.0, 3.0), 10.0).collect();
        assert_eq!(points, vec![Vec2::new(1.5, 1.5)]);
    }

    #[test]
    fn test_size_hint_counts_down() {
        let mut scan = RasterScan::new(&bbox(4.0, 0.0), 2.0);
        assert_eq!(scan.len(), 3);
        scan.next();
        assert_eq!(scan.len(), 2);
    }

    #[test]
    fn test_invalid_step_falls_back_to_unit() {
        let scan = RasterScan::new(&bbox(2.0, 0.0), f64::NAN);
        assert_eq!(scan.step, 1.0);
        assert_eq!(scan.columns, 3);
    }
}
