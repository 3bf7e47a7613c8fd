//! Module sizes, placement candidates and committed modules

use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::core::types::{Point2, Vec2};
use crate::spatial::geometry::BoundedPolygon;

/// Which refinement pass committed a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Primary,
    GapFillMedium,
    GapFillSmall,
}

impl PassKind {
    pub fn number(&self) -> u8 {
        match self {
            PassKind::Primary => 1,
            PassKind::GapFillMedium => 2,
            PassKind::GapFillSmall => 3,
        }
    }
}

/// Legal module dimensions, stored as whole base-unit counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleCandidateSize {
    pub width_units: u32,
    pub depth_units: u32,
    pub width: f64,
    pub depth: f64,
}

impl ModuleCandidateSize {
    pub fn new(width_units: u32, depth_units: u32, unit_width: f64, unit_depth: f64) -> Self {
        Self {
            width_units,
            depth_units,
            width: width_units as f64 * unit_width,
            depth: depth_units as f64 * unit_depth,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Number of base-unit cells the module is made of
    pub fn sub_blocks(&self) -> u32 {
        self.width_units * self.depth_units
    }
}

/// A size at a position and rotation, evaluated but not committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCandidate {
    pub size: ModuleCandidateSize,
    pub center: Vec2,
    /// Counter-clockwise, degrees. Width runs along the rotated x axis.
    pub rotation_deg: f64,
}

impl PlacementCandidate {
    pub fn new(size: ModuleCandidateSize, center: Vec2, rotation_deg: f64) -> Self {
        Self {
            size,
            center,
            rotation_deg,
        }
    }

    /// Counter-clockwise corners starting from the local bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        self.corners_grown(0.0)
    }

    /// Corners of the rectangle grown by `margin` on every side.
    /// A negative margin shrinks it.
    pub fn corners_grown(&self, margin: f64) -> [Vec2; 4] {
        let hw = self.size.width / 2.0 + margin;
        let hd = self.size.depth / 2.0 + margin;
        [
            Vec2::new(-hw, -hd),
            Vec2::new(hw, -hd),
            Vec2::new(hw, hd),
            Vec2::new(-hw, hd),
        ]
        .map(|local| self.center + local.rotated(self.rotation_deg))
    }

    pub fn polygon(&self) -> Polygon<f64> {
        corners_to_polygon(&self.corners())
    }

    /// Footprint blocking later placements: the module grown by `corridor`
    pub fn footprint(&self, corridor: f64) -> Polygon<f64> {
        corners_to_polygon(&self.corners_grown(corridor))
    }

    pub fn area(&self) -> f64 {
        self.size.area()
    }
}

pub(crate) fn corners_to_polygon(corners: &[Vec2; 4]) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = corners.iter().map(|c| (c.x, c.y)).collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// A candidate that passed validation and was appended to the run state
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedModule {
    pub candidate: PlacementCandidate,
    pub shape: BoundedPolygon,
    pub footprint: BoundedPolygon,
    pub pass: PassKind,
}

/// One base-unit cell of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBlock {
    pub row: u32,
    pub column: u32,
    pub corners: [Point2; 4],
}

/// A module subdivided into base-unit cells, in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBlockGrid {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: f64,
    pub cell_depth: f64,
    pub cells: Vec<SubBlock>,
}

impl SubBlockGrid {
    pub fn for_candidate(candidate: &PlacementCandidate) -> Self {
        let size = candidate.size;
        let columns = size.width_units;
        let rows = size.depth_units;
        let cell_width = size.width / columns.max(1) as f64;
        let cell_depth = size.depth / rows.max(1) as f64;
        let origin = Vec2::new(-size.width / 2.0, -size.depth / 2.0);

        let mut cells = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let x0 = origin.x + column as f64 * cell_width;
                let y0 = origin.y + row as f64 * cell_depth;
                let corners = [
                    Vec2::new(x0, y0),
                    Vec2::new(x0 + cell_width, y0),
                    Vec2::new(x0 + cell_width, y0 + cell_depth),
                    Vec2::new(x0, y0 + cell_depth),
                ]
                .map(|local| (candidate.center + local.rotated(candidate.rotation_deg)).to_array());
                cells.push(SubBlock {
                    row,
                    column,
                    corners,
                });
            }
        }

        Self {
            columns,
            rows,
            cell_width,
            cell_depth,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, d: u32) -> ModuleCandidateSize {
        ModuleCandidateSize::new(w, d, 8.0, 4.0)
    }

    #[test]
    fn test_size_dimensions_are_unit_multiples() {
        let s = size(13, 24);
        assert_eq!(s.width, 104.0);
        assert_eq!(s.depth, 96.0);
        assert_eq!(s.area(), 9_984.0);
        assert_eq!(s.sub_blocks(), 312);
    }

    #[test]
    fn test_axis_aligned_corners() {
        let c = PlacementCandidate::new(size(2, 2), Vec2::new(10.0, 10.0), 0.0);
        let corners = c.corners();
        assert_eq!(corners[0], Vec2::new(2.0, 6.0));
        assert_eq!(corners[2], Vec2::new(18.0, 14.0));
    }

    #[test]
    fn test_rotated_corners_swap_extents() {
        let c = PlacementCandidate::new(size(2, 2), Vec2::new(0.0, 0.0), 90.0);
        let corners = c.corners();
        // local bottom-left (-8, -4) rotates to (4, -8)
        assert!((corners[0].x - 4.0).abs() < 1e-9);
        assert!((corners[0].y + 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_footprint_grows_each_side() {
        let c = PlacementCandidate::new(size(1, 1), Vec2::new(0.0, 0.0), 0.0);
        let footprint = BoundedPolygon::new(c.footprint(2.0));
        assert_eq!(footprint.bbox.min, Vec2::new(-6.0, -4.0));
        assert_eq!(footprint.bbox.max, Vec2::new(6.0, 4.0));
    }

    #[test]
    fn test_sub_block_grid_tiles_module() {
        let c = PlacementCandidate::new(size(3, 2), Vec2::new(12.0, 4.0), 0.0);
        let grid = SubBlockGrid::for_candidate(&c);
        assert_eq!(grid.cells.len(), 6);
        assert_eq!(grid.cell_width, 8.0);
        assert_eq!(grid.cell_depth, 4.0);
        assert_eq!(grid.cells[0].corners[0], [0.0, 0.0]);
        assert_eq!(grid.cells[5].corners[2], [24.0, 8.0]);
        assert_eq!((grid.cells[4].row, grid.cells[4].column), (1, 1));
    }
}
