//! Sequential labels and display colors for committed modules

use super::result::PlacedModule;
use crate::placement::module::{CommittedModule, SubBlockGrid};

/// Display palette, cycled by placement index
pub const PALETTE: [&str; 10] = [
    "#4e79a7", // Blue
    "#f28e2b", // Orange
    "#59a14f", // Green
    "#e15759", // Red
    "#76b7b2", // Teal
    "#edc948", // Yellow
    "#b07aa1", // Purple
    "#ff9da7", // Pink
    "#9c755f", // Brown
    "#bab0ac", // Gray
];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Label modules 1..N in commit order
pub fn label_modules(modules: &[CommittedModule]) -> Vec<PlacedModule> {
    modules
        .iter()
        .enumerate()
        .map(|(index, module)| {
            let candidate = &module.candidate;
            let footprint = corner_array(&module.footprint.polygon);
            PlacedModule {
                label: index as u32 + 1,
                color: color_for(index).to_string(),
                pass: module.pass,
                center: candidate.center.to_array(),
                rotation_deg: candidate.rotation_deg,
                width: candidate.size.width,
                depth: candidate.size.depth,
                area: candidate.area(),
                corners: candidate.corners().map(|c| c.to_array()),
                footprint,
                sub_blocks: SubBlockGrid::for_candidate(candidate),
            }
        })
        .collect()
}

fn corner_array(polygon: &geo_types::Polygon<f64>) -> [[f64; 2]; 4] {
    let mut corners = [[0.0; 2]; 4];
    for (slot, coord) in corners.iter_mut().zip(polygon.exterior().coords()) {
        *slot = [coord.x, coord.y];
    }
    corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::placement::module::{ModuleCandidateSize, PassKind, PlacementCandidate};
    use crate::spatial::geometry::BoundedPolygon;

    fn committed(x: f64) -> CommittedModule {
        let candidate =
            PlacementCandidate::new(ModuleCandidateSize::new(2, 4, 8.0, 4.0), Vec2::new(x, 0.0), 0.0);
        CommittedModule {
            candidate,
            shape: BoundedPolygon::new(candidate.polygon()),
            footprint: BoundedPolygon::new(candidate.footprint(2.0)),
            pass: PassKind::Primary,
        }
    }

    #[test]
    fn test_labels_are_sequential_from_one() {
        let modules: Vec<_> = (0..3).map(|i| committed(i as f64 * 30.0)).collect();
        let labelled = label_modules(&modules);
        let labels: Vec<u32> = labelled.iter().map(|m| m.label).collect();
        assert_eq!(labels, vec![1, 2, 3]);
        assert_eq!(labelled[1].center, [30.0, 0.0]);
    }

    #[test]
    fn test_palette_cycles() {
        let modules: Vec<_> = (0..12).map(|i| committed(i as f64 * 30.0)).collect();
        let labelled = label_modules(&modules);
        assert_eq!(labelled[0].color, PALETTE[0]);
        assert_eq!(labelled[10].color, PALETTE[0]);
        assert_eq!(labelled[11].color, PALETTE[1]);
    }

    #[test]
    fn test_footprint_and_sub_blocks_carried() {
        let labelled = label_modules(&[committed(0.0)]);
        let module = &labelled[0];
        assert_eq!(module.footprint[0], [-10.0, -10.0]);
        assert_eq!(module.footprint[2], [10.0, 10.0]);
        assert_eq!(module.sub_blocks.cells.len(), 8);
        assert_eq!(module.area, 256.0);
    }
}
