//! Per-run accumulator of committed modules

use super::module::{CommittedModule, PassKind};
use super::validator::ValidPlacement;
use crate::spatial::geometry::BoundedPolygon;

/// Modules committed so far and the footprints they block.
///
/// Append-only: passes take the state by value, add to it, and hand it on.
/// Nothing is ever removed, so any intermediate state is a valid partial
/// result.
#[derive(Debug, Clone)]
pub struct OptimizationState {
    modules: Vec<CommittedModule>,
    footprints: Vec<BoundedPolygon>,
    covered_area: f64,
    land_area: f64,
}

impl OptimizationState {
    pub fn new(land_area: f64) -> Self {
        Self {
            modules: Vec::new(),
            footprints: Vec::new(),
            covered_area: 0.0,
            land_area,
        }
    }

    pub fn commit(&mut self, placement: ValidPlacement, pass: PassKind) {
        self.covered_area += placement.candidate.area();
        self.footprints.push(placement.footprint.clone());
        self.modules.push(CommittedModule {
            candidate: placement.candidate,
            shape: placement.shape,
            footprint: placement.footprint,
            pass,
        });
    }

    pub fn modules(&self) -> &[CommittedModule] {
        &self.modules
    }

    pub fn footprints(&self) -> &[BoundedPolygon] {
        &self.footprints
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn covered_area(&self) -> f64 {
        self.covered_area
    }

    pub fn land_area(&self) -> f64 {
        self.land_area
    }

    /// Covered fraction of the land area (0.0 - 1.0+)
    pub fn coverage(&self) -> f64 {
        if self.land_area > 0.0 {
            self.covered_area / self.land_area
        } else {
            0.0
        }
    }

    pub fn into_modules(self) -> Vec<CommittedModule> {
        self.modules
    }
}
