//! Greedy grid-search placement
//!
//! One pass scans the buildable region's bounding box in raster order. At
//! each point inside the polygon, every active rotation is tried against the
//! size list (largest first). Each rotation contributes its first valid size,
//! and the largest of those is committed immediately. There is no
//! backtracking: a committed module only ever narrows what later points can
//! hold.

use serde::{Deserialize, Serialize};

use super::module::{ModuleCandidateSize, PassKind, PlacementCandidate};
use super::state::OptimizationState;
use super::stopping::{StopPolicy, StopReason};
use super::validator::{PlacementValidator, RejectionTally, ValidPlacement, Verdict};
use crate::core::types::{BoundingBox, Vec2};
use crate::optimizer::cancel::RunGuard;
use crate::spatial::geometry::GeometryOps;
use crate::spatial::grid::RasterScan;

/// Inputs of one pass
#[derive(Debug, Clone)]
pub struct PassSpec<'a> {
    pub kind: PassKind,
    pub sizes: &'a [ModuleCandidateSize],
    pub rotations: &'a [f64],
    pub step: f64,
    pub policy: StopPolicy,
}

/// What a pass did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassOutcome {
    pub kind: PassKind,
    pub placed: usize,
    pub stop_reason: StopReason,
    pub raster_step: f64,
    pub raster_points: usize,
    pub points_inside: usize,
    pub tally: RejectionTally,
}

pub struct GridSearchPlacer<'a, G: GeometryOps> {
    ops: &'a G,
    validator: &'a PlacementValidator<'a, G>,
    bbox: BoundingBox,
    buildable: &'a geo_types::MultiPolygon<f64>,
    guard: &'a RunGuard,
}

impl<'a, G: GeometryOps> GridSearchPlacer<'a, G> {
    pub fn new(
        ops: &'a G,
        validator: &'a PlacementValidator<'a, G>,
        buildable: &'a geo_types::MultiPolygon<f64>,
        bbox: BoundingBox,
        guard: &'a RunGuard,
    ) -> Self {
        Self {
            ops,
            validator,
            bbox,
            buildable,
            guard,
        }
    }

    /// Run one pass over the raster: `state_in -> state_out`
    pub fn run_pass(
        &self,
        spec: &PassSpec<'_>,
        mut state: OptimizationState,
    ) -> (OptimizationState, PassOutcome) {
        let scan = RasterScan::new(&self.bbox, spec.step);
        let mut outcome = PassOutcome {
            kind: spec.kind,
            placed: 0,
            stop_reason: StopReason::Exhausted,
            raster_step: scan.step,
            raster_points: scan.total(),
            points_inside: 0,
            tally: RejectionTally::default(),
        };

        if let Some(reason) = spec.policy.check(state.coverage(), 0, state.module_count()) {
            outcome.stop_reason = reason;
            return (state, outcome);
        }

        for point in scan {
            if let Some(interruption) = self.guard.check() {
                outcome.stop_reason = interruption.into();
                break;
            }
            if !self.ops.contains_point(self.buildable, point) {
                continue;
            }
            outcome.points_inside += 1;

            let Some(best) = self.best_at(point, spec, &state, &mut outcome.tally) else {
                continue;
            };
            state.commit(best, spec.kind);
            outcome.placed += 1;

            if let Some(reason) = spec.policy.check(state.coverage(), outcome.placed, state.module_count()) {
                outcome.stop_reason = reason;
                break;
            }
        }

        (state, outcome)
    }

    /// Largest valid module at `point` across all active rotations.
    ///
    /// Per rotation only the first valid size counts. Ties keep the earlier
    /// rotation.
    fn best_at(
        &self,
        point: Vec2,
        spec: &PassSpec<'_>,
        state: &OptimizationState,
        tally: &mut RejectionTally,
    ) -> Option<ValidPlacement> {
        let mut best: Option<ValidPlacement> = None;

        for &rotation in spec.rotations {
            for size in spec.sizes {
                // Sizes are sorted, so nothing further in this rotation can win
                if best.as_ref().is_some_and(|b| size.area() <= b.candidate.area()) {
                    break;
                }

                let candidate = PlacementCandidate::new(*size, point, rotation);
                let verdict = self.validator.validate(&candidate, state.footprints());
                tally.record(&verdict);
                if let Verdict::Valid(placement) = verdict {
                    best = Some(placement);
                    break;
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::{LandAreaSpec, LandRegion};
    use crate::spatial::geometry::GeoOps;

    fn sizes(list: &[(u32, u32)]) -> Vec<ModuleCandidateSize> {
        list.iter()
            .map(|&(w, d)| ModuleCandidateSize::new(w, d, 8.0, 4.0))
            .collect()
    }

    fn open_policy() -> StopPolicy {
        StopPolicy {
            coverage_ceiling: 1.0,
            max_new_modules: usize::MAX,
            global_cap: usize::MAX,
        }
    }

    #[test]
    fn test_fills_strip_left_to_right() {
        let buildable = LandRegion::from_spec(&LandAreaSpec::rectangle(100.0, 20.0), &[], 0.0)
            .unwrap()
            .build(&GeoOps, 0.1)
            .unwrap();
        let validator = PlacementValidator::new(&GeoOps, &buildable, 1, 1.0);
        let guard = RunGuard::unbounded();
        let placer = GridSearchPlacer::new(&GeoOps, &validator, &buildable.polygon, buildable.bbox, &guard);

        let size_list = sizes(&[(4, 4)]); // 32 x 16
        let spec = PassSpec {
            kind: PassKind::Primary,
            sizes: &size_list,
            rotations: &[0.0],
            step: 2.0,
            policy: open_policy(),
        };
        let (state, outcome) = placer.run_pass(&spec, OptimizationState::new(buildable.land_area));

        // 32-wide modules with 2 units of clear space between them, the last
        // one flush with the far edge
        assert_eq!(outcome.placed, 3);
        assert_eq!(outcome.stop_reason, StopReason::Exhausted);
        let xs: Vec<f64> = state.modules().iter().map(|m| m.candidate.center.x).collect();
        assert!(xs[0] < xs[1]);
        assert!(xs[1] - xs[0] >= 32.0 + 2.0);
        assert!(xs[2] - xs[1] >= 32.0 + 2.0);
    }

    #[test]
    fn test_rotation_that_fits_is_used() {
        // Tall narrow parcel: only the rotated orientation fits the 64-wide module
        let buildable = LandRegion::from_spec(&LandAreaSpec::rectangle(20.0, 100.0), &[], 0.0)
            .unwrap()
            .build(&GeoOps, 0.1)
            .unwrap();
        let validator = PlacementValidator::new(&GeoOps, &buildable, 1, 1.0);
        let guard = RunGuard::unbounded();
        let placer = GridSearchPlacer::new(&GeoOps, &validator, &buildable.polygon, buildable.bbox, &guard);

        let size_list = sizes(&[(8, 4)]); // 64 x 16
        let spec = PassSpec {
            kind: PassKind::Primary,
            sizes: &size_list,
            rotations: &[0.0, 90.0],
            step: 2.0,
            policy: StopPolicy {
                max_new_modules: 1,
                ..open_policy()
            },
        };
        let (state, outcome) = placer.run_pass(&spec, OptimizationState::new(buildable.land_area));

        assert_eq!(outcome.stop_reason, StopReason::PassCap);
        let module = &state.modules()[0];
        assert_eq!(module.candidate.size.width, 64.0);
        assert_eq!(module.candidate.rotation_deg, 90.0);
    }

    #[test]
    fn test_policy_checked_before_scanning() {
        let buildable = LandRegion::from_spec(&LandAreaSpec::rectangle(50.0, 50.0), &[], 0.0)
            .unwrap()
            .build(&GeoOps, 0.1)
            .unwrap();
        let validator = PlacementValidator::new(&GeoOps, &buildable, 1, 1.0);
        let guard = RunGuard::unbounded();
        let placer = GridSearchPlacer::new(&GeoOps, &validator, &buildable.polygon, buildable.bbox, &guard);

        let size_list = sizes(&[(2, 2)]);
        let spec = PassSpec {
            kind: PassKind::GapFillSmall,
            sizes: &size_list,
            rotations: &[0.0],
            step: 5.0,
            policy: StopPolicy {
                coverage_ceiling: 0.0,
                ..open_policy()
            },
        };
        let (state, outcome) = placer.run_pass(&spec, OptimizationState::new(buildable.land_area));
        assert_eq!(outcome.stop_reason, StopReason::CoverageCeiling);
        assert_eq!(outcome.points_inside, 0);
        assert_eq!(state.module_count(), 0);
    }

    #[test]
    fn test_cancelled_guard_stops_before_first_cell() {
        let buildable = LandRegion::from_spec(&LandAreaSpec::rectangle(50.0, 50.0), &[], 0.0)
            .unwrap()
            .build(&GeoOps, 0.1)
            .unwrap();
        let validator = PlacementValidator::new(&GeoOps, &buildable, 1, 1.0);
        let token = crate::optimizer::cancel::CancellationToken::new();
        token.cancel();
        let guard = RunGuard::new(token, 0);
        let placer = GridSearchPlacer::new(&GeoOps, &validator, &buildable.polygon, buildable.bbox, &guard);

        let size_list = sizes(&[(2, 2)]);
        let spec = PassSpec {
            kind: PassKind::Primary,
            sizes: &size_list,
            rotations: &[0.0],
            step: 5.0,
            policy: open_policy(),
        };
        let (state, outcome) = placer.run_pass(&spec, OptimizationState::new(buildable.land_area));
        assert_eq!(outcome.stop_reason, StopReason::Cancelled);
        assert_eq!(state.module_count(), 0);
    }
}
