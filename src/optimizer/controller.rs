//! Multi-pass refinement controller
//!
//! Drives one run from raw parcel input to a labelled result:
//!
//! ```text
//! Idle -> BuildGeometry -> GenerateCandidates -> SelectOrientation
//!      -> Pass1 -> [Pass2] -> [Pass3] -> Label -> Done
//! ```
//!
//! Stages only move forward. Geometry and size failures abort before any
//! placement is attempted; an interrupted pass ends the run with the modules
//! committed so far carried inside the error.

use serde::{Deserialize, Serialize};

use super::cancel::{CancellationToken, RunGuard};
use super::labeler::label_modules;
use super::passes::{PassPlan, PassPlanner};
use super::result::{PassReport, PlacementResult};
use crate::core::config::OptimizerConfig;
use crate::core::error::{OptimizerError, Result};
use crate::land::region::{BuildableArea, LandRegion};
use crate::land::spec::LandAreaSpec;
use crate::land::zones::RestrictedZone;
use crate::placement::candidates::generate_sizes;
use crate::placement::orientation::{select_orientation, OrientationPlan};
use crate::placement::placer::{GridSearchPlacer, PassOutcome};
use crate::placement::state::OptimizationState;
use crate::placement::stopping::StopReason;
use crate::placement::validator::PlacementValidator;
use crate::spatial::geometry::{GeoOps, GeometryOps};

/// Lifecycle position of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    BuildGeometry,
    GenerateCandidates,
    SelectOrientation,
    Pass1,
    Pass2,
    Pass3,
    Label,
    Done,
}

/// Forward-only record of the stages a run entered
#[derive(Debug, Clone)]
struct StageTracker {
    history: Vec<Stage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            history: vec![Stage::Idle],
        }
    }

    fn current(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Idle)
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.current(), "stage {:?} after {:?}", next, self.current());
        if next > self.current() {
            tracing::debug!("Stage {:?} -> {:?}", self.current(), next);
            self.history.push(next);
        }
    }
}

/// Runs the whole placement pipeline for one parcel at a time.
///
/// Holds only the validated config and the geometry backend, so one
/// optimizer can serve many parcels, including from several threads.
#[derive(Debug, Clone)]
pub struct Optimizer<G: GeometryOps = GeoOps> {
    config: OptimizerConfig,
    ops: G,
}

impl Optimizer<GeoOps> {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        Self::with_ops(config, GeoOps)
    }
}

impl<G: GeometryOps> Optimizer<G> {
    pub fn with_ops(config: OptimizerConfig, ops: G) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
            ops,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn run(&self, land: &LandAreaSpec, zones: &[RestrictedZone]) -> Result<PlacementResult> {
        self.run_with_cancel(land, zones, CancellationToken::new())
    }

    /// Run with a caller-held cancellation token.
    ///
    /// Cancellation and `time_limit_ms` are checked between raster cells; an
    /// interrupted run returns `Cancelled` or `Timeout` holding the partial
    /// result.
    pub fn run_with_cancel(
        &self,
        land: &LandAreaSpec,
        zones: &[RestrictedZone],
        token: CancellationToken,
    ) -> Result<PlacementResult> {
        let guard = RunGuard::new(token, self.config.time_limit_ms);
        let mut stages = StageTracker::new();

        stages.advance(Stage::BuildGeometry);
        let region = LandRegion::from_spec(land, zones, self.config.safety_buffer)?;
        let buildable = region.build(&self.ops, self.config.min_buildable_ratio)?;
        tracing::info!(
            "Buildable area {:.1} of boundary {:.1} ({} prohibited zones)",
            buildable.area,
            buildable.boundary_area,
            buildable.prohibited.len()
        );

        stages.advance(Stage::GenerateCandidates);
        let sizes = generate_sizes(&self.config)?;

        stages.advance(Stage::SelectOrientation);
        let orientation = select_orientation(&self.ops, &buildable, &sizes, &self.config);

        let validator = PlacementValidator::new(
            &self.ops,
            &buildable,
            self.config.min_sub_blocks,
            self.config.corridor_width,
        );
        let placer = GridSearchPlacer::new(
            &self.ops,
            &validator,
            &buildable.polygon,
            buildable.bbox,
            &guard,
        );
        let planner = PassPlanner::new(&self.config, &sizes);
        let primary = planner.primary();
        let medium = planner.medium(&primary);
        let small = planner.small();

        let mut state = OptimizationState::new(buildable.land_area);
        let mut passes = Vec::new();
        let mut warnings = Vec::new();
        let mut interruption = None;

        for (stage, plan) in [
            (Stage::Pass1, &primary),
            (Stage::Pass2, &medium),
            (Stage::Pass3, &small),
        ] {
            if !planner.triggers(plan.kind, state.coverage()) {
                tracing::debug!(
                    "Skipping pass {} at {:.1}% coverage",
                    plan.kind.number(),
                    state.coverage() * 100.0
                );
                continue;
            }
            stages.advance(stage);

            if plan.is_empty() {
                let message = format!("Pass {} skipped: no candidate sizes in its band", plan.kind.number());
                tracing::warn!("{}", message);
                warnings.push(message);
                continue;
            }

            let (next, outcome) = placer.run_pass(&plan.spec(&orientation.rotations), state);
            state = next;
            tracing::info!(
                "Pass {} placed {} modules (step {:.1}), coverage {:.1}%, stopped: {:?}",
                plan.kind.number(),
                outcome.placed,
                outcome.raster_step,
                state.coverage() * 100.0,
                outcome.stop_reason
            );
            if outcome.placed == 0 && !outcome.stop_reason.is_interruption() {
                let message = format!("Pass {} placed no modules", plan.kind.number());
                tracing::warn!("{}", message);
                warnings.push(message);
            }

            let stop_reason = outcome.stop_reason;
            passes.push(pass_report(plan, outcome, &state));
            if stop_reason.is_interruption() {
                interruption = Some(stop_reason);
                break;
            }
        }

        if interruption.is_none() {
            stages.advance(Stage::Label);
        }
        if state.module_count() == 0 {
            let message = "No module fits the buildable area".to_string();
            tracing::warn!("{}", message);
            warnings.push(message);
        }

        let elapsed_ms = guard.elapsed().as_millis() as u64;
        let partial = interruption.is_some();
        let mut result = build_result(state, &buildable, &orientation, passes, warnings, elapsed_ms);
        if !partial {
            stages.advance(Stage::Done);
        }
        result.stages = stages.history;

        match interruption {
            Some(StopReason::DeadlineExceeded) => Err(OptimizerError::Timeout {
                elapsed_ms,
                partial: Box::new(result),
            }),
            Some(_) => Err(OptimizerError::Cancelled {
                partial: Box::new(result),
            }),
            None => Ok(result),
        }
    }
}

fn pass_report(plan: &PassPlan, outcome: PassOutcome, state: &OptimizationState) -> PassReport {
    PassReport {
        pass: outcome.kind,
        number: outcome.kind.number(),
        size_count: plan.sizes.len(),
        raster_step: outcome.raster_step,
        raster_points: outcome.raster_points,
        points_inside: outcome.points_inside,
        placed: outcome.placed,
        coverage_percent: state.coverage() * 100.0,
        stop_reason: outcome.stop_reason,
        tally: outcome.tally,
    }
}

fn build_result(
    state: OptimizationState,
    buildable: &BuildableArea,
    orientation: &OrientationPlan,
    passes: Vec<PassReport>,
    warnings: Vec<String>,
    elapsed_ms: u64,
) -> PlacementResult {
    let coverage_percent = state.coverage() * 100.0;
    let total_module_area = state.covered_area();
    let modules = label_modules(state.modules());

    PlacementResult {
        module_count: modules.len(),
        modules,
        coverage_percent,
        total_module_area,
        land_area: buildable.land_area,
        buildable_area: buildable.area,
        strategy: orientation.strategy,
        uniform_rotation: orientation.uniform_angle,
        passes,
        stages: Vec::new(),
        warnings,
        elapsed_ms,
    }
}
