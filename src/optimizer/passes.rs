//! Size bands, raster steps and stop limits of the three passes

use crate::core::config::OptimizerConfig;
use crate::placement::candidates::{area_band, average_dimension};
use crate::placement::module::{ModuleCandidateSize, PassKind};
use crate::placement::placer::PassSpec;
use crate::placement::stopping::StopPolicy;

/// Everything one pass needs except the rotations
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan {
    pub kind: PassKind,
    pub sizes: Vec<ModuleCandidateSize>,
    /// Smallest area admitted to the band
    pub size_floor: f64,
    pub step: f64,
    pub policy: StopPolicy,
}

impl PassPlan {
    pub fn spec<'a>(&'a self, rotations: &'a [f64]) -> PassSpec<'a> {
        PassSpec {
            kind: self.kind,
            sizes: &self.sizes,
            rotations,
            step: self.step,
            policy: self.policy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Derives pass plans from the config and the full size list
pub struct PassPlanner<'a> {
    config: &'a OptimizerConfig,
    sizes: &'a [ModuleCandidateSize],
}

impl<'a> PassPlanner<'a> {
    pub fn new(config: &'a OptimizerConfig, sizes: &'a [ModuleCandidateSize]) -> Self {
        Self { config, sizes }
    }

    /// Large modules only, fine raster
    pub fn primary(&self) -> PassPlan {
        let gap_fill = &self.config.gap_fill;
        let largest = self.sizes.first().map_or(0.0, |s| s.area());
        let floor = gap_fill.primary_area_ratio * self.config.max_module_area.min(largest);
        let sizes = area_band(self.sizes, floor, f64::INFINITY);
        let raster = &self.config.raster;
        let step = clamp_step(
            raster.primary_factor * average_dimension(&sizes),
            raster.min_step,
            raster.primary_max_step,
        );

        PassPlan {
            kind: PassKind::Primary,
            sizes,
            size_floor: floor,
            step,
            policy: StopPolicy {
                coverage_ceiling: self.config.target_coverage,
                max_new_modules: self.config.max_modules,
                global_cap: self.config.max_modules,
            },
        }
    }

    /// Medium gap fill, never finer than the primary raster
    pub fn medium(&self, primary: &PassPlan) -> PassPlan {
        let gap_fill = &self.config.gap_fill;
        let floor = gap_fill.medium_floor_ratio * primary.size_floor;
        let sizes = area_band(self.sizes, floor, f64::INFINITY);
        let raster = &self.config.raster;
        let step = clamp_step(
            raster.medium_factor * average_dimension(&sizes),
            primary.step,
            raster.medium_max_step,
        );

        PassPlan {
            kind: PassKind::GapFillMedium,
            sizes,
            size_floor: floor,
            step,
            policy: StopPolicy {
                coverage_ceiling: gap_fill.medium_trigger,
                max_new_modules: gap_fill.medium_max_modules,
                global_cap: self.config.max_modules,
            },
        }
    }

    /// Small gap fill in a fixed area band
    pub fn small(&self) -> PassPlan {
        let gap_fill = &self.config.gap_fill;
        let sizes = area_band(self.sizes, gap_fill.small_min_area, gap_fill.small_max_area);
        let raster = &self.config.raster;
        let step = clamp_step(
            raster.small_factor * average_dimension(&sizes),
            raster.min_step,
            raster.small_max_step,
        );

        PassPlan {
            kind: PassKind::GapFillSmall,
            sizes,
            size_floor: gap_fill.small_min_area,
            step,
            policy: StopPolicy {
                coverage_ceiling: gap_fill.small_stop_coverage,
                max_new_modules: gap_fill.small_max_modules,
                global_cap: self.config.max_modules,
            },
        }
    }

    /// Whether a gap-fill pass should run at the given coverage fraction
    pub fn triggers(&self, kind: PassKind, coverage: f64) -> bool {
        let gap_fill = &self.config.gap_fill;
        match kind {
            PassKind::Primary => true,
            PassKind::GapFillMedium => self.config.enable_gap_fill && coverage < gap_fill.medium_trigger,
            PassKind::GapFillSmall => self.config.enable_gap_fill && coverage < gap_fill.small_trigger,
        }
    }
}

/// `value` limited to `[min, max]`; `min` wins if the bounds cross
fn clamp_step(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
