//! When a placement pass stops

use serde::{Deserialize, Serialize};

use crate::optimizer::cancel::Interruption;

/// Why a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every raster point was visited
    Exhausted,
    /// Coverage reached the pass ceiling
    CoverageCeiling,
    /// The pass added as many modules as it may
    PassCap,
    /// The run-wide module cap was hit
    GlobalCap,
    Cancelled,
    DeadlineExceeded,
}

impl From<Interruption> for StopReason {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::Cancelled => StopReason::Cancelled,
            Interruption::DeadlineExceeded => StopReason::DeadlineExceeded,
        }
    }
}

impl StopReason {
    /// Stopped from outside the search rather than by its own limits
    pub fn is_interruption(&self) -> bool {
        matches!(self, StopReason::Cancelled | StopReason::DeadlineExceeded)
    }
}

/// Limits a pass checks after every commit (and once before starting)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopPolicy {
    /// Stop once coverage (fraction of land area) reaches this
    pub coverage_ceiling: f64,
    /// Most modules this pass may add
    pub max_new_modules: usize,
    /// Most modules the whole run may hold
    pub global_cap: usize,
}

impl StopPolicy {
    pub fn check(&self, coverage: f64, placed_this_pass: usize, total_placed: usize) -> Option<StopReason> {
        if total_placed >= self.global_cap {
            Some(StopReason::GlobalCap)
        } else if placed_this_pass >= self.max_new_modules {
            Some(StopReason::PassCap)
        } else if coverage >= self.coverage_ceiling {
            Some(StopReason::CoverageCeiling)
        } else {
            None
        }
    }
}
