//! Serializable output of an optimization run

use serde::{Deserialize, Serialize};

use super::controller::Stage;
use crate::core::config::OrientationStrategy;
use crate::core::types::Point2;
use crate::placement::module::{PassKind, SubBlockGrid};
use crate::placement::stopping::StopReason;
use crate::placement::validator::RejectionTally;

/// A committed module as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedModule {
    /// 1-based, in placement order
    pub label: u32,
    /// `#rrggbb`
    pub color: String,
    pub pass: PassKind,
    pub center: Point2,
    pub rotation_deg: f64,
    pub width: f64,
    pub depth: f64,
    pub area: f64,
    pub corners: [Point2; 4],
    /// Module grown by the corridor width
    pub footprint: [Point2; 4],
    pub sub_blocks: SubBlockGrid,
}

/// Summary of one pass that ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub pass: PassKind,
    pub number: u8,
    pub size_count: usize,
    pub raster_step: f64,
    pub raster_points: usize,
    pub points_inside: usize,
    pub placed: usize,
    /// Coverage after the pass, percent of land area
    pub coverage_percent: f64,
    pub stop_reason: StopReason,
    pub tally: RejectionTally,
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub modules: Vec<PlacedModule>,
    pub coverage_percent: f64,
    pub module_count: usize,
    pub total_module_area: f64,
    pub land_area: f64,
    pub buildable_area: f64,
    pub strategy: OrientationStrategy,
    pub uniform_rotation: Option<f64>,
    pub passes: Vec<PassReport>,
    pub stages: Vec<Stage>,
    pub warnings: Vec<String>,
    pub elapsed_ms: u64,
}

impl PlacementResult {
    /// Human-readable report, one line per module
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} modules, {:.1} of {:.1} area units covered ({:.2}%)\n",
            self.module_count, self.total_module_area, self.land_area, self.coverage_percent
        );
        if let Some(angle) = self.uniform_rotation {
            out.push_str(&format!("Uniform rotation: {}°\n", angle));
        }
        for pass in &self.passes {
            out.push_str(&format!(
                "  pass {} ({:?}): +{} modules, step {:.1}, {:.2}% after, stopped: {:?}\n",
                pass.number, pass.pass, pass.placed, pass.raster_step, pass.coverage_percent, pass.stop_reason
            ));
        }
        for module in &self.modules {
            out.push_str(&format!(
                "  #{:<3} {} {:>5.0} x {:<5.0} at ({:.1}, {:.1}) {:>5.1}° pass {}\n",
                module.label,
                module.color,
                module.width,
                module.depth,
                module.center[0],
                module.center[1],
                module.rotation_deg,
                module.pass.number()
            ));
        }
        for warning in &self.warnings {
            out.push_str(&format!("  warning: {}\n", warning));
        }
        out
    }
}
