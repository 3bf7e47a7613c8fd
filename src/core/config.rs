//! Optimizer configuration with documented constants
//!
//! All magic numbers of the placement search are collected here with an
//! explanation of what they control. A config is built once (defaults, TOML
//! file, CLI overrides), passed through [`OptimizerConfig::validated`], and
//! never mutated during a run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{OptimizerError, Result};

/// How rotation angles are chosen for placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrientationStrategy {
    /// One rotation shared by every module, picked by sampling fit
    #[default]
    Uniform,
    /// Every candidate angle tried independently at each placement
    #[serde(alias = "multi_orientation")]
    MultiOrientation,
}

/// Top-level configuration for one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    // === STRUCTURAL GRID ===
    /// Sub-block width (distance units). Module widths are exact multiples.
    pub base_unit_width: f64,

    /// Sub-block depth (distance units). Module depths are exact multiples.
    pub base_unit_depth: f64,

    /// Largest permitted module footprint (area units)
    pub max_module_area: f64,

    /// Longest permitted module side (distance units)
    pub max_module_dimension: f64,

    /// Modules with fewer sub-blocks than this are never placed
    pub min_sub_blocks: u32,

    // === CLEARANCES ===
    /// Outward growth of every module footprint.
    ///
    /// Two footprints may touch but never overlap, so the clear distance
    /// between neighbouring modules is at least twice this value.
    pub corridor_width: f64,

    /// Inward offset applied to the parcel before placement
    pub safety_buffer: f64,

    /// Buildable area below this fraction of the boundary area is rejected
    pub min_buildable_ratio: f64,

    // === ORIENTATION ===
    pub orientation: OrientationStrategy,

    /// Spacing of candidate angles across [0, 180) degrees
    pub angle_step_deg: f64,

    /// Side of the N x N sample grid used by uniform orientation selection
    pub orientation_samples: usize,

    /// How many of the largest sizes uniform selection may fall back through
    /// when the very largest fits nowhere
    pub orientation_probe_sizes: usize,

    // === STOPPING ===
    /// Coverage fraction at which the primary pass stops
    pub target_coverage: f64,

    /// Run the gap-fill passes after the primary pass
    pub enable_gap_fill: bool,

    /// Global cap on placed modules across all passes
    pub max_modules: usize,

    /// Wall-clock budget for the run in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,

    pub gap_fill: GapFillConfig,

    pub raster: RasterConfig,
}

/// Size bands, triggers and caps of the three placement passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapFillConfig {
    /// Primary pass keeps sizes with area >= this fraction of max module area
    pub primary_area_ratio: f64,

    /// Medium pass runs while coverage is below this fraction, and stops
    /// once it is reached
    pub medium_trigger: f64,

    /// Medium pass keeps sizes with area >= this fraction of the primary floor
    pub medium_floor_ratio: f64,

    /// Most modules the medium pass may add
    pub medium_max_modules: usize,

    /// Small pass runs while coverage is below this fraction
    pub small_trigger: f64,

    /// Small pass size band (area units, inclusive)
    pub small_min_area: f64,
    pub small_max_area: f64,

    /// Most modules the small pass may add
    pub small_max_modules: usize,

    /// Small pass stops once coverage reaches this fraction
    pub small_stop_coverage: f64,
}

/// Raster resolution per pass: `step = clamp(factor * avg_dimension, min, max)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub primary_factor: f64,
    pub primary_max_step: f64,
    pub medium_factor: f64,
    pub medium_max_step: f64,
    pub small_factor: f64,
    pub small_max_step: f64,
    /// Floor for every pass's step
    pub min_step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            // 8 x 4 structural grid, one hectare-scale module at most
            base_unit_width: 8.0,
            base_unit_depth: 4.0,
            max_module_area: 10_000.0,
            max_module_dimension: 200.0,
            min_sub_blocks: 10,

            corridor_width: 2.0,
            safety_buffer: 1.0,
            min_buildable_ratio: 0.10,

            orientation: OrientationStrategy::Uniform,
            angle_step_deg: 10.0,
            orientation_samples: 5,
            orientation_probe_sizes: 8,

            target_coverage: 0.65,
            enable_gap_fill: true,
            max_modules: 200,
            time_limit_ms: 0,

            gap_fill: GapFillConfig::default(),
            raster: RasterConfig::default(),
        }
    }
}

impl Default for GapFillConfig {
    fn default() -> Self {
        Self {
            primary_area_ratio: 0.75,
            medium_trigger: 0.85,
            medium_floor_ratio: 0.40,
            medium_max_modules: 20,
            small_trigger: 0.70,
            small_min_area: 500.0,
            small_max_area: 2_500.0,
            small_max_modules: 30,
            small_stop_coverage: 0.75,
        }
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            primary_factor: 0.20,
            primary_max_step: 10.0,
            medium_factor: 0.30,
            medium_max_step: 20.0,
            small_factor: 0.30,
            small_max_step: 15.0,
            min_step: 1.0,
        }
    }
}

impl OptimizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Area of a single sub-block
    pub fn sub_block_area(&self) -> f64 {
        self.base_unit_width * self.base_unit_depth
    }

    /// Normalize soft values and reject inconsistent combinations.
    ///
    /// Coverage-style fractions given as percentages (1 < v <= 100) are
    /// scaled to fractions; zero counts that would disable a stage entirely
    /// are raised to one.
    pub fn validated(mut self) -> Result<Self> {
        self.target_coverage = normalize_fraction(self.target_coverage);
        self.min_buildable_ratio = normalize_fraction(self.min_buildable_ratio);
        self.gap_fill.primary_area_ratio = normalize_fraction(self.gap_fill.primary_area_ratio);
        self.gap_fill.medium_trigger = normalize_fraction(self.gap_fill.medium_trigger);
        self.gap_fill.medium_floor_ratio = normalize_fraction(self.gap_fill.medium_floor_ratio);
        self.gap_fill.small_trigger = normalize_fraction(self.gap_fill.small_trigger);
        self.gap_fill.small_stop_coverage = normalize_fraction(self.gap_fill.small_stop_coverage);
        self.min_sub_blocks = self.min_sub_blocks.max(1);
        self.orientation_samples = self.orientation_samples.max(1);
        self.orientation_probe_sizes = self.orientation_probe_sizes.max(1);

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("base_unit_width", self.base_unit_width),
            ("base_unit_depth", self.base_unit_depth),
            ("max_module_area", self.max_module_area),
            ("max_module_dimension", self.max_module_dimension),
            ("angle_step_deg", self.angle_step_deg),
            ("raster.min_step", self.raster.min_step),
            ("raster.primary_factor", self.raster.primary_factor),
            ("raster.medium_factor", self.raster.medium_factor),
            ("raster.small_factor", self.raster.small_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        for (name, value) in [
            ("corridor_width", self.corridor_width),
            ("safety_buffer", self.safety_buffer),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{} must be >= 0, got {}", name, value)));
            }
        }

        if self.angle_step_deg > 180.0 {
            return Err(invalid(format!(
                "angle_step_deg ({}) must be <= 180",
                self.angle_step_deg
            )));
        }

        let fractions = [
            ("target_coverage", self.target_coverage),
            ("min_buildable_ratio", self.min_buildable_ratio),
            ("gap_fill.primary_area_ratio", self.gap_fill.primary_area_ratio),
            ("gap_fill.medium_trigger", self.gap_fill.medium_trigger),
            ("gap_fill.medium_floor_ratio", self.gap_fill.medium_floor_ratio),
            ("gap_fill.small_trigger", self.gap_fill.small_trigger),
            ("gap_fill.small_stop_coverage", self.gap_fill.small_stop_coverage),
        ];
        for (name, value) in fractions {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.target_coverage <= 0.0 {
            return Err(invalid("target_coverage must be above zero".into()));
        }

        if self.max_modules == 0 {
            return Err(invalid("max_modules must be at least 1".into()));
        }

        if self.gap_fill.small_min_area > self.gap_fill.small_max_area {
            return Err(invalid(format!(
                "gap_fill.small_min_area ({}) exceeds gap_fill.small_max_area ({})",
                self.gap_fill.small_min_area, self.gap_fill.small_max_area
            )));
        }

        for (name, max_step) in [
            ("raster.primary_max_step", self.raster.primary_max_step),
            ("raster.medium_max_step", self.raster.medium_max_step),
            ("raster.small_max_step", self.raster.small_max_step),
        ] {
            if !(max_step.is_finite() && max_step >= self.raster.min_step) {
                return Err(invalid(format!(
                    "{} ({}) must be >= raster.min_step ({})",
                    name, max_step, self.raster.min_step
                )));
            }
        }

        Ok(())
    }
}

fn normalize_fraction(value: f64) -> f64 {
    if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    }
}

fn invalid(message: String) -> OptimizerError {
    OptimizerError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sub_block_area(), 32.0);
    }

    #[test]
    fn test_percentages_normalized() {
        let config = OptimizerConfig {
            target_coverage: 65.0,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert!((config.target_coverage - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_zero_counts_raised() {
        let config = OptimizerConfig {
            min_sub_blocks: 0,
            orientation_samples: 0,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(config.min_sub_blocks, 1);
        assert_eq!(config.orientation_samples, 1);
    }

    #[test]
    fn test_inverted_small_band_rejected() {
        let mut config = OptimizerConfig::default();
        config.gap_fill.small_min_area = 3_000.0;
        assert!(matches!(
            config.validated(),
            Err(OptimizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_negative_unit_rejected() {
        let config = OptimizerConfig {
            base_unit_width: -8.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            corridor_width = 3.0
            orientation = "multiOrientation"

            [gap_fill]
            small_max_modules = 5
        "#;
        let config = OptimizerConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.corridor_width, 3.0);
        assert_eq!(config.orientation, OrientationStrategy::MultiOrientation);
        assert_eq!(config.gap_fill.small_max_modules, 5);
        assert_eq!(config.gap_fill.medium_max_modules, 20);
        assert_eq!(config.base_unit_width, 8.0);
    }
}
