//! Candidate module size enumeration
//!
//! Sizes are ordered largest first: fewer, larger structures are cheaper to
//! build and keep the layout simple, so the search always tries them before
//! smaller ones.

use std::cmp::Ordering;

use super::module::ModuleCandidateSize;
use crate::core::config::OptimizerConfig;
use crate::core::error::{OptimizerError, Result};

/// Slack for floating-point area comparisons against configured limits
const AREA_EPSILON: f64 = 1e-9;

/// Enumerate every legal size for the configuration, sorted largest first.
///
/// Depends on configuration only; whether a size fits a parcel is decided
/// later by the validator.
pub fn generate_sizes(config: &OptimizerConfig) -> Result<Vec<ModuleCandidateSize>> {
    let max_width_units = (config.max_module_dimension / config.base_unit_width + AREA_EPSILON)
        .floor() as u32;
    let max_depth_units = (config.max_module_dimension / config.base_unit_depth + AREA_EPSILON)
        .floor() as u32;

    let mut sizes = Vec::new();
    for width_units in 1..=max_width_units {
        for depth_units in 1..=max_depth_units {
            let size = ModuleCandidateSize::new(
                width_units,
                depth_units,
                config.base_unit_width,
                config.base_unit_depth,
            );
            if size.area() <= config.max_module_area + AREA_EPSILON {
                sizes.push(size);
            }
        }
    }

    if sizes.is_empty() {
        return Err(OptimizerError::NoFeasibleSize {
            unit_width: config.base_unit_width,
            unit_depth: config.base_unit_depth,
            max_area: config.max_module_area,
        });
    }

    sizes.sort_by(compare_sizes);
    tracing::debug!(
        "Generated {} candidate sizes, largest {}x{}",
        sizes.len(),
        sizes[0].width,
        sizes[0].depth
    );
    Ok(sizes)
}

/// Area descending, then squarer first, then wider first
fn compare_sizes(a: &ModuleCandidateSize, b: &ModuleCandidateSize) -> Ordering {
    b.area()
        .total_cmp(&a.area())
        .then_with(|| (a.width - a.depth).abs().total_cmp(&(b.width - b.depth).abs()))
        .then_with(|| b.width.total_cmp(&a.width))
}

/// Sizes whose area lies in `[min_area, max_area]`, order preserved
pub fn area_band(
    sizes: &[ModuleCandidateSize],
    min_area: f64,
    max_area: f64,
) -> Vec<ModuleCandidateSize> {
    sizes
        .iter()
        .filter(|s| s.area() + AREA_EPSILON >= min_area && s.area() <= max_area + AREA_EPSILON)
        .copied()
        .collect()
}

/// Mean of each size's average side length; zero for an empty slice
pub fn average_dimension(sizes: &[ModuleCandidateSize]) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.iter().map(|s| (s.width + s.depth) / 2.0).sum::<f64>() / sizes.len() as f64
}
