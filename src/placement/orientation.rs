//! Rotation selection
//!
//! Uniform layouts share a single rotation picked by sampling how well the
//! largest module fits at a coarse grid of points. Multi-orientation layouts
//! try every candidate angle at every placement.

use serde::{Deserialize, Serialize};

use super::module::{ModuleCandidateSize, PlacementCandidate};
use super::validator::PlacementValidator;
use crate::core::config::{OptimizerConfig, OrientationStrategy};
use crate::core::types::Vec2;
use crate::land::region::BuildableArea;
use crate::spatial::geometry::GeometryOps;

/// Fit count of one angle for one probe size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleScore {
    pub angle_deg: f64,
    pub fits: usize,
}

/// Active rotations for every pass of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationPlan {
    pub strategy: OrientationStrategy,
    pub rotations: Vec<f64>,
    /// The shared rotation of a uniform layout
    pub uniform_angle: Option<f64>,
    /// Scores of the probe size that decided a uniform layout
    pub scores: Vec<AngleScore>,
}

/// Angles `0, step, 2*step, ...` below 180 degrees
pub fn candidate_angles(step_deg: f64) -> Vec<f64> {
    if !(step_deg.is_finite() && step_deg > 0.0) {
        return vec![0.0];
    }
    let count = (180.0 / step_deg).ceil() as usize;
    (0..count)
        .map(|i| i as f64 * step_deg)
        .filter(|angle| *angle < 180.0)
        .collect()
}

/// Sample points at `(i + 0.5) / n` of the bounding box that fall inside
/// the buildable polygon
fn sample_points<G: GeometryOps>(ops: &G, buildable: &BuildableArea, n: usize) -> Vec<Vec2> {
    let n = n.max(1);
    let bbox = &buildable.bbox;
    let mut points = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let fx = (i as f64 + 0.5) / n as f64;
            let fy = (j as f64 + 0.5) / n as f64;
            let point = Vec2::new(
                bbox.min.x + fx * bbox.width(),
                bbox.min.y + fy * bbox.height(),
            );
            if ops.contains_point(&buildable.polygon, point) {
                points.push(point);
            }
        }
    }
    points
}

/// Pick the rotations to use for the run
pub fn select_orientation<G: GeometryOps>(
    ops: &G,
    buildable: &BuildableArea,
    sizes: &[ModuleCandidateSize],
    config: &OptimizerConfig,
) -> OrientationPlan {
    let angles = candidate_angles(config.angle_step_deg);

    if config.orientation == OrientationStrategy::MultiOrientation {
        tracing::debug!("Multi-orientation: {} active angles", angles.len());
        return OrientationPlan {
            strategy: OrientationStrategy::MultiOrientation,
            rotations: angles,
            uniform_angle: None,
            scores: Vec::new(),
        };
    }

    let samples = sample_points(ops, buildable, config.orientation_samples);
    let validator = PlacementValidator::new(ops, buildable, config.min_sub_blocks, config.corridor_width);

    for size in sizes.iter().take(config.orientation_probe_sizes) {
        let scores: Vec<AngleScore> = angles
            .iter()
            .map(|&angle_deg| AngleScore {
                angle_deg,
                fits: samples
                    .iter()
                    .filter(|point| {
                        validator
                            .validate(&PlacementCandidate::new(*size, **point, angle_deg), &[])
                            .is_valid()
                    })
                    .count(),
            })
            .collect();

        // Strictly greater keeps the first angle on ties
        let best = scores
            .iter()
            .fold(None::<&AngleScore>, |best, score| match best {
                Some(b) if b.fits >= score.fits => Some(b),
                _ => Some(score),
            });

        if let Some(best) = best.filter(|b| b.fits > 0) {
            tracing::info!(
                "Uniform orientation {}° ({} of {} samples fit {}x{})",
                best.angle_deg,
                best.fits,
                samples.len(),
                size.width,
                size.depth
            );
            let angle = best.angle_deg;
            return OrientationPlan {
                strategy: OrientationStrategy::Uniform,
                rotations: vec![angle],
                uniform_angle: Some(angle),
                scores,
            };
        }
    }

    tracing::warn!(
        "No probe size fits any of {} samples; falling back to 0°",
        samples.len()
    );
    OrientationPlan {
        strategy: OrientationStrategy::Uniform,
        rotations: vec![0.0],
        uniform_angle: Some(0.0),
        scores: Vec::new(),
    }
}
