//! Batch and async entry points
//!
//! A single run is sequential and deterministic. Independent parcels are
//! spread across the rayon pool; async hosts hand runs to tokio's blocking
//! pool so their executors stay responsive.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::cancel::CancellationToken;
use super::controller::Optimizer;
use super::result::PlacementResult;
use crate::core::config::OptimizerConfig;
use crate::core::error::{OptimizerError, Result};
use crate::land::spec::{LandAreaSpec, ParcelFile};
use crate::land::zones::RestrictedZone;

/// One parcel to optimize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub land: LandAreaSpec,
    #[serde(default)]
    pub restricted_zones: Vec<RestrictedZone>,
}

impl OptimizationRequest {
    pub fn new(land: LandAreaSpec, restricted_zones: Vec<RestrictedZone>) -> Self {
        Self {
            name: None,
            land,
            restricted_zones,
        }
    }
}

impl From<ParcelFile> for OptimizationRequest {
    fn from(file: ParcelFile) -> Self {
        Self {
            name: file.name,
            land: file.land,
            restricted_zones: file.restricted_zones,
        }
    }
}

pub fn optimize(request: &OptimizationRequest, config: &OptimizerConfig) -> Result<PlacementResult> {
    Optimizer::new(config.clone())?.run(&request.land, &request.restricted_zones)
}

/// Optimize independent parcels in parallel; results keep request order.
///
/// The config is validated once up front, so an invalid config fails the
/// whole batch.
pub fn optimize_batch(
    requests: &[OptimizationRequest],
    config: &OptimizerConfig,
) -> Result<Vec<Result<PlacementResult>>> {
    let optimizer = Optimizer::new(config.clone())?;
    tracing::info!("Optimizing {} parcels", requests.len());
    Ok(requests
        .par_iter()
        .map(|request| optimizer.run(&request.land, &request.restricted_zones))
        .collect())
}

/// Run on tokio's blocking pool, stoppable through `token`
pub async fn optimize_async(
    request: OptimizationRequest,
    config: OptimizerConfig,
    token: CancellationToken,
) -> Result<PlacementResult> {
    let optimizer = Optimizer::new(config)?;
    tokio::task::spawn_blocking(move || {
        optimizer.run_with_cancel(&request.land, &request.restricted_zones, token)
    })
    .await
    .map_err(|e| OptimizerError::Worker(e.to_string()))?
}

/// Run with a wall-clock budget.
///
/// When the budget elapses the run is cancelled and the modules placed so
/// far come back inside `OptimizerError::Timeout`.
pub async fn optimize_with_timeout(
    request: OptimizationRequest,
    config: OptimizerConfig,
    budget: Duration,
) -> Result<PlacementResult> {
    let optimizer = Optimizer::new(config)?;
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let started = Instant::now();

    let mut handle = tokio::task::spawn_blocking(move || {
        optimizer.run_with_cancel(&request.land, &request.restricted_zones, worker_token)
    });

    match tokio::time::timeout(budget, &mut handle).await {
        Ok(joined) => joined.map_err(|e| OptimizerError::Worker(e.to_string()))?,
        Err(_) => {
            token.cancel();
            tracing::warn!("Run exceeded {} ms budget, cancelling", budget.as_millis());
            let outcome = handle
                .await
                .map_err(|e| OptimizerError::Worker(e.to_string()))?;
            match outcome {
                Err(OptimizerError::Cancelled { partial }) => Err(OptimizerError::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    partial,
                }),
                other => other,
            }
        }
    }
}
