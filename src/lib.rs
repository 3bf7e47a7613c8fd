//! Polyhouse Optimizer - grid-search packing of rectangular modules into land parcels

pub mod core;
pub mod land;
pub mod optimizer;
pub mod placement;
pub mod spatial;

pub use crate::core::config::OptimizerConfig;
pub use crate::core::error::{OptimizerError, Result};
pub use crate::land::{LandAreaSpec, ParcelFile, RestrictedZone};
pub use crate::optimizer::{CancellationToken, Optimizer, PlacementResult};
