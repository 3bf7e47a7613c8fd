use thiserror::Error;

use crate::optimizer::result::PlacementResult;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error(
        "Insufficient buildable area: {buildable_area:.1} of {boundary_area:.1} \
         (at least {required_area:.1} required)"
    )]
    InsufficientBuildableArea {
        buildable_area: f64,
        boundary_area: f64,
        required_area: f64,
    },

    #[error("No feasible module size for base unit {unit_width}x{unit_depth} within area {max_area}")]
    NoFeasibleSize {
        unit_width: f64,
        unit_depth: f64,
        max_area: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Run timed out after {elapsed_ms} ms with {} modules placed", .partial.module_count)]
    Timeout {
        elapsed_ms: u64,
        partial: Box<PlacementResult>,
    },

    #[error("Run cancelled with {} modules placed", .partial.module_count)]
    Cancelled { partial: Box<PlacementResult> },

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

impl OptimizerError {
    /// Modules committed before an interrupted run stopped
    pub fn partial_result(&self) -> Option<&PlacementResult> {
        match self {
            OptimizerError::Timeout { partial, .. } | OptimizerError::Cancelled { partial } => {
                Some(partial)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
