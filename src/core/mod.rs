pub mod config;
pub mod error;
pub mod types;

pub use config::{GapFillConfig, OptimizerConfig, OrientationStrategy, RasterConfig};
pub use error::{OptimizerError, Result};
pub use types::{BoundingBox, Point2, Ring, Vec2};
