//! Geometry seam, raster scanning and input ring validation

pub mod geometry;
pub mod grid;
pub mod validation;

pub use geometry::{BoundedPolygon, GeoOps, GeometryOps};
pub use grid::RasterScan;
pub use validation::{RingError, RingValidator};
