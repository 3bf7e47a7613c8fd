//! Input ring validation for parcel boundaries and zones

mod geometric;

pub use geometric::RingValidator;

/// Ring validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum RingError {
    InsufficientVertices { count: usize, minimum: usize },
    NonFiniteCoordinate { index: usize },
    ZeroArea,
    SelfIntersecting { description: String },
}

impl std::fmt::Display for RingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RingError::InsufficientVertices { count, minimum } => {
                write!(f, "{} distinct vertices, at least {} required", count, minimum)
            }
            RingError::NonFiniteCoordinate { index } => {
                write!(f, "vertex {} has a non-finite coordinate", index)
            }
            RingError::ZeroArea => write!(f, "ring encloses no area"),
            RingError::SelfIntersecting { description } => write!(f, "{}", description),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}
