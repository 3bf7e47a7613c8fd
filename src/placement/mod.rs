//! Placement search: sizes, orientations, validation and the grid-search placer

pub mod candidates;
pub mod module;
pub mod orientation;
pub mod placer;
pub mod state;
pub mod stopping;
pub mod validator;

pub use candidates::{area_band, average_dimension, generate_sizes};
pub use module::{
    CommittedModule, ModuleCandidateSize, PassKind, PlacementCandidate, SubBlock, SubBlockGrid,
};
pub use orientation::{candidate_angles, select_orientation, AngleScore, OrientationPlan};
pub use placer::{GridSearchPlacer, PassOutcome, PassSpec};
pub use state::OptimizationState;
pub use stopping::{StopPolicy, StopReason};
pub use validator::{PlacementValidator, Rejection, RejectionTally, ValidPlacement, Verdict};
