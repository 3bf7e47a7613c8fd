//! Run orchestration: pass control, labelling, results and run services

pub mod cancel;
pub mod controller;
pub mod labeler;
pub mod passes;
pub mod result;
pub mod runtime;

pub use cancel::{CancellationToken, Interruption, RunGuard};
pub use controller::{Optimizer, Stage};
pub use labeler::{color_for, label_modules, PALETTE};
pub use passes::{PassPlan, PassPlanner};
pub use result::{PassReport, PlacedModule, PlacementResult};
pub use runtime::{
    optimize, optimize_async, optimize_batch, optimize_with_timeout, OptimizationRequest,
};
