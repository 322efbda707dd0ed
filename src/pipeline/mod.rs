//! Run orchestration.
//!
//! Stages run strictly in order. Each stage catches its own error and turns
//! it into an [`Outcome`]; the [`FailurePolicy`](crate::config::FailurePolicy)
//! decides whether later stages still run.

pub mod outcome;
pub mod runner;

pub use outcome::{Outcome, Resource, RunReport, Stage};
pub use runner::Pipeline;
