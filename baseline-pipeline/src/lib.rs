//! # baseline-pipeline
//!
//! Change-gated build orchestration.
//!
//! Call [`Pipeline::run_single`] to build one artifact from operator input,
//! or [`Pipeline::run_presets`] to walk the full baseline matrix.

pub mod change;
pub mod error;
pub mod pipeline;

pub use change::{should_build, ChangeSignal};
pub use error::PipelineError;
pub use pipeline::{
    artifact_path, ArtifactResult, BatchSummary, BuildOutcome, Pipeline, RunSettings,
};
