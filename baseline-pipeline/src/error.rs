//! Error types for baseline-pipeline.

use thiserror::Error;

use baseline_core::{StateError, ValidationError};
use baseline_toolchain::{BuildError, FetchError};

/// Everything that can stop one artifact's pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad configuration; raised before any external call.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Upstream template could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The toolchain failed or produced nothing.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    /// State file could not be read or replaced.
    #[error("state store error: {0}")]
    State(#[from] StateError),
}
