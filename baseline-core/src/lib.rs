//! Baseline core library: domain types, identity resolution, preset matrix,
//! state persistence, errors.
//!
//! - [`types`]: configuration domains, [`ArtifactIdentity`], [`BuildRecord`]
//! - [`identity`]: [`resolve`] operator input into a validated configuration
//! - [`presets`]: the full baseline matrix
//! - [`state`]: load / atomic save of the state file
//! - [`error`]: [`ValidationError`], [`StateError`]

pub mod error;
pub mod identity;
pub mod presets;
pub mod state;
pub mod types;

pub use error::{StateError, ValidationError};
pub use identity::{resolve, ConfigurationRequest, Resolved};
pub use presets::expand_presets;
pub use types::{
    ArtifactIdentity, BuildRecord, BuildState, Configuration, Degree, DocumentKind, GradLevel,
    Language, Period, SubjectArea, ToolchainDescriptor,
};
