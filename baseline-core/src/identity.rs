//! Identity resolution: operator input → validated [`Configuration`] + [`ArtifactIdentity`].
//!
//! Pure and deterministic. Nothing here touches the filesystem, the network
//! or a subprocess, so a request that fails here never reaches the fetch or
//! compile steps.

use crate::error::ValidationError;
use crate::types::{ArtifactIdentity, Configuration};

/// A configuration as supplied by the operator, one string per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRequest {
    pub degree: String,
    pub subject_area: String,
    pub document_kind: String,
    pub period: String,
    pub blind: bool,
    pub grad_level: String,
    pub language: String,
}

/// Result of a successful [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub config: Configuration,
    pub identity: ArtifactIdentity,
}

/// Validate every field of `request` against its domain and derive the
/// artifact identity.
///
/// Fields are checked in declaration order; the first offending field is
/// reported. Combination rules run after every field parsed.
pub fn resolve(request: &ConfigurationRequest) -> Result<Resolved, ValidationError> {
    let config = Configuration {
        degree: request.degree.parse()?,
        subject_area: request.subject_area.parse()?,
        document_kind: request.document_kind.parse()?,
        period: request.period.parse()?,
        blind: request.blind,
        grad_level: request.grad_level.parse()?,
        language: request.language.parse()?,
    }
    .validated()?;
    let identity = ArtifactIdentity::of(&config);
    Ok(Resolved { config, identity })
}
