//! Change detection: compare a freshly fetched revision with the last
//! recorded one for the same identity.
//!
//! Pure. Runs only once the fetch has produced the new revision.

use chrono::{DateTime, Utc};

use baseline_core::{ArtifactIdentity, BuildState};

/// Outcome of comparing revisions for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSignal {
    /// No record for this identity.
    NeverBuilt,
    /// Recorded revision equals the fetched one.
    Unchanged { revision: String },
    /// Upstream moved since the last build.
    Changed { previous: String, current: String },
}

/// Classify `new_revision` against the record for `identity` in `state`.
pub fn check(identity: &ArtifactIdentity, new_revision: &str, state: &BuildState) -> ChangeSignal {
    match state.get(identity) {
        None => ChangeSignal::NeverBuilt,
        Some(record) if record.template_revision == new_revision => ChangeSignal::Unchanged {
            revision: new_revision.to_string(),
        },
        Some(record) => ChangeSignal::Changed {
            previous: record.template_revision.clone(),
            current: new_revision.to_string(),
        },
    }
}

/// `false` only when a record exists and its revision equals `new_revision`.
pub fn should_build(identity: &ArtifactIdentity, new_revision: &str, state: &BuildState) -> bool {
    !matches!(
        check(identity, new_revision, state),
        ChangeSignal::Unchanged { .. }
    )
}

/// Compact age of a recorded timestamp: `42s`, `5m`, `3h`, `12d`.
pub fn format_datetime_age(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now()
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0) as u64;
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
