//! State store: identity → last successful [`BuildRecord`].
//!
//! # Storage layout
//!
//! ```text
//! <invocation dir>/
//!   baseline.json        (pretty JSON object, keys sorted by identity)
//!   baseline.json.tmp    (only while a save is in flight)
//! ```
//!
//! The file is read once per run and replaced in full after every successful
//! build. Write flow: serialize → `.tmp` sibling → `rename`. The `.tmp` file
//! lives in the same directory as the target so the rename never crosses a
//! filesystem.

use std::path::{Path, PathBuf};

use crate::error::{io_err, StateError};
use crate::types::BuildState;

/// Default state file name, relative to the invocation directory.
pub const STATE_FILE_NAME: &str = "baseline.json";

/// `<path>.tmp`, next to the state file. Pure.
pub fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| STATE_FILE_NAME.to_string());
    path.with_file_name(format!("{name}.tmp"))
}

/// Load the state file at `path`.
///
/// Returns an empty state if the file does not exist yet, and
/// `StateError::Parse` (with the path) if it is not a valid record mapping.
pub fn load(path: &Path) -> Result<BuildState, StateError> {
    if !path.exists() {
        tracing::debug!("no state file at {}; starting empty", path.display());
        return Ok(BuildState::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|source| StateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replace the state file at `path` with `state`.
pub fn save(path: &Path, state: &BuildState) -> Result<(), StateError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let mut json = serde_json::to_string_pretty(state)?;
    json.push('\n');

    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("saved {} record(s) to {}", state.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use tempfile::TempDir;

    use crate::types::{
        ArtifactIdentity, BuildRecord, Configuration, Degree, DocumentKind, GradLevel, Language,
        Period, SubjectArea, ToolchainDescriptor,
    };

    fn record(revision: &str) -> BuildRecord {
        BuildRecord {
            toolchain: ToolchainDescriptor {
                kind: "docker".into(),
                image: "builder:latest".into(),
                versions: BTreeMap::from([("xelatex".to_string(), "XeTeX 3.14".to_string())]),
            },
            timestamp: Utc::now(),
            template_revision: revision.into(),
            config: Configuration {
                degree: Degree::Undergraduate,
                subject_area: SubjectArea::Math,
                document_kind: DocumentKind::Thesis,
                period: Period::Final,
                blind: false,
                grad_level: GradLevel::Master,
                language: Language::Chinese,
            },
        }
    }

    #[test]
    fn empty_state_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let state = load(&dir.path().join(STATE_FILE_NAME)).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        let mut state = BuildState::new();
        let id = ArtifactIdentity::of(&record("abc1234").config);
        state.insert(id.clone(), record("abc1234"));

        save(&path, &state).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded[&id].template_revision, "abc1234");
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        save(&path, &BuildState::new()).unwrap();
        assert!(path.exists());
        assert!(!tmp_path(&path).exists(), ".tmp must be gone after rename");
    }

    #[test]
    fn saved_file_is_pretty_and_keyed_by_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        let mut state = BuildState::new();
        state.insert(ArtifactIdentity::from("zjuthesis-b"), record("2"));
        state.insert(ArtifactIdentity::from("zjuthesis-a"), record("1"));
        save(&path, &state).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"zjuthesis-a\": {"), "got: {text}");
        assert!(text.find("zjuthesis-a") < text.find("zjuthesis-b"));
        assert!(text.contains("\"template_revision\": \"1\""));
    }

    #[test]
    fn corrupt_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        std::fs::write(&path, "[not, a, map").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, StateError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains(STATE_FILE_NAME));
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        save(&path, &BuildState::new()).unwrap();
        assert!(path.exists());
        assert!(tmp_path(&path).ends_with("state.json.tmp"));
    }
}
