//! Revision fetcher: shallow-clone the upstream template into an isolated
//! work directory and read back its short revision id.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{status_label, FetchError};
use crate::process::{CommandRunner, CommandSpec, ProcessOutcome};

/// Upstream template repository.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/TheNetAdmin/zjuthesis.git";

/// A checkout left on disk for the build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTemplate {
    /// Root of the fetched tree.
    pub path: PathBuf,
    /// Short revision id of the checkout.
    pub revision: String,
}

/// Source of upstream template trees.
pub trait TemplateSource {
    /// Fetch the latest template into a fresh directory under `work_root`,
    /// named after `started_at`.
    fn fetch(&self, work_root: &Path, started_at: DateTime<Utc>)
        -> Result<FetchedTemplate, FetchError>;
}

impl<S: TemplateSource + ?Sized> TemplateSource for &S {
    fn fetch(
        &self,
        work_root: &Path,
        started_at: DateTime<Utc>,
    ) -> Result<FetchedTemplate, FetchError> {
        (**self).fetch(work_root, started_at)
    }
}

/// `zjuthesis-20240131-094512-123456`, unique per build start.
pub fn work_dir_name(started_at: DateTime<Utc>) -> String {
    format!("zjuthesis-{}", started_at.format("%Y%m%d-%H%M%S-%6f"))
}

/// Create `work_root/<work_dir_name>`, refusing to reuse an existing one.
pub fn create_work_dir(work_root: &Path, started_at: DateTime<Utc>) -> Result<PathBuf, FetchError> {
    let dir = work_root.join(work_dir_name(started_at));
    std::fs::create_dir_all(work_root).map_err(|source| FetchError::WorkDir {
        path: work_root.to_path_buf(),
        source,
    })?;
    std::fs::create_dir(&dir).map_err(|source| FetchError::WorkDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// [`TemplateSource`] backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitTemplateSource<R> {
    repository: String,
    branch: Option<String>,
    runner: R,
}

impl<R: CommandRunner> GitTemplateSource<R> {
    pub fn new(repository: impl Into<String>, branch: Option<String>, runner: R) -> Self {
        Self {
            repository: repository.into(),
            branch,
            runner,
        }
    }

    fn clone_command(&self, dir: &Path) -> CommandSpec {
        let mut spec = CommandSpec::new("git").args(["clone", "--depth", "1"]);
        if let Some(branch) = &self.branch {
            spec = spec.args(["--branch", branch.as_str()]);
        }
        spec.arg(self.repository.as_str())
            .arg(dir.to_string_lossy())
    }

    fn revision_command(dir: &Path) -> CommandSpec {
        CommandSpec::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .current_dir(dir)
    }

    fn run_git(&self, spec: &CommandSpec) -> Result<String, FetchError> {
        let outcome = self.runner.run(spec).map_err(|source| FetchError::Spawn {
            command: spec.to_string(),
            source,
        })?;
        match outcome {
            ProcessOutcome::Captured { stdout, .. } => Ok(stdout),
            ProcessOutcome::Failed {
                exit_code, stderr, ..
            } => Err(FetchError::Git {
                command: spec.to_string(),
                status: status_label(exit_code),
                stderr: stderr.trim().to_string(),
            }),
        }
    }
}

impl<R: CommandRunner> TemplateSource for GitTemplateSource<R> {
    fn fetch(
        &self,
        work_root: &Path,
        started_at: DateTime<Utc>,
    ) -> Result<FetchedTemplate, FetchError> {
        let dir = create_work_dir(work_root, started_at)?;
        tracing::info!("fetching {} into {}", self.repository, dir.display());
        self.run_git(&self.clone_command(&dir))?;

        let revision = self.run_git(&Self::revision_command(&dir))?.trim().to_string();
        if revision.is_empty() {
            return Err(FetchError::EmptyRevision { path: dir });
        }
        tracing::info!("upstream template at revision {revision}");
        Ok(FetchedTemplate {
            path: dir,
            revision,
        })
    }
}
