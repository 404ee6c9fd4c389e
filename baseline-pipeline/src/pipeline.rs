//! Single-artifact pipeline and preset batch runner.
//!
//! ## Per-artifact flow
//!
//! 1. Resolve and validate the configuration (no I/O before this passes).
//! 2. Fetch the upstream template into a fresh work directory.
//! 3. Compare the fetched revision with the recorded one → skip if equal.
//! 4. Probe the toolchain descriptor (once per run).
//! 5. Compile and move the artifact to `<out_dir>/<identity>.pdf`.
//! 6. Insert the new record and atomically replace the state file.
//!
//! A failure at step 2, 4, 5 or 6 leaves the state file as it was.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use baseline_core::{
    expand_presets, resolve,
    state::{self, STATE_FILE_NAME},
    ArtifactIdentity, BuildRecord, BuildState, Configuration, ConfigurationRequest,
    ToolchainDescriptor,
};
use baseline_toolchain::{BuildError, TemplateSource, Toolchain};

use crate::change::{self, ChangeSignal};
use crate::error::PipelineError;

/// Lines of each captured toolchain stream shown when a build fails.
const FAILURE_TAIL_LINES: usize = 40;

// ---------------------------------------------------------------------------
// Settings and outcomes
// ---------------------------------------------------------------------------

/// Paths and switches for one run. All paths are absolute by the time a
/// [`Pipeline`] sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// State file location.
    pub state_path: PathBuf,
    /// Directory receiving `<identity>.pdf` artifacts.
    pub out_dir: PathBuf,
    /// Directory under which per-build template trees are fetched.
    pub work_root: PathBuf,
    /// Keep fetched trees after a build or skip.
    pub keep_work: bool,
    /// Fetch and detect changes only; never compile or write state.
    pub dry_run: bool,
    /// Rebuild even when the revision is unchanged.
    pub force: bool,
}

impl RunSettings {
    /// Default layout: everything directly under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            state_path: root.join(STATE_FILE_NAME),
            out_dir: root.to_path_buf(),
            work_root: root.to_path_buf(),
            keep_work: false,
            dry_run: false,
            force: false,
        }
    }
}

/// Result of one artifact's pipeline when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Compiled, moved into place, and recorded.
    Built {
        identity: ArtifactIdentity,
        revision: String,
        artifact: PathBuf,
        signal: ChangeSignal,
    },
    /// Upstream revision unchanged since the recorded build.
    Skipped {
        identity: ArtifactIdentity,
        revision: String,
    },
    /// `--dry-run`: the artifact *would* have been built.
    WouldBuild {
        identity: ArtifactIdentity,
        revision: String,
        signal: ChangeSignal,
    },
}

/// One entry of a batch run.
#[derive(Debug)]
pub struct ArtifactResult {
    pub identity: ArtifactIdentity,
    pub outcome: Result<BuildOutcome, PipelineError>,
}

/// Every artifact of a batch run, in build order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<ArtifactResult>,
}

impl BatchSummary {
    pub fn built(&self) -> usize {
        self.count(|o| matches!(o, Ok(BuildOutcome::Built { .. })))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Ok(BuildOutcome::Skipped { .. })))
    }

    pub fn would_build(&self) -> usize {
        self.count(|o| matches!(o, Ok(BuildOutcome::WouldBuild { .. })))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| o.is_err())
    }

    fn count(&self, pred: impl Fn(&Result<BuildOutcome, PipelineError>) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// `<out_dir>/<identity>.pdf`, pure.
pub fn artifact_path(out_dir: &Path, identity: &ArtifactIdentity) -> PathBuf {
    out_dir.join(identity.file_name())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Orchestrates fetch → detect → compile → record for one run.
///
/// The state file is passed explicitly through every step; the only value
/// cached across artifacts is the toolchain descriptor.
pub struct Pipeline<S, T> {
    source: S,
    toolchain: T,
    settings: RunSettings,
    descriptor: Option<ToolchainDescriptor>,
}

impl<S: TemplateSource, T: Toolchain> Pipeline<S, T> {
    pub fn new(source: S, toolchain: T, settings: RunSettings) -> Self {
        Self {
            source,
            toolchain,
            settings,
            descriptor: None,
        }
    }

    /// Build one artifact from operator input.
    ///
    /// Validation happens before the state file is even read.
    pub fn run_single(
        &mut self,
        request: &ConfigurationRequest,
    ) -> Result<BuildOutcome, PipelineError> {
        let resolved = resolve(request)?;
        let mut state = state::load(&self.settings.state_path)?;
        self.build_artifact(&resolved.config, &resolved.identity, &mut state)
    }

    /// Build the whole preset matrix.
    pub fn run_presets(&mut self) -> Result<BatchSummary, PipelineError> {
        self.run_batch(&expand_presets())
    }

    /// Build `configs` in order. A failed artifact is reported in the
    /// summary and the batch moves on; only an unreadable state file aborts.
    pub fn run_batch(&mut self, configs: &[Configuration]) -> Result<BatchSummary, PipelineError> {
        let mut state = state::load(&self.settings.state_path)?;
        let mut summary = BatchSummary::default();

        for (index, config) in configs.iter().enumerate() {
            let identity = ArtifactIdentity::of(config);
            tracing::info!("[{}/{}] {identity}", index + 1, configs.len());
            let outcome = config
                .validated()
                .map_err(PipelineError::from)
                .and_then(|config| self.build_artifact(&config, &identity, &mut state));
            if let Err(err) = &outcome {
                tracing::error!("{identity}: {err}");
            }
            summary.results.push(ArtifactResult { identity, outcome });
        }

        tracing::info!(
            "batch done: {} built, {} skipped, {} failed",
            summary.built(),
            summary.skipped(),
            summary.failed()
        );
        Ok(summary)
    }

    fn build_artifact(
        &mut self,
        config: &Configuration,
        identity: &ArtifactIdentity,
        state: &mut BuildState,
    ) -> Result<BuildOutcome, PipelineError> {
        let started_at = Utc::now();
        let fetched = self.source.fetch(&self.settings.work_root, started_at)?;
        let signal = change::check(identity, &fetched.revision, state);

        if let ChangeSignal::Unchanged { revision } = &signal {
            if !self.settings.force {
                tracing::info!("skip {identity}: template unchanged at {revision}");
                self.discard_work_tree(&fetched.path);
                return Ok(BuildOutcome::Skipped {
                    identity: identity.clone(),
                    revision: fetched.revision,
                });
            }
            tracing::info!("forced rebuild of {identity} at {revision}");
        }

        if self.settings.dry_run {
            tracing::info!("[dry-run] would build {identity} at {}", fetched.revision);
            self.discard_work_tree(&fetched.path);
            return Ok(BuildOutcome::WouldBuild {
                identity: identity.clone(),
                revision: fetched.revision,
                signal,
            });
        }

        let record = BuildRecord {
            toolchain: self.descriptor()?,
            timestamp: started_at,
            template_revision: fetched.revision.clone(),
            config: *config,
        };

        let artifact = self
            .toolchain
            .compile(&fetched.path, config, identity, &self.settings.out_dir)
            .map_err(|err| {
                report_build_failure(identity, &err, &fetched.path);
                err
            })?;

        let mut next = state.clone();
        next.insert(identity.clone(), record);
        state::save(&self.settings.state_path, &next)?;
        *state = next;
        tracing::info!("recorded {identity} at {}", fetched.revision);

        self.discard_work_tree(&fetched.path);
        Ok(BuildOutcome::Built {
            identity: identity.clone(),
            revision: fetched.revision,
            artifact,
            signal,
        })
    }

    fn descriptor(&mut self) -> Result<ToolchainDescriptor, PipelineError> {
        if let Some(descriptor) = &self.descriptor {
            return Ok(descriptor.clone());
        }
        let descriptor = self.toolchain.describe()?;
        for (tool, version) in &descriptor.versions {
            tracing::info!("toolchain {tool}: {version}");
        }
        self.descriptor = Some(descriptor.clone());
        Ok(descriptor)
    }

    fn discard_work_tree(&self, path: &Path) {
        if self.settings.keep_work {
            tracing::debug!("keeping work tree {}", path.display());
            return;
        }
        match std::fs::remove_dir_all(path) {
            Ok(()) => tracing::debug!("removed work tree {}", path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::warn!("could not remove work tree {}: {err}", path.display()),
        }
    }
}

fn report_build_failure(identity: &ArtifactIdentity, err: &BuildError, tree: &Path) {
    tracing::error!("{identity}: {err}; work tree kept at {}", tree.display());
    if let BuildError::Toolchain { stdout, stderr, .. } = err {
        for (name, stream) in [("stdout", stdout), ("stderr", stderr)] {
            if stream.trim().is_empty() {
                continue;
            }
            tracing::debug!("{identity} toolchain {name}:\n{stream}");
            tracing::error!("{identity} toolchain {name} (tail):\n{}", tail(stream));
        }
    }
}

fn tail(stream: &str) -> String {
    let lines: Vec<&str> = stream.lines().collect();
    let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    lines[start..].join("\n")
}
