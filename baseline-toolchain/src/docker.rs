//! Containerized compilation toolchain.
//!
//! | Operation | Command                                                              |
//! |-----------|----------------------------------------------------------------------|
//! | compile   | `docker run --rm --volume <tree>:<mount> --workdir <mount> <image> <7 params>` |
//! | describe  | `docker run --rm <image> latexmk --version`, same for `xelatex`      |
//!
//! The toolchain deposits its artifact at `<tree>/<output_path>`; it is then
//! moved to `<dest_dir>/<identity>.pdf`, replacing any previous file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use baseline_core::{ArtifactIdentity, Configuration, ToolchainDescriptor};

use crate::error::{io_err, status_label, BuildError};
use crate::process::{CommandRunner, CommandSpec, ProcessOutcome};

pub const DEFAULT_IMAGE: &str = "zjuthesis/zjuthesis-builder:latest";
/// Where the template tree is bind-mounted inside the container.
pub const DEFAULT_MOUNT_POINT: &str = "/zjuthesis";
/// Artifact location relative to the template tree.
pub const DEFAULT_OUTPUT_PATH: &str = "out/zjuthesis.pdf";
/// Sub-tools whose versions go into the descriptor.
pub const PROBED_TOOLS: &[&str] = &["latexmk", "xelatex"];

/// The opaque compile step.
pub trait Toolchain {
    /// Probe the environment identity. Informational only.
    fn describe(&self) -> Result<ToolchainDescriptor, BuildError>;

    /// Compile `template` for `config` and move the artifact into `dest_dir`.
    ///
    /// Returns the final artifact path.
    fn compile(
        &self,
        template: &Path,
        config: &Configuration,
        identity: &ArtifactIdentity,
        dest_dir: &Path,
    ) -> Result<PathBuf, BuildError>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn describe(&self) -> Result<ToolchainDescriptor, BuildError> {
        (**self).describe()
    }

    fn compile(
        &self,
        template: &Path,
        config: &Configuration,
        identity: &ArtifactIdentity,
        dest_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        (**self).compile(template, config, identity, dest_dir)
    }
}

/// [`Toolchain`] running a docker image. Holds no state beyond its settings.
#[derive(Debug, Clone)]
pub struct DockerToolchain<R> {
    image: String,
    mount_point: String,
    output_path: PathBuf,
    runner: R,
}

impl<R: CommandRunner> DockerToolchain<R> {
    pub fn new(image: impl Into<String>, runner: R) -> Self {
        Self {
            image: image.into(),
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            runner,
        }
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn compile_command(&self, template: &Path, config: &Configuration) -> CommandSpec {
        CommandSpec::new("docker")
            .args(["run", "--rm", "--volume"])
            .arg(format!("{}:{}", template.display(), self.mount_point))
            .arg("--workdir")
            .arg(self.mount_point.as_str())
            .arg(self.image.as_str())
            .args(config.build_parameters())
    }

    fn probe_command(&self, tool: &str) -> CommandSpec {
        CommandSpec::new("docker")
            .args(["run", "--rm"])
            .arg(self.image.as_str())
            .args([tool, "--version"])
    }

    fn probe(&self, tool: &str) -> Result<String, BuildError> {
        let spec = self.probe_command(tool);
        let outcome = self.runner.run(&spec).map_err(|source| BuildError::Spawn {
            command: spec.to_string(),
            source,
        })?;
        match outcome {
            ProcessOutcome::Captured { stdout, .. } => Ok(first_line(&stdout)),
            ProcessOutcome::Failed {
                exit_code, stderr, ..
            } => Err(BuildError::Probe {
                tool: tool.to_string(),
                status: status_label(exit_code),
                stderr: stderr.trim().to_string(),
            }),
        }
    }
}

impl<R: CommandRunner> Toolchain for DockerToolchain<R> {
    fn describe(&self) -> Result<ToolchainDescriptor, BuildError> {
        let mut versions = BTreeMap::new();
        for tool in PROBED_TOOLS {
            versions.insert(tool.to_string(), self.probe(tool)?);
        }
        Ok(ToolchainDescriptor {
            kind: "docker".to_string(),
            image: self.image.clone(),
            versions,
        })
    }

    fn compile(
        &self,
        template: &Path,
        config: &Configuration,
        identity: &ArtifactIdentity,
        dest_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        let spec = self.compile_command(template, config);
        tracing::info!("compiling {identity}");
        let outcome = self.runner.run(&spec).map_err(|source| BuildError::Spawn {
            command: spec.to_string(),
            source,
        })?;
        if let ProcessOutcome::Failed {
            exit_code,
            stdout,
            stderr,
        } = outcome
        {
            return Err(BuildError::Toolchain {
                identity: identity.to_string(),
                status: status_label(exit_code),
                stdout,
                stderr,
            });
        }

        let produced = template.join(&self.output_path);
        if !produced.is_file() {
            return Err(BuildError::MissingArtifact { path: produced });
        }
        install_artifact(&produced, &dest_dir.join(identity.file_name()))
    }
}

/// Move `produced` to `dest`, replacing it. Falls back to copy + remove when
/// the rename is refused, e.g. across filesystems.
///
/// Once `dest` holds the new artifact the install has succeeded; a source
/// file that cannot be removed is only logged.
pub fn install_artifact(produced: &Path, dest: &Path) -> Result<PathBuf, BuildError> {
    if let Some(dir) = dest.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    if std::fs::rename(produced, dest).is_err() {
        std::fs::copy(produced, dest).map_err(|e| io_err(dest, e))?;
        if let Err(err) = std::fs::remove_file(produced) {
            tracing::warn!("left {} behind after copying: {err}", produced.display());
        }
    }
    tracing::info!("wrote: {}", dest.display());
    Ok(dest.to_path_buf())
}

fn first_line(stdout: &str) -> String {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
