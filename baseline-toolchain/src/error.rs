//! Error types for baseline-toolchain.

use std::path::PathBuf;

use thiserror::Error;

/// Failure retrieving the upstream template. Fatal for the artifact.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The isolated working directory could not be created.
    #[error("cannot create work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `git` could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `git` ran and exited unsuccessfully (unreachable remote, bad ref, ...).
    #[error("`{command}` exited with {status}: {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },

    /// The checkout did not report a revision.
    #[error("no revision reported for checkout at {path}")]
    EmptyRevision { path: PathBuf },
}

/// Failure compiling one artifact. Fatal for that artifact only.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The container runtime could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The toolchain exited unsuccessfully. Streams are kept for the caller.
    #[error("toolchain exited with {status} for {identity}")]
    Toolchain {
        identity: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// A version probe exited unsuccessfully.
    #[error("version probe `{tool}` exited with {status}: {stderr}")]
    Probe {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The toolchain exited zero but left no artifact behind.
    #[error("toolchain produced no artifact at {path}")]
    MissingArtifact { path: PathBuf },

    /// Moving the artifact into the output directory failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}

/// `exit status 2`, or `a signal` when there is no exit code.
pub(crate) fn status_label(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit status {code}"),
        None => "a signal".to_string(),
    }
}
