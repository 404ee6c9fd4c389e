//! External process execution.
//!
//! Every subprocess (git, docker) goes through a [`CommandRunner`], which
//! returns an explicit [`ProcessOutcome`]: the process either ran to a zero
//! exit with its output captured, or it failed and the captured streams come
//! back with the failure. Spawn errors stay `io::Error`.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// A program invocation with explicit arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a process that did start ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit status zero.
    Captured { stdout: String, stderr: String },
    /// Nonzero exit or killed by a signal (`exit_code == None`).
    Failed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/// Runs a [`CommandSpec`] to completion. Blocks; no timeout.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ProcessOutcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ProcessOutcome> {
        (**self).run(spec)
    }
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ProcessOutcome> {
        tracing::debug!("running: {spec}");
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        let output = command.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if output.status.success() {
            Ok(ProcessOutcome::Captured { stdout, stderr })
        } else {
            Ok(ProcessOutcome::Failed {
                exit_code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}
