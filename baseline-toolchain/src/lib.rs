//! # baseline-toolchain
//!
//! The external collaborators of a baseline build, behind two seams:
//!
//! - [`TemplateSource`]: fetch the upstream template ([`GitTemplateSource`])
//! - [`Toolchain`]: probe and run the compiler ([`DockerToolchain`])
//!
//! Both run their subprocesses through a [`CommandRunner`].

pub mod docker;
pub mod error;
pub mod fetch;
pub mod process;

#[cfg(test)]
mod testing;

pub use docker::{DockerToolchain, Toolchain};
pub use error::{BuildError, FetchError};
pub use fetch::{FetchedTemplate, GitTemplateSource, TemplateSource};
pub use process::{CommandRunner, CommandSpec, ProcessOutcome, SystemRunner};
