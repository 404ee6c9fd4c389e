//! Baseline: regenerate reference PDFs from the upstream thesis template.
//!
//! # Usage
//!
//! ```text
//! baseline single -d <degree> -s <subject> -t <kind> -p <period> [-b] [-l <level>] [-g <language>]
//!                 [--dry-run] [--force]
//! baseline preset [--dry-run] [--force]
//! baseline status [--json]
//! ```
//!
//! Global options (`--state`, `--out-dir`, `--work-root`, `--repo`, `--branch`,
//! `--image`, `--keep-work`, `--verbose`) also read `BASELINE_*` variables.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use baseline_core::state::STATE_FILE_NAME;
use baseline_pipeline::{Pipeline, RunSettings};
use baseline_toolchain::{
    docker::{DEFAULT_IMAGE, DEFAULT_OUTPUT_PATH},
    fetch::DEFAULT_REPOSITORY,
    DockerToolchain, GitTemplateSource, SystemRunner,
};

use commands::{preset::PresetArgs, single::SingleArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "baseline",
    version,
    about = "Regenerate baseline PDFs when the upstream template changes",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build one baseline PDF from explicit configuration flags.
    Single(SingleArgs),

    /// Build every configuration of the preset matrix.
    Preset(PresetArgs),

    /// Show recorded builds and whether their artifacts are on disk.
    Status(StatusArgs),
}

/// Locations and toolchain selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// State file recording the last successful build per artifact.
    #[arg(long, global = true, env = "BASELINE_STATE", default_value = STATE_FILE_NAME)]
    pub state: PathBuf,

    /// Directory receiving `<identity>.pdf` artifacts.
    #[arg(long, global = true, env = "BASELINE_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Directory under which template trees are fetched.
    #[arg(long, global = true, env = "BASELINE_WORK_ROOT", default_value = ".")]
    pub work_root: PathBuf,

    /// Upstream template repository.
    #[arg(long, global = true, env = "BASELINE_REPO", default_value = DEFAULT_REPOSITORY)]
    pub repo: String,

    /// Upstream branch or tag (default: remote HEAD).
    #[arg(long, global = true, env = "BASELINE_BRANCH")]
    pub branch: Option<String>,

    /// Toolchain container image.
    #[arg(long, global = true, env = "BASELINE_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Artifact path the toolchain writes, relative to the template tree.
    #[arg(long, global = true, env = "BASELINE_TOOLCHAIN_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub toolchain_output: PathBuf,

    /// Keep fetched template trees after a build or skip.
    #[arg(long, global = true, env = "BASELINE_KEEP_WORK")]
    pub keep_work: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Resolve every path against the invocation directory, once.
    pub fn settings(&self, dry_run: bool, force: bool) -> Result<RunSettings> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        Ok(RunSettings {
            state_path: absolute(&cwd, &self.state),
            out_dir: absolute(&cwd, &self.out_dir),
            work_root: absolute(&cwd, &self.work_root),
            keep_work: self.keep_work,
            dry_run,
            force,
        })
    }

    /// Pipeline wired to the real git and docker collaborators.
    pub fn pipeline(
        &self,
        settings: RunSettings,
    ) -> Pipeline<GitTemplateSource<SystemRunner>, DockerToolchain<SystemRunner>> {
        let source = GitTemplateSource::new(self.repo.clone(), self.branch.clone(), SystemRunner);
        let toolchain = DockerToolchain::new(self.image.clone(), SystemRunner)
            .with_output_path(self.toolchain_output.clone());
        Pipeline::new(source, toolchain, settings)
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    match cli.command {
        Commands::Single(args) => args.run(&cli.global),
        Commands::Preset(args) => args.run(&cli.global),
        Commands::Status(args) => args.run(&cli.global),
    }
}
