//! `baseline preset`: build the full preset matrix.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use baseline_pipeline::BatchSummary;

use super::print_outcome;
use crate::GlobalArgs;

/// Arguments for `baseline preset`.
#[derive(Args, Debug)]
pub struct PresetArgs {
    /// Fetch and compare revisions without compiling or recording.
    #[arg(long)]
    pub dry_run: bool,

    /// Rebuild every artifact even if the upstream revision is unchanged.
    #[arg(long)]
    pub force: bool,
}

impl PresetArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let settings = global.settings(self.dry_run, self.force)?;
        let mut pipeline = global.pipeline(settings);
        let summary = pipeline.run_presets().context("preset run aborted")?;
        print_summary(&summary, self.dry_run);

        let failed = summary.failed();
        if failed > 0 {
            bail!("{failed} of {} artifacts failed", summary.results.len());
        }
        Ok(())
    }
}

fn print_summary(summary: &BatchSummary, dry_run: bool) {
    for result in &summary.results {
        match &result.outcome {
            Ok(outcome) => print_outcome(outcome),
            Err(err) => println!("{} {} {err}", "✗".red().bold(), result.identity),
        }
    }

    let prefix = if dry_run { "[dry-run] " } else { "" };
    let done = if dry_run {
        format!("{} would build", summary.would_build())
    } else {
        format!("{} built", summary.built())
    };
    println!(
        "{prefix}preset: {done}, {} unchanged, {} failed",
        summary.skipped(),
        summary.failed()
    );
}
