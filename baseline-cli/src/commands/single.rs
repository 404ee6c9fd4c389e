//! `baseline single`: build one artifact from explicit configuration flags.

use anyhow::{Context, Result};
use clap::Args;

use baseline_core::ConfigurationRequest;

use super::print_outcome;
use crate::GlobalArgs;

/// Arguments for `baseline single`.
///
/// Values are validated by the identity resolver, not by clap, so every
/// rejection names the configuration field.
#[derive(Args, Debug)]
pub struct SingleArgs {
    /// undergraduate | graduate
    #[arg(long, short = 'd')]
    pub degree: String,

    /// general | cs | isee | math | physics | se
    #[arg(long = "subject", short = 's', value_name = "SUBJECT")]
    pub subject_area: String,

    /// thesis | design
    #[arg(long = "kind", short = 't', value_name = "KIND")]
    pub document_kind: String,

    /// proposal | final
    #[arg(long, short = 'p')]
    pub period: String,

    /// Build the blind-review variant.
    #[arg(long, short = 'b')]
    pub blind: bool,

    /// master | doctor (graduate only)
    #[arg(long, short = 'l', default_value = "master")]
    pub grad_level: String,

    /// chinese | english
    #[arg(long, short = 'g', default_value = "chinese")]
    pub language: String,

    /// Fetch and compare revisions without compiling or recording.
    #[arg(long)]
    pub dry_run: bool,

    /// Rebuild even if the upstream revision is unchanged.
    #[arg(long)]
    pub force: bool,
}

impl SingleArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let request = ConfigurationRequest {
            degree: self.degree,
            subject_area: self.subject_area,
            document_kind: self.document_kind,
            period: self.period,
            blind: self.blind,
            grad_level: self.grad_level,
            language: self.language,
        };
        let settings = global.settings(self.dry_run, self.force)?;
        let mut pipeline = global.pipeline(settings);
        let outcome = pipeline
            .run_single(&request)
            .context("baseline build failed")?;
        print_outcome(&outcome);
        Ok(())
    }
}
