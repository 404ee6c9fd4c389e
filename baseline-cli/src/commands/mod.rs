pub mod preset;
pub mod single;
pub mod status;

use colored::Colorize;

use baseline_pipeline::{BuildOutcome, ChangeSignal};

/// One line per artifact outcome, shared by `single` and `preset`.
pub(crate) fn print_outcome(outcome: &BuildOutcome) {
    match outcome {
        BuildOutcome::Built {
            identity,
            revision,
            artifact,
            signal,
        } => {
            println!(
                "{} {identity} built at {revision} ({})",
                "✎".green().bold(),
                signal_detail(signal)
            );
            println!("    {}", artifact.display());
        }
        BuildOutcome::Skipped { identity, revision } => {
            println!(
                "{} {identity} unchanged at {revision}",
                "·".bright_black().bold()
            );
        }
        BuildOutcome::WouldBuild {
            identity,
            revision,
            signal,
        } => {
            println!(
                "[dry-run] {} {identity} would build at {revision} ({})",
                "~".yellow().bold(),
                signal_detail(signal)
            );
        }
    }
}

fn signal_detail(signal: &ChangeSignal) -> String {
    match signal {
        ChangeSignal::NeverBuilt => "no prior build".to_string(),
        ChangeSignal::Unchanged { .. } => "forced".to_string(),
        ChangeSignal::Changed { previous, .. } => format!("was {previous}"),
    }
}
