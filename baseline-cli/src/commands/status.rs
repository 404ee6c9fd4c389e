//! `baseline status`: recorded builds and artifact presence.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use baseline_core::{state, BuildState};
use baseline_pipeline::{artifact_path, change::format_datetime_age};

use crate::GlobalArgs;

/// Arguments for `baseline status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let settings = global.settings(false, false)?;
        let state = state::load(&settings.state_path).with_context(|| {
            format!(
                "failed to load state file {}",
                settings.state_path.display()
            )
        })?;
        let rows = build_rows(&state, &settings.out_dir);

        if self.json {
            print_json(rows)?;
            return Ok(());
        }
        print_table(rows, &settings.state_path);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ArtifactStatus {
    identity: String,
    revision: String,
    built_at: String,
    built_age: String,
    image: String,
    toolchain: String,
    artifact: String,
    present: bool,
}

#[derive(Serialize)]
struct StatusReportJson {
    artifacts: usize,
    missing: usize,
    records: Vec<ArtifactStatus>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "identity")]
    identity: String,
    #[tabled(rename = "revision")]
    revision: String,
    #[tabled(rename = "built")]
    built: String,
    #[tabled(rename = "toolchain")]
    toolchain: String,
    #[tabled(rename = "artifact")]
    artifact: String,
}

fn build_rows(state: &BuildState, out_dir: &Path) -> Vec<ArtifactStatus> {
    state
        .iter()
        .map(|(identity, record)| {
            let path = artifact_path(out_dir, identity);
            ArtifactStatus {
                identity: identity.to_string(),
                revision: record.template_revision.clone(),
                built_at: record.timestamp.to_rfc3339(),
                built_age: format_datetime_age(record.timestamp),
                image: record.toolchain.image.clone(),
                toolchain: toolchain_summary(&record.toolchain.versions),
                present: path.is_file(),
                artifact: path.display().to_string(),
            }
        })
        .collect()
}

/// One `tool: version line` entry per probed tool.
fn toolchain_summary(versions: &std::collections::BTreeMap<String, String>) -> String {
    versions
        .iter()
        .map(|(tool, line)| format!("{tool}: {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_json(rows: Vec<ArtifactStatus>) -> Result<()> {
    let payload = StatusReportJson {
        artifacts: rows.len(),
        missing: rows.iter().filter(|r| !r.present).count(),
        records: rows,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(rows: Vec<ArtifactStatus>, state_path: &Path) {
    let missing = rows.iter().filter(|r| !r.present).count();
    println!(
        "Baseline v{} | {} | {} artifacts | {} missing",
        env!("CARGO_PKG_VERSION"),
        state_path.display(),
        rows.len(),
        missing,
    );

    if rows.is_empty() {
        println!("No baselines recorded.");
        return;
    }

    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            identity: row.identity,
            revision: row.revision,
            built: format!("{} ago", row.built_age),
            toolchain: row.toolchain,
            artifact: presence_label(row.present),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if missing > 0 {
        println!("Run 'baseline preset --force' to regenerate missing artifacts.");
    }
}

fn presence_label(present: bool) -> String {
    if present {
        "present".green().bold().to_string()
    } else {
        "missing".red().bold().to_string()
    }
}
