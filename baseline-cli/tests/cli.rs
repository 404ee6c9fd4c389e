use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use chrono::Utc;
use predicates::str::contains;
use tempfile::TempDir;

use baseline_core::{
    state, ArtifactIdentity, BuildRecord, BuildState, Configuration, Degree, DocumentKind,
    GradLevel, Language, Period, SubjectArea, ToolchainDescriptor,
};

const ENV_VARS: &[&str] = &[
    "BASELINE_STATE",
    "BASELINE_OUT_DIR",
    "BASELINE_WORK_ROOT",
    "BASELINE_REPO",
    "BASELINE_BRANCH",
    "BASELINE_IMAGE",
    "BASELINE_TOOLCHAIN_OUTPUT",
    "BASELINE_KEEP_WORK",
];

fn baseline_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("baseline"));
    cmd.current_dir(dir).env("NO_COLOR", "1");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn single_args<'a>(degree: &'a str, kind: &'a str) -> Vec<&'a str> {
    vec![
        "single", "-d", degree, "-s", "cs", "-t", kind, "-p", "final",
    ]
}

fn sample_record(config: Configuration) -> BuildRecord {
    BuildRecord {
        toolchain: ToolchainDescriptor {
            kind: "docker".into(),
            image: "zjuthesis/zjuthesis-builder:latest".into(),
            versions: BTreeMap::from([("latexmk".to_string(), "Latexmk 4.79".to_string())]),
        },
        timestamp: Utc::now(),
        template_revision: "a1b2c3d".into(),
        config,
    }
}

#[test]
fn invalid_degree_fails_before_touching_state() {
    let dir = TempDir::new().expect("dir");
    baseline_cmd(dir.path())
        .args(single_args("phd", "thesis"))
        .assert()
        .failure()
        .stderr(contains("degree"))
        .stderr(contains("phd"));

    assert!(!dir.path().join("baseline.json").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0, "no work tree");
}

#[test]
fn graduate_design_is_rejected() {
    let dir = TempDir::new().expect("dir");
    baseline_cmd(dir.path())
        .args(single_args("graduate", "design"))
        .assert()
        .failure()
        .stderr(contains("document_kind"));
    assert!(!dir.path().join("baseline.json").exists());
}

#[test]
fn missing_required_flag_is_usage_error() {
    let dir = TempDir::new().expect("dir");
    baseline_cmd(dir.path())
        .args(["single", "-d", "undergraduate"])
        .assert()
        .failure()
        .stderr(contains("--subject"));
}

#[test]
fn status_on_empty_directory() {
    let dir = TempDir::new().expect("dir");
    baseline_cmd(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("No baselines recorded."));
    assert!(!dir.path().join("baseline.json").exists(), "status is read-only");
}

#[test]
fn status_json_reports_missing_artifact() {
    let dir = TempDir::new().expect("dir");
    let config = Configuration {
        degree: Degree::Undergraduate,
        subject_area: SubjectArea::Cs,
        document_kind: DocumentKind::Thesis,
        period: Period::Final,
        blind: false,
        grad_level: GradLevel::Master,
        language: Language::Chinese,
    };
    let identity = ArtifactIdentity::of(&config);
    let state_path = dir.path().join("records").join("state.json");
    let recorded: BuildState = BTreeMap::from([(identity.clone(), sample_record(config))]);
    state::save(&state_path, &recorded).expect("save");

    let output = baseline_cmd(dir.path())
        .args(["status", "--json", "--state", "records/state.json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["artifacts"], 1);
    assert_eq!(report["missing"], 1);
    assert_eq!(report["records"][0]["identity"], identity.0.as_str());
    assert_eq!(report["records"][0]["revision"], "a1b2c3d");
    assert_eq!(report["records"][0]["present"], false);
}

#[test]
fn status_table_marks_present_artifact() {
    let dir = TempDir::new().expect("dir");
    let config = Configuration {
        degree: Degree::Graduate,
        subject_area: SubjectArea::General,
        document_kind: DocumentKind::Thesis,
        period: Period::Final,
        blind: false,
        grad_level: GradLevel::Doctor,
        language: Language::English,
    };
    let identity = ArtifactIdentity::of(&config);
    let recorded: BuildState = BTreeMap::from([(identity.clone(), sample_record(config))]);
    state::save(&dir.path().join("baseline.json"), &recorded).expect("save");
    std::fs::write(dir.path().join(identity.file_name()), b"%PDF").expect("pdf");

    baseline_cmd(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains(identity.0.as_str()))
        .stdout(contains("present"));
}

#[test]
fn corrupt_state_file_is_reported() {
    let dir = TempDir::new().expect("dir");
    std::fs::write(dir.path().join("baseline.json"), "{ not json").expect("write");
    baseline_cmd(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("baseline.json"));
}

#[test]
fn preset_with_unreachable_repository_fails_without_recording() {
    let dir = TempDir::new().expect("dir");
    let missing_repo = dir.path().join("no-such-repo");
    baseline_cmd(dir.path())
        .args(["preset", "--work-root", "work", "--repo"])
        .arg(&missing_repo)
        .assert()
        .failure()
        .stdout(contains("15 failed"))
        .stderr(contains("15 of 15 artifacts failed"));
    assert!(!dir.path().join("baseline.json").exists());
}
