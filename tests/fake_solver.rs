//! Executor behaviour against shell scripts standing in for `ccx`
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use plate_buckling::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.dat");

fn script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ccx");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn executor(solver: &Path, scratch: &Path) -> CalculiXExecutor {
    CalculiXExecutor::new()
        .with_ccx_path(solver.to_string_lossy())
        .with_scratch_root(scratch)
        .with_debug_export(None)
}

fn is_empty(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn test_solver_receives_job_base_and_report_is_returned() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    // Refuse to produce a report unless the deck sits next to the job base
    let solver = script(
        bin.path(),
        &format!("test -f \"$1.inp\" || exit 4\ncp \"{}\" \"$1.dat\"", SAMPLE),
    );

    let content = executor(&solver, scratch.path())
        .run(&Deck::from_text("*NODE, NSET=NALL\n"))
        .unwrap();

    assert_eq!(content, fs::read_to_string(SAMPLE).unwrap());
    assert!(is_empty(scratch.path()));
}

#[test]
fn test_nonzero_exit_is_recoverable() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let solver = script(bin.path(), "echo 'singular matrix' >&2\nexit 3");

    let err = executor(&solver, scratch.path())
        .run(&Deck::from_text("*NODE\n"))
        .unwrap_err();

    assert!(matches!(err, ExecutorError::AnalysisFailed(_)));
    assert!(PlateError::from(err).is_recoverable());
    assert!(is_empty(scratch.path()));
}

#[test]
fn test_missing_report_is_recoverable() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let solver = script(bin.path(), "exit 0");

    let err = executor(&solver, scratch.path())
        .run(&Deck::from_text("*NODE\n"))
        .unwrap_err();

    match err {
        ExecutorError::AnalysisFailed(msg) => assert!(msg.contains(".dat")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(is_empty(scratch.path()));
}

#[test]
fn test_debug_export_keeps_deck_and_report() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    let solver = script(bin.path(), &format!("cp \"{}\" \"$1.dat\"", SAMPLE));

    executor(&solver, scratch.path())
        .with_debug_export(Some(export.path().to_path_buf()))
        .run(&Deck::from_text("*NODE\n"))
        .unwrap();

    let mut extensions: Vec<String> = fs::read_dir(export.path())
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            path.extension().unwrap().to_string_lossy().into_owned()
        })
        .collect();
    extensions.sort();
    assert_eq!(extensions, vec!["dat", "inp"]);
    assert!(is_empty(scratch.path()));
}

#[test]
fn test_full_pipeline_with_fake_solver() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let solver = script(bin.path(), &format!("cp \"{}\" \"$1.dat\"", SAMPLE));

    let design = Design {
        width: 1800,
        height: 1800,
        thickness: 12,
        stiffeners: vec![],
    };
    let load = Load {
        sx: 1.0,
        ..Load::default()
    };
    let report = Analysis::new()
        .with_executor(executor(&solver, scratch.path()))
        .run(&design, &load, &Config::default())
        .unwrap();

    assert_relative_eq!(report.buckling_factor, 269.9174, epsilon = 1e-9);
    assert_relative_eq!(report.max_displacement, 0.1, epsilon = 1e-12);
}
