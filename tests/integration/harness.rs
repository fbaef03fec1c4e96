//! Integration tests for the smoke harness
//! Runs the suite through each provider and checks the report

use coco_harness::{
    HarnessConfig, ReferenceRoutines, RoutineError, RoutineSource, Runner, SUITE, ScriptRoutines,
    load_routines,
};
use std::fs;
use std::time::Duration;
use tempfile::Builder;

fn run_suite(routines: &mut dyn coco_harness::Routines) -> String {
    let mut runner = Runner::new(Vec::new());
    let reports = runner.run(routines, &SUITE).unwrap();
    assert_eq!(reports.len(), SUITE.len());
    String::from_utf8(runner.into_inner()).unwrap()
}

#[test]
fn test_bundled_script_matches_reference() {
    let mut script = ScriptRoutines::bundled().unwrap();
    let from_script = run_suite(&mut script);
    let from_reference = run_suite(&mut ReferenceRoutines);

    assert_eq!(from_script, from_reference);
    assert!(from_script.starts_with("Starting Testing...\n"));
    assert_eq!(from_script.lines().filter(|line| line.starts_with("TEST Success")).count(), 6);
}

#[test]
fn test_coco_prints_between_header_and_verdict() {
    let output = run_suite(&mut ScriptRoutines::bundled().unwrap());

    assert!(output.contains(
        "Execute coco(4,12) output:\n4\n12\nTEST Success : coco value 4, 12 result 12.\n"
    ));
}

#[test]
fn test_wrong_script_reports_failures() {
    let source = "\
function loopysum n start
    return n
end
function even n start
    return 1
end
function coco a b start
    return a
end
";
    let temp_file = Builder::new().suffix(".coco").tempfile().unwrap();
    fs::write(&temp_file, source).unwrap();

    let config = HarnessConfig {
        startup_delay: Duration::ZERO,
        source: RoutineSource::Script,
        script: Some(temp_file.path().to_path_buf()),
    };
    let mut routines = load_routines(&config).unwrap();
    let output = run_suite(routines.as_mut());

    assert!(output.contains("TEST Failed : loopysum value 5 result 5\n"));
    assert!(output.contains("TEST Success : even value 4 result 1.\n"));
    assert!(output.contains("TEST Failed : even value 3 result 1\n"));
    assert!(output.contains("TEST Failed : coco value 7, 2 result 7\n"));
}

#[test]
fn test_script_missing_a_routine_is_rejected() {
    let result = ScriptRoutines::load("function loopysum n start\nreturn n\nend\n", "partial.coco");

    assert!(matches!(result, Err(RoutineError::Missing { .. })));
}
