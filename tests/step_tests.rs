//! Build-step tests: skipping, failing on violations, binary sources

#![cfg(unix)]

use openapi_lint_sdk::step::{BuildStep, StepError, StepOutcome};
use openapi_lint_sdk::{HostInfo, LintConfig, MemoryBinaries, Platform};
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FAILING_LINTER: &str = "#!/bin/sh\necho '1:1 error first'\necho '2:4 warning second'\nexit 1\n";
const CLEAN_LINTER: &str = "#!/bin/sh\necho 'No results found!'\nexit 0\n";

fn write_document(project: &Path, name: &str) {
    let dir = project.join("openapi");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), "openapi: 3.0.0\n").unwrap();
}

fn linux_step(config: LintConfig, project: &Path) -> BuildStep {
    BuildStep::new(config, project).with_host(HostInfo::new("linux", "x86_64"))
}

fn stub(script: &str) -> MemoryBinaries {
    MemoryBinaries::new().with(Platform::LinuxX64.resource_path(), script.as_bytes())
}

#[test]
#[serial]
fn test_clean_run_passes() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");

    let outcome = linux_step(LintConfig::new(), project.path())
        .execute_with(stub(CLEAN_LINTER))
        .unwrap();

    match outcome {
        StepOutcome::Passed(result) => {
            assert_eq!(result.files_validated, 1);
            assert_eq!(result.violation_count, 0);
        }
        other => panic!("expected Passed, got {:?}", other),
    }
    assert!(project.path().join("target/openapi-lint/linter").is_file());
}

#[test]
#[serial]
fn test_violations_fail_the_step_by_default() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");

    let result = linux_step(LintConfig::new(), project.path()).execute_with(stub(FAILING_LINTER));

    match result {
        Err(StepError::ViolationsFound(count)) => assert_eq!(count, 2),
        other => panic!("expected ViolationsFound, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_violations_tolerated_when_not_failing() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");
    let mut config = LintConfig::new();
    config.build.fail_on_violations = false;

    let outcome = linux_step(config, project.path())
        .execute_with(stub(FAILING_LINTER))
        .unwrap();

    match outcome {
        StepOutcome::PassedWithViolations(result) => assert_eq!(result.violation_count, 2),
        other => panic!("expected PassedWithViolations, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_output_file_from_config() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");
    let mut config = LintConfig::new();
    config.build.fail_on_violations = false;
    config.output.file = Some("reports/openapi.txt".to_string());

    linux_step(config, project.path())
        .execute_with(stub(FAILING_LINTER))
        .unwrap();

    let written = fs::read_to_string(project.path().join("reports/openapi.txt")).unwrap();
    assert!(written.contains("1:1 error first"));
    assert!(written.contains("2:4 warning second"));
}

#[test]
#[serial]
fn test_resources_dir_supplies_the_binary() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");
    let binaries = project.path().join("tools/linter");
    let binary = binaries.join(Platform::LinuxX64.resource_path());
    fs::create_dir_all(binary.parent().unwrap()).unwrap();
    fs::write(&binary, CLEAN_LINTER).unwrap();

    let mut config = LintConfig::new();
    config.linter.platform = Some(Platform::LinuxX64);
    config.linter.resources_dir = Some("tools/linter".to_string());

    let outcome = BuildStep::new(config, project.path()).execute().unwrap();
    match outcome {
        StepOutcome::Passed(result) => assert!(result.output.contains("No results found!")),
        other => panic!("expected Passed, got {:?}", other),
    }
}

#[test]
fn test_resources_dir_without_binary_is_execution_error() {
    let project = tempdir().unwrap();
    write_document(project.path(), "api.yaml");
    let mut config = LintConfig::new();
    config.linter.platform = Some(Platform::AlpineArm64);
    config.linter.resources_dir = Some("empty".to_string());

    let result = BuildStep::new(config, project.path()).execute();
    let err = result.unwrap_err();
    assert!(matches!(err, StepError::Execution(_)));
    assert!(err.to_string().contains("alpine/arm64/linter"));
}
