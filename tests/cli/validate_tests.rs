//! Tests for the validate command

use openapi_lint_sdk::cli::commands::validate::{ValidateArgs, handle_validate, resolve_config};
use openapi_lint_sdk::cli::error::CliError;
use openapi_lint_sdk::config::CONFIG_FILENAME;
use openapi_lint_sdk::{Platform, StepError, StepOutcome};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn args_for(project: &Path) -> ValidateArgs {
    ValidateArgs {
        project_dir: project.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_resolve_config_defaults_without_file() {
    let project = tempdir().unwrap();
    let config = resolve_config(&args_for(project.path())).unwrap();

    assert_eq!(config.input.dir, "openapi");
    assert_eq!(config.linter.format, "text");
    assert!(config.build.fail_on_violations);
}

#[test]
fn test_resolve_config_reads_project_file() {
    let project = tempdir().unwrap();
    fs::write(
        project.path().join(CONFIG_FILENAME),
        "[input]\ndir = \"documents\"\n\n[linter]\nformat = \"json\"\n",
    )
    .unwrap();

    let config = resolve_config(&args_for(project.path())).unwrap();
    assert_eq!(config.input.dir, "documents");
    assert_eq!(config.linter.format, "json");
}

#[test]
fn test_flags_override_config_file() {
    let project = tempdir().unwrap();
    fs::write(
        project.path().join(CONFIG_FILENAME),
        "[input]\ndir = \"documents\"\n\n[linter]\nformat = \"json\"\ntimeout_secs = 90\n",
    )
    .unwrap();

    let args = ValidateArgs {
        input_dir: Some("api".to_string()),
        files: vec!["one.yaml".to_string(), "two.yml".to_string()],
        ruleset: Some("https://example.com/ruleset.yaml".to_string()),
        format: Some("junit".to_string()),
        output_file: Some("reports/lint.xml".to_string()),
        verbose: true,
        no_fail_on_violations: true,
        timeout_secs: Some(5),
        platform: Some("linux-arm64".to_string()),
        ..args_for(project.path())
    };

    let config = resolve_config(&args).unwrap();
    assert_eq!(config.input.dir, "api");
    assert_eq!(config.input.files, vec!["one.yaml", "two.yml"]);
    assert_eq!(
        config.linter.ruleset.as_deref(),
        Some("https://example.com/ruleset.yaml")
    );
    assert_eq!(config.linter.format, "junit");
    assert_eq!(config.output.file.as_deref(), Some("reports/lint.xml"));
    assert!(config.linter.verbose);
    assert!(!config.build.fail_on_violations);
    assert_eq!(config.linter.timeout_secs, 5);
    assert_eq!(config.linter.platform, Some(Platform::LinuxArm64));
}

#[test]
fn test_explicit_config_must_exist() {
    let project = tempdir().unwrap();
    let args = ValidateArgs {
        config: Some(project.path().join("nowhere.toml")),
        ..args_for(project.path())
    };

    match resolve_config(&args) {
        Err(CliError::ConfigNotFound(path)) => assert!(path.ends_with("nowhere.toml")),
        other => panic!("expected ConfigNotFound, got {:?}", other),
    }
}

#[test]
fn test_malformed_config_is_reported() {
    let project = tempdir().unwrap();
    let config_path = project.path().join("custom.toml");
    fs::write(&config_path, "[linter\nformat = ").unwrap();

    let args = ValidateArgs {
        config: Some(config_path),
        ..args_for(project.path())
    };
    assert!(matches!(resolve_config(&args), Err(CliError::Config(_))));
}

#[test]
fn test_unknown_platform_flag_is_rejected() {
    let project = tempdir().unwrap();
    let args = ValidateArgs {
        platform: Some("plan9-mips".to_string()),
        ..args_for(project.path())
    };

    let err = resolve_config(&args).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument(_)));
    assert!(err.to_string().contains("plan9-mips"));
}

#[test]
fn test_skip_flag_skips() {
    let project = tempdir().unwrap();
    let args = ValidateArgs {
        skip: true,
        ..args_for(project.path())
    };

    let outcome = handle_validate(&args).unwrap();
    assert_eq!(outcome, StepOutcome::Skipped);
}

#[cfg(unix)]
#[test]
fn test_validate_with_resources_dir() {
    let project = tempdir().unwrap();
    let documents = project.path().join("openapi");
    fs::create_dir_all(&documents).unwrap();
    fs::write(documents.join("api.yaml"), "openapi: 3.0.0\n").unwrap();

    let binary = project
        .path()
        .join("bin")
        .join(Platform::LinuxX64.resource_path());
    fs::create_dir_all(binary.parent().unwrap()).unwrap();
    fs::write(&binary, "#!/bin/sh\necho '4:2 error broken'\nexit 1\n").unwrap();

    let args = ValidateArgs {
        platform: Some("linux-x64".to_string()),
        resources_dir: Some("bin".to_string()),
        ..args_for(project.path())
    };
    match handle_validate(&args) {
        Err(CliError::Step(StepError::ViolationsFound(count))) => assert_eq!(count, 1),
        other => panic!("expected ViolationsFound, got {:?}", other),
    }

    let lenient = ValidateArgs {
        no_fail_on_violations: true,
        ..args
    };
    match handle_validate(&lenient).unwrap() {
        StepOutcome::PassedWithViolations(result) => {
            assert_eq!(result.violation_count, 1);
            assert_eq!(result.files_validated, 1);
        }
        other => panic!("expected PassedWithViolations, got {:?}", other),
    }
}
