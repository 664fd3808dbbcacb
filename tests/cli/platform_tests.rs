//! Tests for the platform command

use openapi_lint_sdk::HostInfo;
use openapi_lint_sdk::cli::commands::platform::describe_platform;
use openapi_lint_sdk::cli::error::CliError;

#[test]
fn test_describe_detected_platform() {
    let host = HostInfo::new("linux", "aarch64");
    let text = describe_platform(&host, None).unwrap();

    assert!(text.contains("host:     linux / aarch64"));
    assert!(text.contains("platform: linux-arm64"));
    assert!(text.contains("resource: linux/arm64/linter"));
}

#[test]
fn test_describe_windows_uses_exe() {
    let host = HostInfo::new("Windows 11", "amd64");
    let text = describe_platform(&host, None).unwrap();
    assert!(text.contains("resource: windows/x64/linter.exe"));
}

#[test]
fn test_forced_platform_overrides_host() {
    let host = HostInfo::new("linux", "x86_64");
    let text = describe_platform(&host, Some("alpine-arm64")).unwrap();
    assert!(text.contains("platform: alpine-arm64"));
    assert!(text.contains("resource: alpine/arm64/linter"));
}

#[test]
fn test_unknown_forced_platform_is_invalid() {
    let host = HostInfo::new("linux", "x86_64");
    assert!(matches!(
        describe_platform(&host, Some("solaris-sparc")),
        Err(CliError::InvalidArgument(_))
    ));
}
