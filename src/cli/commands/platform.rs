//! Platform command implementation

use crate::cli::error::CliError;
use crate::platform::{HostInfo, Platform};

/// Describe the linter build selected for a host
pub fn describe_platform(host: &HostInfo, forced: Option<&str>) -> Result<String, CliError> {
    let platform = match forced {
        Some(name) => name.parse::<Platform>().map_err(CliError::InvalidArgument)?,
        None => Platform::detect(host),
    };

    Ok(format!(
        "host:     {} / {}\nplatform: {}\nresource: {}",
        host.os,
        host.arch,
        platform,
        platform.resource_path()
    ))
}

/// Handle the platform command
pub fn handle_platform(forced: Option<&str>) -> Result<(), CliError> {
    println!("{}", describe_platform(&HostInfo::current(), forced)?);
    Ok(())
}
