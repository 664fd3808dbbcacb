//! Executable extraction
//!
//! Copies the linter binary for the selected platform out of a
//! [`BinarySource`] into a scratch directory and makes it runnable. The
//! copy is redone on every run and never removed by this crate.

use crate::error::{LintError, LintResult};
use crate::platform::Platform;
use crate::resources::BinarySource;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory created inside the caller's target directory
pub const SCRATCH_DIR_NAME: &str = "openapi-lint";

/// An extracted, runnable linter binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    path: PathBuf,
}

impl ResolvedExecutable {
    /// Absolute path of the binary
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extracts the linter for one platform from a binary source
pub struct ExecutableResolver<S: BinarySource> {
    source: S,
    platform: Platform,
}

impl<S: BinarySource> ExecutableResolver<S> {
    pub fn new(source: S, platform: Platform) -> Self {
        Self { source, platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Write the platform's binary to `<target_dir>/openapi-lint/<binary-name>`.
    ///
    /// Existing content at that path is overwritten. On non-Windows platforms
    /// the file is made readable and executable, and the execute bit is
    /// checked afterwards.
    ///
    /// # Errors
    ///
    /// * [`LintError::ResourceNotFound`] if the source has no binary for the platform
    /// * [`LintError::ExtractionFailed`] if reading the binary, the directory,
    ///   the copy or the permissions fail
    pub fn extract(&self, target_dir: &Path) -> LintResult<ResolvedExecutable> {
        let resource_path = self.platform.resource_path();
        let bytes = self
            .source
            .load(&resource_path)
            .map_err(|e| LintError::ExtractionFailed {
                path: PathBuf::from(&resource_path),
                reason: format!("failed to read binary: {}", e),
            })?
            .ok_or_else(|| LintError::ResourceNotFound {
                path: resource_path.clone(),
            })?;

        debug!("Linter platform: {} ({})", self.platform, resource_path);

        let scratch_dir = absolute(&target_dir.join(SCRATCH_DIR_NAME));
        std::fs::create_dir_all(&scratch_dir).map_err(|e| LintError::ExtractionFailed {
            path: scratch_dir.clone(),
            reason: format!("failed to create directory: {}", e),
        })?;

        let executable = scratch_dir.join(self.platform.binary_name());
        std::fs::write(&executable, &bytes).map_err(|e| LintError::ExtractionFailed {
            path: executable.clone(),
            reason: format!("failed to copy binary: {}", e),
        })?;

        if !self.platform.is_windows() {
            make_executable(&executable)?;
            debug!("Made executable: {}", executable.display());
        }

        debug!("Extracted linter executable to: {}", executable.display());
        Ok(ResolvedExecutable { path: executable })
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> LintResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let failed = |reason: String| LintError::ExtractionFailed {
        path: path.to_path_buf(),
        reason,
    };

    let mut permissions = std::fs::metadata(path)
        .map_err(|e| failed(format!("failed to read permissions: {}", e)))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)
        .map_err(|e| failed(format!("failed to set permissions: {}", e)))?;

    let mode = std::fs::metadata(path)
        .map_err(|e| failed(format!("failed to verify permissions: {}", e)))?
        .permissions()
        .mode();
    if mode & 0o111 == 0 {
        return Err(failed("file is not executable after setting permissions".to_string()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> LintResult<()> {
    // No execute bit to set
    Ok(())
}
