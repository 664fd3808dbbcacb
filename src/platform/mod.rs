//! Platform variant detection
//!
//! Maps a host operating system and CPU architecture onto one of the linter
//! builds shipped with the crate. Detection is a pure function of the
//! [`HostInfo`] it is given, so callers (and tests) can ask about any host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the linter binary on Unix-like hosts
pub const BINARY_NAME: &str = "linter";

/// Name of the linter binary on Windows hosts
pub const WINDOWS_BINARY_NAME: &str = "linter.exe";

/// Operating system and CPU architecture of a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Describe the host this process was compiled for.
    ///
    /// musl builds of Linux report `alpine` as their OS family, since that is
    /// the only musl distribution the linter ships a build for.
    pub fn current() -> Self {
        let os = if cfg!(all(target_os = "linux", target_env = "musl")) {
            "alpine"
        } else {
            std::env::consts::OS
        };
        Self::new(os, std::env::consts::ARCH)
    }
}

/// A linter build for one OS family and CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Windows,
    MacosX64,
    MacosArm64,
    /// Fallback for anything unrecognised
    #[default]
    LinuxX64,
    LinuxArm64,
    AlpineX64,
    AlpineArm64,
}

impl Platform {
    /// All variants, in resource-table order
    pub const ALL: [Platform; 7] = [
        Platform::Windows,
        Platform::MacosX64,
        Platform::MacosArm64,
        Platform::LinuxX64,
        Platform::LinuxArm64,
        Platform::AlpineX64,
        Platform::AlpineArm64,
    ];

    /// Select the variant for a host.
    ///
    /// Matching is case-insensitive on substrings, so both Rust-style
    /// (`macos`, `aarch64`) and JVM-style (`Mac OS X`, `arm`) names work.
    /// `darwin` is checked before `win` because it contains it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_lint_sdk::platform::{HostInfo, Platform};
    ///
    /// let host = HostInfo::new("macos", "aarch64");
    /// assert_eq!(Platform::detect(&host), Platform::MacosArm64);
    /// assert_eq!(Platform::detect(&HostInfo::new("plan9", "mips")), Platform::LinuxX64);
    /// ```
    pub fn detect(host: &HostInfo) -> Self {
        let os = host.os.to_lowercase();
        let arch = host.arch.to_lowercase();
        let arm = arch.contains("aarch64") || arch.contains("arm");

        if os.contains("mac") || os.contains("darwin") {
            if arm {
                Platform::MacosArm64
            } else {
                Platform::MacosX64
            }
        } else if os.contains("win") {
            Platform::Windows
        } else if os.contains("alpine") {
            if arm {
                Platform::AlpineArm64
            } else {
                Platform::AlpineX64
            }
        } else if (os.contains("nix") || os.contains("nux")) && arm {
            Platform::LinuxArm64
        } else {
            Platform::LinuxX64
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// File name of the linter binary for this variant
    pub fn binary_name(self) -> &'static str {
        if self.is_windows() {
            WINDOWS_BINARY_NAME
        } else {
            BINARY_NAME
        }
    }

    fn os_dir(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacosX64 | Platform::MacosArm64 => "macos",
            Platform::LinuxX64 | Platform::LinuxArm64 => "linux",
            Platform::AlpineX64 | Platform::AlpineArm64 => "alpine",
        }
    }

    fn arch_dir(self) -> &'static str {
        match self {
            Platform::MacosArm64 | Platform::LinuxArm64 | Platform::AlpineArm64 => "arm64",
            _ => "x64",
        }
    }

    /// Path of the bundled binary, as `<os>/<arch>/<binary-name>`
    pub fn resource_path(self) -> String {
        format!(
            "{}/{}/{}",
            self.os_dir(),
            self.arch_dir(),
            self.binary_name()
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::MacosX64 => "macos-x64",
            Platform::MacosArm64 => "macos-arm64",
            Platform::LinuxX64 => "linux-x64",
            Platform::LinuxArm64 => "linux-arm64",
            Platform::AlpineX64 => "alpine-x64",
            Platform::AlpineArm64 => "alpine-arm64",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.to_string() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown platform: {}. Use one of: {}",
                    s,
                    Platform::ALL.map(|p| p.to_string()).join(", ")
                )
            })
    }
}
