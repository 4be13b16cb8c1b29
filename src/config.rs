//! Lookup settings, read once and passed explicitly to the resolver,
//! matcher and installer.

use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::Runtime;

/// Directory holding pre-installed binaries; `<dir>/<name>` wins over packaged resources.
pub const BINARY_DIR_ENV: &str = "WEBP_BINARY_DIR";
/// Set to [`PLATFORM_MAC_ARM64`] to force the Apple silicon candidates.
pub const PLATFORM_ENV: &str = "WEBP_PLATFORM";
/// Resource root: a directory, a `.zip`/`.jar` bundle or a `.tar.gz` tarball.
pub const RESOURCES_ENV: &str = "WEBP_RESOURCES";
/// libwebp release used in the `dist_webp_binaries` layout.
pub const LIBWEBP_VERSION_ENV: &str = "WEBP_LIBWEBP_VERSION";

pub const PLATFORM_MAC_ARM64: &str = "mac_arm64";
pub const DEFAULT_LIBWEBP_VERSION: &str = "1.3.2";
pub const CHMOD_TIMEOUT: Duration = Duration::from_secs(30);

/// How the installed file gets its executable bit on non-Windows targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecBitStrategy {
    /// Set the permission bits directly.
    Native,
    /// Run `chmod +x` and wait up to the given duration.
    Chmod(Duration),
}

impl Default for ExecBitStrategy {
    fn default() -> Self {
        if cfg!(unix) {
            ExecBitStrategy::Native
        } else {
            ExecBitStrategy::Chmod(CHMOD_TIMEOUT)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub binary_dir: Option<PathBuf>,
    pub platform: Option<String>,
    pub resources: Option<PathBuf>,
    pub libwebp_version: String,
    pub exec_bit: ExecBitStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            binary_dir: None,
            platform: None,
            resources: None,
            libwebp_version: DEFAULT_LIBWEBP_VERSION.to_string(),
            exec_bit: ExecBitStrategy::default(),
        }
    }
}

impl Settings {
    /// Read settings from the environment. Empty values count as unset.
    pub fn from_env<R: Runtime>(runtime: &R) -> Self {
        let var = |key: &str| {
            runtime
                .env_var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let settings = Self {
            binary_dir: var(BINARY_DIR_ENV).map(PathBuf::from),
            platform: var(PLATFORM_ENV),
            resources: var(RESOURCES_ENV).map(PathBuf::from),
            libwebp_version: var(LIBWEBP_VERSION_ENV)
                .unwrap_or_else(|| DEFAULT_LIBWEBP_VERSION.to_string()),
            exec_bit: ExecBitStrategy::default(),
        };
        debug!("Settings from environment: {:?}", settings);
        settings
    }

    pub fn forces_mac_arm(&self) -> bool {
        self.platform.as_deref() == Some(PLATFORM_MAC_ARM64)
    }

    /// The resource root to read from: the configured one, else `<data dir>/webp-binaries`.
    pub fn resource_root<R: Runtime>(&self, runtime: &R) -> Option<PathBuf> {
        self.resources
            .clone()
            .or_else(|| runtime.data_dir().map(|d| d.join("webp-binaries")))
    }
}
