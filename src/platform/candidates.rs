use serde::Serialize;
use std::fmt;

use super::{Os, Platform};
use crate::config::Settings;

const BINARIES_ROOT: &str = "/webp_binaries";
const DIST_ROOT: &str = "/dist_webp_binaries";

/// The four packaging layouts binaries are shipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKey {
    Windows,
    MacIntel,
    MacArm,
    Linux,
}

impl PlatformKey {
    /// Windows always wins; `force_mac_arm` then beats the detected OS and arch.
    /// Unknown operating systems use the Linux layout.
    pub fn select(platform: &Platform, force_mac_arm: bool) -> Self {
        if platform.os.is_windows() {
            PlatformKey::Windows
        } else if force_mac_arm {
            PlatformKey::MacArm
        } else if platform.os == Os::MacOs && platform.is_arm() {
            PlatformKey::MacArm
        } else if platform.os == Os::MacOs {
            PlatformKey::MacIntel
        } else {
            PlatformKey::Linux
        }
    }

    /// Platform segment of the `libwebp-<version>-<platform>` release directory.
    fn dist_platform(&self) -> &'static str {
        match self {
            PlatformKey::Windows => "windows-x64",
            PlatformKey::MacIntel => "mac-x86-64",
            PlatformKey::MacArm => "mac-arm64",
            PlatformKey::Linux => "linux-x86-64",
        }
    }

    /// Ordered resource paths for `name`, highest priority first.
    pub fn paths(&self, name: &str, libwebp_version: &str) -> Vec<String> {
        let dist_bin = format!(
            "{DIST_ROOT}/libwebp-{libwebp_version}-{}/bin",
            self.dist_platform()
        );

        match self {
            PlatformKey::Windows => vec![
                format!("{BINARIES_ROOT}/{name}"),
                format!("{BINARIES_ROOT}/{name}.exe"),
                // Published packages used "window"; keep it ahead of the fixed spelling
                format!("{BINARIES_ROOT}/window/{name}"),
                format!("{BINARIES_ROOT}/window/{name}.exe"),
                format!("{BINARIES_ROOT}/windows/{name}"),
                format!("{BINARIES_ROOT}/windows/{name}.exe"),
                format!("{dist_bin}/{name}"),
                format!("{dist_bin}/{name}.exe"),
            ],
            PlatformKey::MacIntel => vec![
                format!("{BINARIES_ROOT}/{name}"),
                format!("{BINARIES_ROOT}/mac/{name}"),
                format!("{dist_bin}/{name}"),
            ],
            PlatformKey::MacArm => vec![
                format!("{BINARIES_ROOT}/{name}"),
                format!("{BINARIES_ROOT}/mac_arm64/{name}"),
                format!("{dist_bin}/{name}"),
            ],
            PlatformKey::Linux => vec![
                format!("{BINARIES_ROOT}/{name}"),
                format!("{BINARIES_ROOT}/linux/{name}"),
                format!("{dist_bin}/{name}"),
            ],
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformKey::Windows => "windows",
            PlatformKey::MacIntel => "mac-intel",
            PlatformKey::MacArm => "mac-arm64",
            PlatformKey::Linux => "linux",
        };
        f.write_str(name)
    }
}

/// Search paths for the packaged binary `name` on `platform`.
pub fn candidate_paths(name: &str, platform: &Platform, settings: &Settings) -> Vec<String> {
    platform.key(settings).paths(name, &settings.libwebp_version)
}
