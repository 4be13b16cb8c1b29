//! Platform detection and candidate resource paths
//!
//! This module detects the current platform (OS family and architecture)
//! and maps it to the ordered list of packaged-resource paths where the
//! webp binaries may live.

mod candidates;

pub use candidates::{PlatformKey, candidate_paths};

use std::fmt;

use crate::config::Settings;

/// Operating system family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Os {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "windows" => Os::Windows,
            "macos" | "mac" | "darwin" | "osx" => Os::MacOs,
            "linux" => Os::Linux,
            other => Os::Other(other.to_string()),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Windows => f.write_str("windows"),
            Os::MacOs => f.write_str("macos"),
            Os::Linux => f.write_str("linux"),
            Os::Other(name) => f.write_str(name),
        }
    }
}

/// Platform information for candidate selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: String,
}

impl Platform {
    pub fn new(os: Os, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Detect the platform this binary was compiled for
    pub fn detect() -> Self {
        Self {
            os: Os::parse(std::env::consts::OS),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// `aarch64` and `arm64` both name 64-bit ARM.
    pub fn is_arm(&self) -> bool {
        self.arch.starts_with("arm") || self.arch.starts_with("aarch64")
    }

    /// Which candidate list applies to this platform under `settings`.
    pub fn key(&self, settings: &Settings) -> PlatformKey {
        PlatformKey::select(self, settings.forces_mac_arm())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
