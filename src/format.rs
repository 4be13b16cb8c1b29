use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::platform::Os;
use crate::runtime::Runtime;

/// Executable container format of an installed binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryFormat {
    Elf,
    MachO,
    Pe,
    Unknown,
}

impl BinaryFormat {
    /// Uses goblin to parse the binary header.
    pub fn sniff(bytes: &[u8]) -> Self {
        match goblin::Object::parse(bytes) {
            Ok(goblin::Object::Elf(_)) => BinaryFormat::Elf,
            Ok(goblin::Object::Mach(_)) => BinaryFormat::MachO,
            Ok(goblin::Object::PE(_)) => BinaryFormat::Pe,
            _ => BinaryFormat::Unknown,
        }
    }

    pub fn of_file<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let mut buffer = Vec::new();
        runtime
            .open(path)?
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Self::sniff(&buffer))
    }

    /// Whether this format runs natively on `os`. Unknown formats never do.
    pub fn is_native(&self, os: &Os) -> bool {
        matches!(
            (self, os),
            (BinaryFormat::Elf, Os::Linux | Os::Other(_))
                | (BinaryFormat::MachO, Os::MacOs)
                | (BinaryFormat::Pe, Os::Windows)
        )
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryFormat::Elf => "ELF",
            BinaryFormat::MachO => "Mach-O",
            BinaryFormat::Pe => "PE",
            BinaryFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;

    #[test]
    fn test_sniff_garbage_is_unknown() {
        assert_eq!(BinaryFormat::sniff(b""), BinaryFormat::Unknown);
        assert_eq!(BinaryFormat::sniff(b"#!/bin/sh\necho hi\n"), BinaryFormat::Unknown);
    }

    #[test]
    fn test_sniff_running_test_binary() {
        let exe = std::env::current_exe().unwrap();
        let format = BinaryFormat::of_file(&RealRuntime, &exe).unwrap();

        #[cfg(target_os = "linux")]
        assert_eq!(format, BinaryFormat::Elf);
        #[cfg(target_os = "macos")]
        assert_eq!(format, BinaryFormat::MachO);
        #[cfg(target_os = "windows")]
        assert_eq!(format, BinaryFormat::Pe);

        let _ = format;
    }

    #[test]
    fn test_is_native() {
        assert!(BinaryFormat::Elf.is_native(&Os::Linux));
        assert!(BinaryFormat::MachO.is_native(&Os::MacOs));
        assert!(BinaryFormat::Pe.is_native(&Os::Windows));
        assert!(!BinaryFormat::Elf.is_native(&Os::Windows));
        assert!(!BinaryFormat::Unknown.is_native(&Os::Linux));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BinaryFormat::of_file(&RealRuntime, &dir.path().join("missing")).is_err());
    }
}
