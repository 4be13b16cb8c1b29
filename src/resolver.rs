use log::debug;
use std::path::PathBuf;

use crate::config::Settings;
use crate::runtime::Runtime;

/// Look for a pre-installed `name` in the configured override directory.
///
/// Returns `None` when no directory is configured or `<dir>/<name>` is not an
/// executable file. This never fails; a miss just means the packaged binary is used.
#[tracing::instrument(skip(runtime, settings))]
pub fn resolve_override<R: Runtime>(
    runtime: &R,
    settings: &Settings,
    name: &str,
) -> Option<PathBuf> {
    let dir = settings
        .binary_dir
        .as_ref()
        .filter(|dir| !dir.as_os_str().is_empty())?;

    let path = dir.join(name);
    if runtime.is_executable(&path) {
        debug!("Using {} from override directory: {:?}", name, path);
        Some(path)
    } else {
        debug!("{:?} is not an executable file, ignoring override", path);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn settings_with_dir(dir: &str) -> Settings {
        Settings {
            binary_dir: Some(PathBuf::from(dir)),
            ..Settings::default()
        }
    }

    #[test]
    fn test_returns_executable_from_override_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_executable()
            .with(eq(PathBuf::from("/opt/webp/cwebp")))
            .times(1)
            .returning(|_| true);

        let resolved = resolve_override(&runtime, &settings_with_dir("/opt/webp"), "cwebp");
        assert_eq!(resolved, Some(PathBuf::from("/opt/webp/cwebp")));
    }

    #[test]
    fn test_missing_or_non_executable_file_is_ignored() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_executable().returning(|_| false);

        let resolved = resolve_override(&runtime, &settings_with_dir("/opt/webp"), "cwebp");
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_unset_or_empty_dir_does_not_touch_filesystem() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_executable().times(0);

        assert_eq!(resolve_override(&runtime, &Settings::default(), "cwebp"), None);
        assert_eq!(resolve_override(&runtime, &settings_with_dir(""), "cwebp"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_override_dir() {
        use crate::runtime::RealRuntime;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            binary_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        let binary = dir.path().join("dwebp");

        // Absent
        assert_eq!(resolve_override(&RealRuntime, &settings, "dwebp"), None);

        // Present but not executable
        std::fs::write(&binary, b"\x7fELF").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(resolve_override(&RealRuntime, &settings, "dwebp"), None);

        // Executable
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(resolve_override(&RealRuntime, &settings, "dwebp"), Some(binary));
    }

    #[cfg(unix)]
    #[test]
    fn test_override_not_executable_by_owner_is_ignored() {
        use crate::runtime::RealRuntime;
        use std::os::unix::fs::PermissionsExt;

        if nix::unistd::geteuid().is_root() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            binary_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        let binary = dir.path().join("cwebp");
        std::fs::write(&binary, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o601)).unwrap();

        assert_eq!(resolve_override(&RealRuntime, &settings, "cwebp"), None);
    }
}
