use anyhow::Result;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{ResourceSource, resource_key};
use crate::runtime::Runtime;

/// Resources laid out as plain files under a root directory.
pub struct DirectorySource<R: Runtime> {
    runtime: R,
    root: PathBuf,
}

impl<R: Runtime> DirectorySource<R> {
    pub fn new(runtime: R, root: impl AsRef<Path>) -> Self {
        Self {
            runtime,
            root: root.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, path: &str) -> Option<PathBuf> {
        let key = resource_key(path)?;
        Some(key.split('/').fold(self.root.clone(), |acc, s| acc.join(s)))
    }
}

impl<R: Runtime> ResourceSource for DirectorySource<R> {
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let Some(file) = self.file_path(path) else {
            return Ok(None);
        };
        if !self.runtime.is_file(&file) {
            return Ok(None);
        }
        self.runtime.open(&file).map(Some)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_opens_nested_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("webp_binaries/linux")).unwrap();
        fs::write(dir.path().join("webp_binaries/linux/cwebp"), b"linux cwebp").unwrap();

        let source = DirectorySource::new(RealRuntime, dir.path());
        let mut reader = source.open("/webp_binaries/linux/cwebp").unwrap().unwrap();
        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"linux cwebp");
    }

    #[test]
    fn test_missing_file_and_directories_are_absent() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("webp_binaries/cwebp")).unwrap();

        let source = DirectorySource::new(RealRuntime, dir.path());
        assert!(source.open("/webp_binaries/dwebp").unwrap().is_none());
        // A directory named like the binary is not a resource
        assert!(source.open("/webp_binaries/cwebp").unwrap().is_none());
    }

    #[test]
    fn test_parent_segments_never_leave_root() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_file().times(0);
        runtime.expect_open().times(0);

        let source = DirectorySource::new(runtime, "/srv/resources");
        assert!(source.open("/../../etc/passwd").unwrap().is_none());
    }

    #[test]
    fn test_joins_segments_under_root() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_file()
            .with(eq(PathBuf::from("/srv/resources")
                .join("webp_binaries")
                .join("mac")
                .join("cwebp")))
            .returning(|_| false);

        let source = DirectorySource::new(runtime, "/srv/resources");
        assert!(source.open("/webp_binaries/mac/cwebp").unwrap().is_none());
        assert_eq!(source.describe(), "directory /srv/resources");
    }
}
