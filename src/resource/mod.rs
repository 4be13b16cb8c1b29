//! Packaged resources
//!
//! A resource is addressed by an absolute-style path such as
//! `/webp_binaries/linux/cwebp`. Sources decide where the bytes come from:
//! a directory on disk, a table compiled into the program, or an archive.

mod dir;
mod embedded;
mod tar_gz;
mod zip;

pub use dir::DirectorySource;
pub use embedded::EmbeddedSource;
pub use tar_gz::TarGzSource;
pub use self::zip::ZipSource;

use anyhow::Result;
use log::debug;
use std::io::Read;
use std::path::Path;

use crate::config::Settings;
use crate::runtime::Runtime;

/// Something that can hand out packaged resources by path.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceSource: Send + Sync {
    /// Open the resource at `path`.
    ///
    /// `Ok(None)` means the resource does not exist in this source.
    /// `Err` means the source itself could not be read.
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>>;

    /// Human readable description for logs and error messages.
    fn describe(&self) -> String;
}

/// Normalize a resource path into a relative, `/`-separated key.
///
/// The leading `/` is optional, empty and `.` segments are dropped.
/// Returns `None` for paths with `..` segments or nothing left after normalizing.
pub(crate) fn resource_key(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Several sources searched in order; the first one that has a resource wins.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ResourceSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Box<dyn ResourceSource>) {
        self.sources.push(source);
    }

    pub fn with(mut self, source: impl ResourceSource + 'static) -> Self {
        self.push(Box::new(source));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ResourceSource for SourceChain {
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>> {
        for source in &self.sources {
            if let Some(reader) = source.open(path)? {
                debug!("{} found in {}", path, source.describe());
                return Ok(Some(reader));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        format!("[{}]", parts.join(", "))
    }
}

/// Pick a source for `path` by its name: `.zip`/`.jar` bundles, `.tar.gz`/`.tgz`
/// tarballs, anything else is a directory root.
pub fn open_resources<R: Runtime + Clone + 'static>(
    runtime: &R,
    path: &Path,
) -> Result<Box<dyn ResourceSource>> {
    if ZipSource::can_handle(path) {
        Ok(Box::new(ZipSource::load(runtime, path)?))
    } else if TarGzSource::can_handle(path) {
        Ok(Box::new(TarGzSource::load(runtime, path)?))
    } else {
        Ok(Box::new(DirectorySource::new(runtime.clone(), path)))
    }
}

/// The resource source `settings` point at, or an empty chain when there is no resource root.
pub fn from_settings<R: Runtime + Clone + 'static>(
    runtime: &R,
    settings: &Settings,
) -> Result<Box<dyn ResourceSource>> {
    match settings.resource_root(runtime) {
        Some(root) => open_resources(runtime, &root),
        None => Ok(Box::new(SourceChain::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::io::Cursor;

    fn read_all(mut reader: Box<dyn Read + Send>) -> Vec<u8> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_resource_key() {
        assert_eq!(
            resource_key("/webp_binaries/linux/cwebp").as_deref(),
            Some("webp_binaries/linux/cwebp")
        );
        assert_eq!(resource_key("webp_binaries//./cwebp").as_deref(), Some("webp_binaries/cwebp"));
        assert_eq!(resource_key("/webp_binaries/../etc/passwd"), None);
        assert_eq!(resource_key("/"), None);
        assert_eq!(resource_key(""), None);
    }

    #[test]
    fn test_chain_prefers_earlier_sources() {
        let mut first = MockResourceSource::new();
        first
            .expect_open()
            .returning(|_| Ok(Some(Box::new(Cursor::new(b"first".to_vec())))));
        first.expect_describe().returning(|| "first".into());

        let mut second = MockResourceSource::new();
        second.expect_open().times(0);

        let chain = SourceChain::new().with(first).with(second);
        let reader = chain.open("/webp_binaries/cwebp").unwrap().unwrap();
        assert_eq!(read_all(reader), b"first");
    }

    #[test]
    fn test_chain_falls_through_misses() {
        let mut first = MockResourceSource::new();
        first.expect_open().returning(|_| Ok(None));

        let mut second = MockResourceSource::new();
        second
            .expect_open()
            .returning(|_| Ok(Some(Box::new(Cursor::new(b"second".to_vec())))));
        second.expect_describe().returning(|| "second".into());

        let chain = SourceChain::new().with(first).with(second);
        let reader = chain.open("/webp_binaries/cwebp").unwrap().unwrap();
        assert_eq!(read_all(reader), b"second");
    }

    #[test]
    fn test_chain_propagates_source_errors() {
        let mut broken = MockResourceSource::new();
        broken
            .expect_open()
            .returning(|_| Err(anyhow::anyhow!("corrupt archive")));

        let chain = SourceChain::new().with(broken);
        assert!(chain.open("/webp_binaries/cwebp").is_err());
    }

    #[test]
    fn test_empty_chain_has_nothing() {
        let chain = SourceChain::new();
        assert!(chain.is_empty());
        assert!(chain.open("/webp_binaries/cwebp").unwrap().is_none());
        assert_eq!(chain.describe(), "[]");
    }

    #[test]
    fn test_open_resources_picks_directory_for_plain_paths() {
        let dir = tempfile::tempdir().unwrap();
        let source = open_resources(&RealRuntime, dir.path()).unwrap();
        assert!(source.describe().starts_with("directory "));
    }

    #[test]
    fn test_from_settings_uses_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            resources: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };

        let source = from_settings(&RealRuntime, &settings).unwrap();
        assert_eq!(source.describe(), format!("directory {}", dir.path().display()));
    }

    #[test]
    fn test_open_resources_fails_for_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_resources(&RealRuntime, &dir.path().join("missing.zip")).is_err());
        assert!(open_resources(&RealRuntime, &dir.path().join("missing.tar.gz")).is_err());
    }
}
