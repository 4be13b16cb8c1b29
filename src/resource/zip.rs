use anyhow::{Context, Result};
use log::debug;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::{ResourceSource, resource_key};
use crate::runtime::Runtime;

/// Resources bundled in a `.zip` (or `.jar`) archive.
pub struct ZipSource {
    archive_path: PathBuf,
    data: Vec<u8>,
}

impl ZipSource {
    pub fn can_handle(path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        name.ends_with(".zip") || name.ends_with(".jar")
    }

    /// Read the archive into memory and check that it parses.
    pub fn load<R: Runtime>(runtime: &R, archive_path: &Path) -> Result<Self> {
        debug!("Loading resource bundle {:?}", archive_path);
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // ZipArchive needs Read + Seek
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
        ZipArchive::new(Cursor::new(data.as_slice()))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", archive_path))?;

        Ok(Self {
            archive_path: archive_path.to_path_buf(),
            data,
        })
    }
}

impl ResourceSource for ZipSource {
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let Some(key) = resource_key(path) else {
            return Ok(None);
        };

        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", self.archive_path))?;
        // Entries may be stored as "./a/b" or "/a/b"
        let index = archive.index_for_name(&key).or_else(|| {
            (0..archive.len()).find(|&i| {
                archive.name_for_index(i).and_then(resource_key).as_deref() == Some(key.as_str())
            })
        });
        let Some(index) = index else {
            return Ok(None);
        };
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read ZIP entry {}", key))?;
        if entry.is_dir() {
            return Ok(None);
        }

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .with_context(|| format!("Failed to extract {} from {:?}", key, self.archive_path))?;
        Ok(Some(Box::new(Cursor::new(content))))
    }

    fn describe(&self) -> String {
        format!("zip {}", self.archive_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    fn create_test_archive(path: &Path, files: &[(&str, &[u8])]) -> Result<()> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in files {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }

        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_can_handle() {
        assert!(ZipSource::can_handle(Path::new("bundle.zip")));
        assert!(ZipSource::can_handle(Path::new("scrimage-webp.JAR")));
        assert!(!ZipSource::can_handle(Path::new("bundle.tar.gz")));
        assert!(!ZipSource::can_handle(Path::new("resources")));
    }

    #[test]
    fn test_opens_entries_by_resource_path() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join("bundle.jar");
        create_test_archive(
            &archive,
            &[
                ("webp_binaries/linux/cwebp", b"zipped cwebp"),
                ("webp_binaries/mac/cwebp", b"mac cwebp"),
            ],
        )?;

        let source = ZipSource::load(&RealRuntime, &archive)?;
        let mut content = Vec::new();
        source
            .open("/webp_binaries/linux/cwebp")?
            .expect("entry should exist")
            .read_to_end(&mut content)?;
        assert_eq!(content, b"zipped cwebp");

        assert!(source.open("/webp_binaries/windows/cwebp.exe")?.is_none());
        assert!(source.describe().starts_with("zip "));
        Ok(())
    }

    #[test]
    fn test_finds_entries_with_unnormalized_names() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join("bundle.zip");
        create_test_archive(
            &archive,
            &[
                ("./webp_binaries/cwebp", b"dot cwebp"),
                ("/webp_binaries/linux/dwebp", b"rooted dwebp"),
            ],
        )?;

        let source = ZipSource::load(&RealRuntime, &archive)?;
        let mut content = Vec::new();
        source
            .open("/webp_binaries/cwebp")?
            .expect("entry should exist")
            .read_to_end(&mut content)?;
        assert_eq!(content, b"dot cwebp");

        content.clear();
        source
            .open("webp_binaries/linux/dwebp")?
            .expect("entry should exist")
            .read_to_end(&mut content)?;
        assert_eq!(content, b"rooted dwebp");

        assert!(source.open("/webp_binaries/gif2webp")?.is_none());
        Ok(())
    }

    #[test]
    fn test_rejects_non_zip_file() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip archive")?;

        assert!(ZipSource::load(&RealRuntime, &archive).is_err());
        Ok(())
    }
}
