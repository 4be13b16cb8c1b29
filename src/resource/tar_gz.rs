use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tar::Archive;

use super::{ResourceSource, resource_key};
use crate::runtime::Runtime;

/// Resources inside a gzip-compressed tarball, such as a libwebp release download.
pub struct TarGzSource {
    archive_path: PathBuf,
    data: Vec<u8>,
}

impl TarGzSource {
    pub fn can_handle(path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    pub fn load<R: Runtime>(runtime: &R, archive_path: &Path) -> Result<Self> {
        debug!("Loading resource tarball {:?}", archive_path);
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        Ok(Self {
            archive_path: archive_path.to_path_buf(),
            data,
        })
    }
}

impl ResourceSource for TarGzSource {
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let Some(key) = resource_key(path) else {
            return Ok(None);
        };

        let mut archive = Archive::new(GzDecoder::new(self.data.as_slice()));
        let entries = archive
            .entries()
            .with_context(|| format!("Failed to read tarball {:?}", self.archive_path))?;

        for entry in entries {
            let mut entry = entry
                .with_context(|| format!("Failed to read entry in {:?}", self.archive_path))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let entry_path = entry.path()?.to_string_lossy().to_string();
            if resource_key(&entry_path).as_deref() != Some(key.as_str()) {
                continue;
            }

            let mut content = Vec::new();
            entry.read_to_end(&mut content).with_context(|| {
                format!("Failed to extract {} from {:?}", key, self.archive_path)
            })?;
            return Ok(Some(Box::new(Cursor::new(content))));
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        format!("tarball {}", self.archive_path.display())
    }
}
