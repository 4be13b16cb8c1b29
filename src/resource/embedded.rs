use anyhow::Result;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Read};

use super::{ResourceSource, resource_key};

/// Resources compiled into the program, usually with `include_bytes!`.
///
/// ```
/// use webp_binaries::resource::{EmbeddedSource, ResourceSource};
///
/// let source = EmbeddedSource::new().with("/webp_binaries/linux/cwebp", &b"\x7fELF"[..]);
/// assert!(source.open("/webp_binaries/linux/cwebp").unwrap().is_some());
/// ```
#[derive(Debug, Default, Clone)]
pub struct EmbeddedSource {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`. Paths that do not normalize are skipped.
    pub fn with(mut self, path: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Cow<'static, [u8]>>) {
        if let Some(key) = resource_key(path) {
            self.entries.insert(key, bytes.into());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceSource for EmbeddedSource {
    fn open(&self, path: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let entry = resource_key(path).and_then(|key| self.entries.get(&key));
        Ok(entry.map(|bytes| Box::new(Cursor::new(bytes.clone())) as Box<dyn Read + Send>))
    }

    fn describe(&self) -> String {
        format!("embedded ({} resources)", self.entries.len())
    }
}
