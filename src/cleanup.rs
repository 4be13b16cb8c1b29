use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// RAII guard for a scoped temporary file.
///
/// The file is removed when the guard is dropped, unless [`TempFileGuard::keep`]
/// hands ownership of the path to the caller first.
pub struct TempFileGuard<'a, R: Runtime> {
    runtime: &'a R,
    path: Option<PathBuf>,
}

impl<'a, R: Runtime> TempFileGuard<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self {
            runtime,
            path: Some(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Mark the operation as successful; the file now belongs to the caller.
    pub fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl<R: Runtime> Drop for TempFileGuard<'_, R> {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        debug!("Cleaning up: {:?}", path);
        if self.runtime.exists(&path)
            && let Err(e) = self.runtime.remove_file(&path)
        {
            warn!("Failed to remove temporary file {:?}: {}", path, e);
        }
    }
}
