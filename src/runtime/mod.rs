//! Runtime abstraction for system operations.
//!
//! Everything that touches the environment, the file system or child
//! processes goes through [`Runtime`], so the resolver and installer can be
//! exercised against a mock.
//!
//! # Structure
//!
//! - `env` - Environment variables and well-known directories
//! - `fs` - File system operations (open, create, permissions, temp files)
//! - `process` - Child processes with a bounded wait

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::env as std_env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file the current user may execute.
    /// On Unix this asks `access(2)` for `X_OK`; elsewhere, that the file exists.
    fn is_executable(&self, path: &Path) -> bool;

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>>;
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Permission bits of `path`. Always `0` on Windows.
    fn mode(&self, path: &Path) -> Result<u32>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    /// Create a new, empty, uniquely named file in the temp directory and keep it.
    fn create_temp_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf>;

    fn absolute(&self, path: &Path) -> Result<PathBuf>;

    // Directories
    fn data_dir(&self) -> Option<PathBuf>;

    // Processes
    /// Run `program` and wait at most `timeout` for it to exit.
    /// Returns `Ok(None)` when the deadline passed first; the child keeps running
    /// and is reaped by a background thread.
    fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Option<i32>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.is_executable_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.open_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        self.create_file_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn mode(&self, path: &Path) -> Result<u32> {
        self.mode_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn create_temp_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf> {
        self.create_temp_file_impl(prefix, suffix)
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        self.absolute_impl(path)
    }

    fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir_impl()
    }

    fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Option<i32>> {
        self.run_with_timeout_impl(program, args, timeout)
    }
}
