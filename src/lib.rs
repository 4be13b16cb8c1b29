//! Locate and install the native webp tools (`cwebp`, `dwebp`, `gif2webp`, ...)
//! that ship as packaged resources, so callers can run them as subprocesses.

pub mod cleanup;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod install;
pub mod platform;
pub mod resolver;
pub mod resource;
pub mod runtime;

pub use config::Settings;
pub use error::InstallError;
pub use install::{Installed, Installer};

use anyhow::Result;

/// Locate `name` using settings from the environment and the resource root they name.
///
/// The returned file is owned by the caller, who should remove it when done
/// unless it came from the override directory.
pub fn locate(name: &str) -> Result<Installed> {
    let runtime = runtime::RealRuntime;
    let settings = Settings::from_env(&runtime);
    let resources = resource::from_settings(&runtime, &settings)?;
    Installer::new(&runtime, resources.as_ref(), &settings).locate(name)
}
