//! Installing packaged webp binaries.
//!
//! The flow for one binary:
//! 1. An executable in the override directory wins outright.
//! 2. Otherwise a fresh placeholder file is created in the temp directory.
//! 3. The candidate resource paths for the platform are tried in order and the
//!    first one found is copied over the placeholder and made executable.
//!
//! If step 3 fails the placeholder is removed again.

mod executable;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cleanup::TempFileGuard;
use crate::config::Settings;
use crate::error::InstallError;
use crate::format::BinaryFormat;
use crate::platform::{Platform, PlatformKey, candidate_paths};
use crate::resolver::resolve_override;
use crate::resource::ResourceSource;
use crate::runtime::Runtime;

use executable::mark_executable;

/// Suffix of placeholder file names, after the binary name and a random part.
const PLACEHOLDER_SUFFIX: &str = "binary";

/// A binary ready to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installed {
    pub name: String,
    pub path: PathBuf,
    /// Resource path the binary was copied from; `None` when it came from the override directory.
    pub source: Option<String>,
    pub format: Option<BinaryFormat>,
    pub from_override: bool,
}

pub struct Installer<'a, R: Runtime> {
    runtime: &'a R,
    resources: &'a dyn ResourceSource,
    settings: &'a Settings,
    platform: Platform,
}

impl<'a, R: Runtime> Installer<'a, R> {
    pub fn new(runtime: &'a R, resources: &'a dyn ResourceSource, settings: &'a Settings) -> Self {
        Self {
            runtime,
            resources,
            settings,
            platform: Platform::detect(),
        }
    }

    /// Use `platform` instead of the detected one.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Packaging layout the candidates come from.
    pub fn layout(&self) -> PlatformKey {
        self.platform.key(self.settings)
    }

    pub fn candidates(&self, name: &str) -> Vec<String> {
        candidate_paths(name, &self.platform, self.settings)
    }

    pub fn resolve_override(&self, name: &str) -> Option<PathBuf> {
        resolve_override(self.runtime, self.settings, name)
    }

    /// Create the empty, uniquely named file a binary will be installed into.
    pub fn create_placeholder(&self, name: &str) -> Result<PathBuf, InstallError> {
        self.runtime
            .create_temp_file(name, PLACEHOLDER_SUFFIX)
            .map_err(|e| {
                InstallError::from_runtime(format!("Failed to create placeholder for {}", name), e)
            })
    }

    /// Copy the first candidate that exists in the resource source to `output`.
    ///
    /// Returns the candidate that was used. Later candidates are never opened.
    #[tracing::instrument(skip(self, candidates))]
    pub fn install_binary(
        &self,
        output: &Path,
        candidates: &[String],
    ) -> Result<String, InstallError> {
        info!("Installing binary at {:?}", output);

        for candidate in candidates {
            debug!("Trying source from {}", candidate);
            let reader = self
                .resources
                .open(candidate)
                .map_err(|source| InstallError::Source {
                    path: candidate.clone(),
                    source,
                })?;
            let Some(mut reader) = reader else {
                continue;
            };

            debug!("Source detected {}", candidate);
            self.copy_to(&mut reader, candidate, output)?;
            drop(reader);

            if !self.platform.os.is_windows() {
                info!("Setting executable {:?}", output);
                mark_executable(self.runtime, output, self.settings.exec_bit)?;
            }
            return Ok(candidate.clone());
        }

        Err(InstallError::NotFound {
            candidates: candidates.to_vec(),
        })
    }

    fn copy_to(
        &self,
        reader: &mut dyn io::Read,
        candidate: &str,
        output: &Path,
    ) -> Result<(), InstallError> {
        let context = || format!("Failed to copy {} to {:?}", candidate, output);

        let mut writer = self
            .runtime
            .create_file(output)
            .map_err(|e| InstallError::from_runtime(context(), e))?;
        let bytes = io::copy(reader, &mut writer).map_err(|e| InstallError::io(context(), e))?;
        writer.flush().map_err(|e| InstallError::io(context(), e))?;

        debug!("Copied {} bytes from {}", bytes, candidate);
        Ok(())
    }

    /// Find or install `name` and return a path that can be executed.
    #[tracing::instrument(skip(self))]
    pub fn locate(&self, name: &str) -> Result<Installed> {
        if let Some(path) = self.resolve_override(name) {
            return Ok(Installed {
                name: name.to_string(),
                path,
                source: None,
                format: None,
                from_override: true,
            });
        }

        let candidates = self.candidates(name);
        debug!(
            "Candidates for {} on {} ({}): {:?}",
            name,
            self.platform,
            self.layout(),
            candidates
        );

        let placeholder = TempFileGuard::new(self.runtime, self.create_placeholder(name)?);
        let source = self.install_binary(placeholder.path(), &candidates)?;
        let path = placeholder.keep();

        let format = match BinaryFormat::of_file(self.runtime, &path) {
            Ok(format) => {
                if !format.is_native(&self.platform.os) {
                    warn!(
                        "{} from {} is a {} binary, which may not run on {}",
                        name, source, format, self.platform
                    );
                }
                Some(format)
            }
            Err(e) => {
                debug!("Could not inspect {:?}: {}", path, e);
                None
            }
        };

        Ok(Installed {
            name: name.to_string(),
            path,
            source: Some(source),
            format,
            from_override: false,
        })
    }
}
