//! Command implementations behind the `webp-binaries` CLI.

use anyhow::{Result, anyhow};
use log::debug;
use serde::Serialize;
use std::io::Write;

use crate::install::Installer;
use crate::platform::PlatformKey;
use crate::runtime::Runtime;

#[derive(Debug, Serialize)]
struct CandidateReport<'a> {
    name: &'a str,
    platform: String,
    layout: PlatformKey,
    candidates: Vec<String>,
}

/// Print the resource paths that would be tried for `name`, in order.
pub fn candidates<R: Runtime, W: Write>(
    installer: &Installer<'_, R>,
    name: &str,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let candidates = installer.candidates(name);
    if json {
        let report = CandidateReport {
            name,
            platform: installer.platform().to_string(),
            layout: installer.layout(),
            candidates,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        for candidate in candidates {
            writeln!(out, "{}", candidate)?;
        }
    }
    Ok(())
}

/// Print the override path for `name`; fails when the override does not apply.
pub fn resolve<R: Runtime, W: Write>(
    installer: &Installer<'_, R>,
    name: &str,
    out: &mut W,
) -> Result<()> {
    match installer.resolve_override(name) {
        Some(path) => {
            writeln!(out, "{}", path.display())?;
            Ok(())
        }
        None => Err(anyhow!("No executable {} in the override directory", name)),
    }
}

/// Install `name` and print where it went.
pub fn install<R: Runtime, W: Write>(
    installer: &Installer<'_, R>,
    name: &str,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let installed = installer.locate(name)?;
    debug!("Installed {:?}", installed);

    if json {
        serde_json::to_writer_pretty(&mut *out, &installed)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", installed.path.display())?;
    }
    Ok(())
}
