use log::{debug, warn};
use std::io;
use std::path::Path;

use crate::config::ExecBitStrategy;
use crate::error::InstallError;
use crate::runtime::Runtime;

/// Give `path` the executable bit using `strategy`.
pub(crate) fn mark_executable<R: Runtime>(
    runtime: &R,
    path: &Path,
    strategy: ExecBitStrategy,
) -> Result<(), InstallError> {
    match strategy {
        ExecBitStrategy::Native => {
            let mode = runtime
                .mode(path)
                .map_err(|e| InstallError::from_runtime(format!("Failed to stat {:?}", path), e))?;
            debug!("Setting executable permission on {:?}", path);
            runtime.set_permissions(path, mode | 0o111).map_err(|e| {
                InstallError::from_runtime(format!("Failed to set executable {:?}", path), e)
            })
        }
        ExecBitStrategy::Chmod(timeout) => {
            let absolute = runtime.absolute(path).map_err(|e| {
                InstallError::from_runtime(format!("Failed to resolve {:?}", path), e)
            })?;
            let args = vec!["+x".to_string(), absolute.to_string_lossy().into_owned()];

            debug!("Running chmod +x {:?}", absolute);
            let outcome = runtime
                .run_with_timeout("chmod", &args, timeout)
                .map_err(|e| InstallError::from_runtime("Failed to run chmod", e))?;
            match outcome {
                Some(0) => Ok(()),
                Some(code) => Err(InstallError::io(
                    format!("Failed to set executable {:?}", absolute),
                    io::Error::other(format!("chmod exited with status {}", code)),
                )),
                None => {
                    // Not verified; the caller will find out when it runs the binary
                    warn!("chmod did not finish within {:?}, continuing", timeout);
                    Ok(())
                }
            }
        }
    }
}
