use std::io;

use thiserror::Error;

/// Reasons a packaged binary could not be installed.
#[derive(Debug, Error)]
pub enum InstallError {
    /// None of the candidate resource paths exists in the resource source.
    #[error("Could not locate webp binary at [{}]", .candidates.join(", "))]
    NotFound { candidates: Vec<String> },

    /// Copying the resource or marking the destination executable failed.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The resource source itself could not be read (e.g. a corrupt archive).
    #[error("Failed to read resource {path}")]
    Source {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl InstallError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        InstallError::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a runtime failure, keeping the underlying `io::Error` when there is one.
    pub(crate) fn from_runtime(context: impl Into<String>, err: anyhow::Error) -> Self {
        let source = match err.downcast::<io::Error>() {
            Ok(io_err) => io_err,
            Err(other) => io::Error::other(format!("{:#}", other)),
        };
        InstallError::io(context, source)
    }
}
