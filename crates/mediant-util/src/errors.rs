use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all mediant operations.
///
/// Only conditions that abort a resolution run live here. Range conflicts and
/// dependency cycles are recovered inside the engine and reported on the
/// result instead.
#[derive(Debug, Error, Diagnostic)]
pub enum MediantError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Version or version-range text that cannot be parsed.
    #[error("Malformed version '{input}': {reason}")]
    #[diagnostic(help(
        "Use a plain version such as 1.2.3 or a range such as [1.0,2.0), (,1.0] or [1.0,)"
    ))]
    MalformedVersion { input: String, reason: String },

    /// The metadata source could not describe an artifact.
    #[error("Metadata unavailable for {coordinate}: {message}")]
    MetadataUnavailable { coordinate: String, message: String },

    /// Invalid or malformed resolution manifest, fixture or coordinate.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the TOML syntax and the group:artifact[:type[:classifier]]:version coordinates"))]
    Manifest { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl MediantError {
    pub fn malformed_version(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type MediantResult<T> = miette::Result<T>;
