//! Error types shared by packages, the page bridge and the virtual file provider.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while enumerating or reading a package's embedded resources.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The package does not declare the requested resource.
    #[error("package `{package}` has no embedded resource `{resource}`")]
    MissingResource {
        /// Name of the package that was queried.
        package: String,
        /// Raw resource identifier that was requested.
        resource: String,
    },
    /// Reading the backing storage of a package failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// The package handle cannot be enumerated at all.
    #[error("package `{0}` is not available")]
    Unavailable(String),
}

/// Failures reported by a page bridge implementation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The scripting engine rejected or threw while running the call.
    #[error("script call failed: {0}")]
    Script(String),
    /// The page has no document or `<head>` to work with.
    #[error("page has no document head")]
    NoDocument,
    /// The engine answered with something the bridge cannot interpret.
    #[error("unexpected bridge reply: {0}")]
    UnexpectedReply(serde_json::Value),
    /// Arguments could not be encoded for the scripting engine.
    #[error("failed to encode bridge arguments: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures surfaced by the virtual file provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No embedded resource is registered under the requested name.
    #[error("no embedded file registered for `{0}`")]
    NotFound(String),
    /// Embedded content is immutable; change notification is not offered.
    #[error("watching embedded content is not supported (filter `{0}`)")]
    WatchUnsupported(String),
    /// The owning package failed to produce the resource.
    #[error(transparent)]
    Package(#[from] PackageError),
}
