//! File handles returned by the virtual file provider.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ProviderError;
use crate::package::{PackageRef, ResourceStream};

/// Seconds between 1601-01-01 (Windows FILETIME epoch) and the Unix epoch.
const FILETIME_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;

#[derive(Clone)]
struct EmbeddedSource {
    package: PackageRef,
    resource: String,
    length: u64,
}

/// Metadata and content access for one virtual file.
///
/// A not-found handle reports `exists() == false`, a zero length, and fails to open.
#[derive(Clone)]
pub struct FileInfo {
    name: String,
    source: Option<EmbeddedSource>,
}

impl FileInfo {
    /// Handle for an embedded resource; the length is read from the package up front.
    pub(crate) fn embedded(
        package: PackageRef,
        resource: &str,
        name: &str,
    ) -> Result<Self, ProviderError> {
        let length = package.resource_len(resource)?;
        Ok(Self {
            name: name.to_string(),
            source: Some(EmbeddedSource {
                package,
                resource: resource.to_string(),
                length,
            }),
        })
    }

    /// Handle for a path that resolves to nothing.
    pub fn not_found(subpath: &str) -> Self {
        Self {
            name: subpath.to_string(),
            source: None,
        }
    }

    /// Whether the file exists.
    pub fn exists(&self) -> bool {
        self.source.is_some()
    }

    /// Byte length of the file; zero when it does not exist.
    pub fn length(&self) -> u64 {
        self.source.as_ref().map_or(0, |source| source.length)
    }

    /// Canonical file name (or the requested path when not found).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Synthetic physical path `/{name}`; embedded files have no real location.
    pub fn physical_path(&self) -> Option<String> {
        self.exists().then(|| format!("/{}", self.name))
    }

    /// Embedded files are never directories.
    pub fn is_directory(&self) -> bool {
        false
    }

    /// Name of the package serving the file.
    pub fn package_name(&self) -> Option<&str> {
        self.source.as_ref().map(|source| source.package.name())
    }

    /// Raw resource identifier inside the owning package.
    pub fn resource_id(&self) -> Option<&str> {
        self.source.as_ref().map(|source| source.resource.as_str())
    }

    /// Last-modified time derived from the owning package's version.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self
            .source
            .as_ref()
            .and_then(|source| version_timestamp(source.package.version()))
    }

    /// Open the file contents for reading.
    pub fn open(&self) -> Result<ResourceStream<'_>, ProviderError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ProviderError::NotFound(self.name.clone()))?;
        Ok(source.package.open_resource(&source.resource)?)
    }
}

impl std::fmt::Debug for FileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileInfo")
            .field("name", &self.name)
            .field("exists", &self.exists())
            .field("length", &self.length())
            .field("package", &self.package_name())
            .field("resource", &self.resource_id())
            .finish()
    }
}

/// Read the digits of a version string as FILETIME ticks (100 ns since 1601-01-01).
///
/// `1.0.0.0` becomes 1000 ticks. Versions without digits, or whose digits overflow,
/// have no timestamp.
pub fn version_timestamp(version: &str) -> Option<SystemTime> {
    let digits: String = version.chars().filter(|c| c.is_ascii_digit()).collect();
    let ticks: u64 = digits.parse().ok()?;
    let since_filetime_epoch = Duration::from_nanos(ticks.checked_mul(100)?);
    UNIX_EPOCH
        .checked_sub(Duration::from_secs(FILETIME_EPOCH_OFFSET_SECS))?
        .checked_add(since_filetime_epoch)
}
