//! Virtual file provider serving embedded resources by canonical file name.
//!
//! The provider is what an HTTP static-file layer sits on: it answers
//! "file info" and "directory listing" queries keyed by URL path and hands back
//! readable streams over the packaged bytes. Its name table is built once from
//! the package list and never changes afterwards, so it can be shared across
//! request handlers without locking.

mod directory;
mod file_info;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

pub use directory::DirectoryContents;
pub use file_info::{FileInfo, version_timestamp};

use crate::asset_paths::{CONTENT_ROOT, normalize_resource_name};
use crate::error::ProviderError;
use crate::logging::{DebugLog, verbose};
use crate::package::{PackageRef, list_embedded_resources};

#[derive(Clone)]
struct MappedResource {
    package: PackageRef,
    resource: String,
}

/// Lookup table from canonical file name to the package resource serving it.
///
/// Resources whose directory listing name differs from their canonical name
/// (dotted identifiers such as `Widgets.wwwroot.site.css`) are also reachable
/// under that listing name, which is the URL they are referenced by.
#[derive(Clone)]
pub struct VirtualFileProvider {
    files: HashMap<String, MappedResource>,
    full_names: HashMap<String, MappedResource>,
    packages: HashMap<String, PackageRef>,
    log: DebugLog,
}

impl VirtualFileProvider {
    /// Build the name table from `packages` in order.
    ///
    /// When two resources share a canonical name the first registration wins and
    /// later ones are dropped with a warning. Packages that cannot be enumerated
    /// are skipped with a warning.
    pub fn new(packages: impl IntoIterator<Item = PackageRef>, log: DebugLog) -> Self {
        let mut provider = Self {
            files: HashMap::new(),
            full_names: HashMap::new(),
            packages: HashMap::new(),
            log,
        };

        for package in packages {
            provider.register(package);
        }

        provider
    }

    fn register(&mut self, package: PackageRef) {
        let package_name = package.name().to_string();
        let resources = match list_embedded_resources(package.as_ref(), &self.log) {
            Ok(resources) => resources.map(str::to_string).collect::<Vec<_>>(),
            Err(error) => {
                warn!(
                    package = %package_name,
                    %error,
                    "Skipping package that cannot be enumerated"
                );
                return;
            }
        };

        for resource in resources {
            let key = normalize_resource_name(&package_name, &resource).file_name;
            let listed = directory::listing_name(&resource);

            if listed != key && claim(&mut self.full_names, listed, &package, &resource) {
                verbose!(self.log, "Mapped {package_name}.{resource} as {listed}");
            }
            if claim(&mut self.files, &key, &package, &resource) {
                verbose!(self.log, "Mapped {package_name}.{resource} as {key}");
            }
        }

        self.packages.entry(package_name).or_insert(package);
    }

    /// Number of servable canonical file names.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are servable.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve a request path to a file by its last segment.
    pub fn file_info(&self, subpath: &str) -> FileInfo {
        verbose!(self.log, "GetFileInfo({subpath})");
        let key = subpath.rsplit(['/', '\\']).next().unwrap_or(subpath);

        let Some(mapped) = self.files.get(key).or_else(|| self.full_names.get(key)) else {
            return FileInfo::not_found(subpath);
        };

        match FileInfo::embedded(Arc::clone(&mapped.package), &mapped.resource, key) {
            Ok(info) => info,
            Err(error) => {
                warn!(path = %subpath, %error, "Embedded resource could not be read");
                FileInfo::not_found(subpath)
            }
        }
    }

    /// List the resources of the package named by `_content/{package}`.
    ///
    /// Paths outside the reserved root, or naming an unknown package, are not found.
    pub fn directory_contents(&self, subpath: &str) -> DirectoryContents {
        verbose!(self.log, "GetDirectoryContents({subpath})");
        let parts: Vec<&str> = subpath.split('/').collect();
        let root = if parts[0].is_empty() && parts.len() > 2 {
            parts[1]
        } else {
            parts[0]
        };

        if root != CONTENT_ROOT {
            return DirectoryContents::NotFound;
        }

        let name = parts[parts.len() - 1];
        let Some(package) = self.packages.get(name) else {
            return DirectoryContents::NotFound;
        };

        let resources = match package.resource_names() {
            Ok(resources) => resources,
            Err(error) => {
                warn!(package = %name, %error, "Package listing failed");
                return DirectoryContents::NotFound;
            }
        };

        let mut entries = Vec::new();
        for resource in resources {
            let entry_name = directory::listing_name(resource);
            match FileInfo::embedded(Arc::clone(package), resource, entry_name) {
                Ok(info) => entries.push(info),
                Err(error) => {
                    warn!(package = %name, %resource, %error, "Skipping unreadable resource")
                }
            }
        }

        DirectoryContents::Package {
            name: name.to_string(),
            entries,
        }
    }

    /// Change notification is not available for embedded content.
    pub fn watch(&self, filter: &str) -> Result<(), ProviderError> {
        Err(ProviderError::WatchUnsupported(filter.to_string()))
    }
}

/// Register `key` for a resource unless another package already holds it.
fn claim(
    table: &mut HashMap<String, MappedResource>,
    key: &str,
    package: &PackageRef,
    resource: &str,
) -> bool {
    let package_name = package.name();
    if table.contains_key(key) {
        warn!(
            package = %package_name,
            %resource,
            "Duplicate resource - unable to add {key} from {package_name}"
        );
        return false;
    }

    table.insert(key.to_string(), MappedResource {
        package: Arc::clone(package),
        resource: resource.to_string(),
    });
    true
}

impl std::fmt::Debug for VirtualFileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut files: Vec<&str> = self.files.keys().map(String::as_str).collect();
        files.sort_unstable();
        f.debug_struct("VirtualFileProvider")
            .field("files", &files)
            .finish()
    }
}
