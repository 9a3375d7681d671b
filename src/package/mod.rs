//! Code packages that carry embedded resources, and enumeration over them.
//!
//! A package is anything with a stable name, a version, and a table of raw
//! resource identifiers mapping to bytes. Two implementations ship with the
//! crate: [`StaticPackage`] for tables compiled in with [`embed_package!`], and
//! [`DirectoryPackage`] for trees loaded from disk at runtime.

mod directory;
mod embedded;

use std::io::Read;
use std::sync::Arc;

pub use directory::DirectoryPackage;
pub use embedded::StaticPackage;

use crate::error::PackageError;
use crate::logging::{DebugLog, verbose};

/// Readable byte stream over a single embedded resource.
pub type ResourceStream<'a> = Box<dyn Read + Send + 'a>;

/// A compiled unit owning a set of embedded resources.
pub trait Package: Send + Sync {
    /// Stable package name, used as the namespace for collision resolution.
    fn name(&self) -> &str;

    /// Version string of the package.
    fn version(&self) -> &str;

    /// Raw resource identifiers declared by the package, in declaration order.
    ///
    /// Every call starts a fresh iteration.
    fn resource_names(&self) -> Result<Box<dyn Iterator<Item = &str> + '_>, PackageError>;

    /// Byte length of a resource.
    fn resource_len(&self, resource: &str) -> Result<u64, PackageError>;

    /// Open a resource for reading.
    fn open_resource(&self, resource: &str) -> Result<ResourceStream<'_>, PackageError>;
}

/// Shared handle to a package; packages live for the lifetime of the process.
pub type PackageRef = Arc<dyn Package>;

/// Types that know which package embeds them.
///
/// Hosts implement this on a component type so its owning package can be added
/// to the scan set without listing it explicitly.
pub trait PackageMarker {
    /// The package that owns the implementing type.
    fn package() -> PackageRef;
}

/// Build the effective package set from an explicit list and an optional marker package.
///
/// The marker package is appended only when no package with the same name is already listed.
pub fn resolve_packages(explicit: &[PackageRef], marker: Option<&PackageRef>) -> Vec<PackageRef> {
    let mut packages = explicit.to_vec();
    if let Some(marker) = marker
        && !packages.iter().any(|package| package.name() == marker.name())
    {
        packages.push(Arc::clone(marker));
    }
    packages
}

/// Enumerate the raw resource identifiers of a package without filtering.
///
/// With verbose logging on, the full list and the package name are traced first.
pub fn list_embedded_resources<'a>(
    package: &'a dyn Package,
    log: &DebugLog,
) -> Result<Box<dyn Iterator<Item = &'a str> + 'a>, PackageError> {
    let resources = package.resource_names()?;
    if !log.enabled() {
        return Ok(resources);
    }

    let listed: Vec<&str> = resources.collect();
    verbose!(log, "Got resources: {}", listed.join(", "));
    verbose!(log, package = package.name(), "Using package");
    Ok(Box::new(listed.into_iter()))
}

/// Read the whole resource as text, replacing invalid UTF-8 sequences.
pub fn read_resource_text(package: &dyn Package, resource: &str) -> Result<String, PackageError> {
    let mut bytes = Vec::new();
    package
        .open_resource(resource)?
        .read_to_end(&mut bytes)
        .map_err(|source| PackageError::Io {
            path: format!("{}/{}", package.name(), resource).into(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static WIDGETS: StaticPackage = StaticPackage::new(
        "Widgets",
        "1.0.0",
        &[
            ("Widgets.styles.css", b"body { color: red; }"),
            ("Widgets.app.js", b"console.log('hi');"),
        ],
    );

    static OTHER: StaticPackage = StaticPackage::new("Other", "2.0.0", &[]);

    fn widgets() -> PackageRef {
        Arc::new(WIDGETS.clone())
    }

    #[test]
    fn lists_resources_in_declaration_order() {
        let names: Vec<&str> = list_embedded_resources(&WIDGETS, &DebugLog::new(true))
            .unwrap()
            .collect();
        assert_eq!(names, vec!["Widgets.styles.css", "Widgets.app.js"]);
    }

    /// Wraps a package and counts how often it is enumerated.
    struct CountingPackage {
        inner: StaticPackage,
        enumerations: AtomicUsize,
    }

    impl Package for CountingPackage {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn version(&self) -> &str {
            self.inner.version()
        }

        fn resource_names(&self) -> Result<Box<dyn Iterator<Item = &str> + '_>, PackageError> {
            self.enumerations.fetch_add(1, Ordering::SeqCst);
            self.inner.resource_names()
        }

        fn resource_len(&self, resource: &str) -> Result<u64, PackageError> {
            self.inner.resource_len(resource)
        }

        fn open_resource(&self, resource: &str) -> Result<ResourceStream<'_>, PackageError> {
            self.inner.open_resource(resource)
        }
    }

    #[test]
    fn verbose_listing_enumerates_once() {
        for log in [DebugLog::new(true), DebugLog::quiet()] {
            let package = CountingPackage {
                inner: WIDGETS.clone(),
                enumerations: AtomicUsize::new(0),
            };
            let names: Vec<&str> = list_embedded_resources(&package, &log).unwrap().collect();
            assert_eq!(names, vec!["Widgets.styles.css", "Widgets.app.js"]);
            assert_eq!(package.enumerations.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn enumeration_is_restartable() {
        let first: Vec<&str> = WIDGETS.resource_names().unwrap().collect();
        let second: Vec<&str> = WIDGETS.resource_names().unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn marker_package_is_appended_once() {
        let explicit = vec![widgets()];
        let marker: PackageRef = Arc::new(OTHER.clone());

        let resolved = resolve_packages(&explicit, Some(&marker));
        let names: Vec<&str> = resolved.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Widgets", "Other"]);

        let duplicate = widgets();
        let resolved = resolve_packages(&explicit, Some(&duplicate));
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn resolves_marker_alone() {
        let marker = widgets();
        let resolved = resolve_packages(&[], Some(&marker));
        assert_eq!(resolved.len(), 1);
        assert!(resolve_packages(&[], None).is_empty());
    }

    #[test]
    fn reads_resource_text() {
        let text = read_resource_text(&WIDGETS, "Widgets.styles.css").unwrap();
        assert_eq!(text, "body { color: red; }");

        let missing = read_resource_text(&WIDGETS, "Widgets.nope.css");
        assert!(matches!(missing, Err(PackageError::MissingResource { .. })));
    }
}
