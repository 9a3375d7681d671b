//! Packages whose resources are compiled into the binary.

use crate::error::PackageError;
use crate::package::{Package, ResourceStream};

/// A package backed by a static table of `(resource identifier, bytes)` pairs.
///
/// Usually produced with [`embed_package!`](crate::embed_package), which pulls
/// file contents in through `include_bytes!`.
#[derive(Debug, Clone)]
pub struct StaticPackage {
    name: &'static str,
    version: &'static str,
    resources: &'static [(&'static str, &'static [u8])],
}

impl StaticPackage {
    /// Create a package over a static resource table.
    pub const fn new(
        name: &'static str,
        version: &'static str,
        resources: &'static [(&'static str, &'static [u8])],
    ) -> Self {
        Self {
            name,
            version,
            resources,
        }
    }

    fn lookup(&self, resource: &str) -> Result<&'static [u8], PackageError> {
        self
            .resources
            .iter()
            .find(|(id, _)| *id == resource)
            .map(|(_, bytes)| *bytes)
            .ok_or_else(|| PackageError::MissingResource {
                package: self.name.to_string(),
                resource: resource.to_string(),
            })
    }
}

impl Package for StaticPackage {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> &str {
        self.version
    }

    fn resource_names(&self) -> Result<Box<dyn Iterator<Item = &str> + '_>, PackageError> {
        Ok(Box::new(self.resources.iter().map(|(id, _)| *id)))
    }

    fn resource_len(&self, resource: &str) -> Result<u64, PackageError> {
        Ok(self.lookup(resource)?.len() as u64)
    }

    fn open_resource(&self, resource: &str) -> Result<ResourceStream<'_>, PackageError> {
        Ok(Box::new(self.lookup(resource)?))
    }
}

/// Declare a [`StaticPackage`] whose resources are embedded with `include_bytes!`.
///
/// Paths are resolved relative to the file invoking the macro, as with `include_bytes!`.
///
/// ```ignore
/// static WIDGETS: StaticPackage = embed_package!("Widgets", "1.0.0", {
///     "Widgets.styles.css" => "../assets/styles.css",
///     "blazor:js:widgets.js" => "../assets/widgets.js",
/// });
/// ```
#[macro_export]
macro_rules! embed_package {
    ($name:expr, $version:expr, { $($resource:expr => $path:expr),* $(,)? }) => {
        $crate::package::StaticPackage::new(
            $name,
            $version,
            &[$(($resource, include_bytes!($path) as &'static [u8])),*],
        )
    };
}
