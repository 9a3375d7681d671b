//! Directory scanning that turns an asset tree on disk into a package.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::PackageError;
use crate::package::{Package, ResourceStream};

/// A package whose resources are the files of a directory tree.
///
/// Resource identifiers follow the dotted manifest-resource convention:
/// `{package}.{relative.path.with.dots}`, so `css/site.css` in package `Widgets`
/// becomes `Widgets.css.site.css`. Files are read lazily on access.
#[derive(Debug, Clone)]
pub struct DirectoryPackage {
    name: String,
    version: String,
    root: PathBuf,
    resources: Vec<(String, PathBuf)>,
}

impl DirectoryPackage {
    /// Scan `root` recursively, skipping hidden entries.
    pub fn load(
        name: impl Into<String>,
        version: impl Into<String>,
        root: impl AsRef<Path>,
    ) -> Result<Self, PackageError> {
        let name = name.into();
        let root = root.as_ref().to_path_buf();
        let mut resources = Vec::new();
        collect_resources_recursively(&name, &root, Path::new(""), &mut resources)?;

        Ok(Self {
            name,
            version: version.into(),
            root,
            resources,
        })
    }

    /// Directory the package was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lookup(&self, resource: &str) -> Result<&Path, PackageError> {
        self.resources
            .iter()
            .find(|(id, _)| id == resource)
            .map(|(_, path)| path.as_path())
            .ok_or_else(|| PackageError::MissingResource {
                package: self.name.clone(),
                resource: resource.to_string(),
            })
    }
}

impl Package for DirectoryPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn resource_names(&self) -> Result<Box<dyn Iterator<Item = &str> + '_>, PackageError> {
        Ok(Box::new(self.resources.iter().map(|(id, _)| id.as_str())))
    }

    fn resource_len(&self, resource: &str) -> Result<u64, PackageError> {
        let path = self.lookup(resource)?;
        fs::metadata(path)
            .map(|metadata| metadata.len())
            .map_err(|source| PackageError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn open_resource(&self, resource: &str) -> Result<ResourceStream<'_>, PackageError> {
        let path = self.lookup(resource)?;
        let file = File::open(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(file))
    }
}

/// Walk `dir` collecting `(identifier, path)` pairs in sorted order.
fn collect_resources_recursively(
    package_name: &str,
    dir: &Path,
    relative_root: &Path,
    resources: &mut Vec<(String, PathBuf)>,
) -> Result<(), PackageError> {
    let io_error = |source| PackageError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let name_str = file_name.to_string_lossy();
        if name_str.starts_with('.') {
            continue;
        }

        let next_relative = relative_root.join(&file_name);
        let file_type = entry.file_type().map_err(io_error)?;
        if file_type.is_dir() {
            collect_resources_recursively(package_name, &entry.path(), &next_relative, resources)?;
        } else if file_type.is_file() {
            let dotted = next_relative
                .to_string_lossy()
                .replace(['\\', '/'], ".");
            resources.push((format!("{package_name}.{dotted}"), entry.path()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn collects_dotted_identifiers_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("css/site.css"), "body {}").unwrap();
        fs::write(root.join("app.js"), "run();").unwrap();
        fs::write(root.join(".cache/ignored.css"), "nope").unwrap();

        let package = DirectoryPackage::load("Widgets", "1.0.0", root).unwrap();
        let names: Vec<&str> = package.resource_names().unwrap().collect();

        assert_eq!(names, vec!["Widgets.app.js", "Widgets.css.site.css"]);
        assert_eq!(package.resource_len("Widgets.css.site.css").unwrap(), 7);
    }

    #[test]
    fn reads_files_lazily() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "before").unwrap();
        let package = DirectoryPackage::load("Widgets", "1.0.0", dir.path()).unwrap();

        fs::write(dir.path().join("app.js"), "after").unwrap();
        let mut text = String::new();
        package
            .open_resource("Widgets.app.js")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "after");
    }

    #[test]
    fn fails_for_missing_directories() {
        let dir = tempdir().unwrap();
        let error = DirectoryPackage::load("Widgets", "1.0.0", dir.path().join("missing"));
        assert!(matches!(error, Err(PackageError::Io { .. })));
    }
}
