//! Directory listings over a single package's embedded resources.

use crate::provider::file_info::FileInfo;

/// Result of a directory query: the files of one package, or nothing.
#[derive(Debug, Clone)]
pub enum DirectoryContents {
    /// Files embedded in the named package, in enumeration order.
    Package {
        /// Package the listing was produced for.
        name: String,
        /// One entry per embedded resource; never nested directories.
        entries: Vec<FileInfo>,
    },
    /// The path does not name a virtual directory.
    NotFound,
}

impl DirectoryContents {
    /// Whether the directory exists.
    pub fn exists(&self) -> bool {
        matches!(self, Self::Package { .. })
    }

    /// Entries of the listing; empty when not found.
    pub fn entries(&self) -> &[FileInfo] {
        match self {
            Self::Package { entries, .. } => entries,
            Self::NotFound => &[],
        }
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, FileInfo> {
        self.entries().iter()
    }
}

impl<'a> IntoIterator for &'a DirectoryContents {
    type Item = &'a FileInfo;
    type IntoIter = std::slice::Iter<'a, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Listing name of a raw identifier: colons act as path separators.
///
/// `blazor:js:site.js` lists as `site.js`; dotted identifiers list under their full name.
pub(crate) fn listing_name(resource_id: &str) -> &str {
    resource_id.rsplit([':', '/']).next().unwrap_or(resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_listing_is_empty() {
        let listing = DirectoryContents::NotFound;
        assert!(!listing.exists());
        assert!(listing.entries().is_empty());
        assert_eq!(listing.iter().count(), 0);
    }

    #[test]
    fn listing_names_treat_colons_as_separators() {
        assert_eq!(listing_name("blazor:js:site.js"), "site.js");
        assert_eq!(listing_name("Widgets.styles.css"), "Widgets.styles.css");
    }
}
