/// Build the element id an injected asset is tagged with: `{package}.{resource}`.
///
/// Colons are not valid in the selector syntax the page is queried with, so they are
/// replaced with underscores. The same key is used for creation, lookup and removal.
pub fn identity_key(package_name: &str, resource_id: &str) -> String {
    sanitize_identity(&format!("{package_name}.{resource_id}"))
}

/// Replace characters that cannot appear in an element id query.
pub fn sanitize_identity(name: &str) -> String {
    name.replace(':', "_")
}
