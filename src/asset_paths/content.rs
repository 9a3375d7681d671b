/// Reserved first path segment under which packaged static content is served.
pub const CONTENT_ROOT: &str = "_content";

/// Produce the URL path an embedded file is served at: `_content/{package}/{file}`.
///
/// The result is relative (no leading slash) and always uses forward slashes, since the
/// static-file layer and the page both match it textually.
pub fn make_content_path(package_name: &str, file_name: &str) -> String {
    format!("{CONTENT_ROOT}/{package_name}/{file_name}").replace('\\', "/")
}
