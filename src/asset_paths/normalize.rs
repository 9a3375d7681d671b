use regex::Regex;

use crate::asset_paths::content::make_content_path;

fn three_part_identifier() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^:]*:[^:]*:([^:]*)$").expect("invalid three-part identifier regex")
    })
}

/// Names derived from a raw embedded resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResource {
    /// Lowercased extension including the leading dot, or empty.
    pub extension: String,
    /// Canonical short file name used as the cross-package lookup key.
    pub file_name: String,
    /// Relative URL the resource is expected at when served over HTTP.
    pub http_path: String,
}

/// Map a raw identifier to its extension, canonical file name and HTTP path.
///
/// Identifiers come in two shapes:
/// - `scheme:kind:file.ext` maps to `file.ext`, served at `_content/{package}/file.ext`;
/// - `Namespace.path.file.ext` maps to `file.ext` and is referenced by the identifier itself.
///
/// Anything else is handled best effort by looking at the text after the last colon.
pub fn normalize_resource_name(package_name: &str, resource_id: &str) -> NormalizedResource {
    let extension = resource_extension(resource_id);

    if let Some(captures) = three_part_identifier().captures(resource_id) {
        let file_name = captures
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        let http_path = make_content_path(package_name, &file_name);
        return NormalizedResource {
            extension,
            file_name,
            http_path,
        };
    }

    let tail = resource_id.rsplit(':').next().unwrap_or(resource_id);
    NormalizedResource {
        extension,
        file_name: dotted_file_name(tail),
        http_path: tail.to_string(),
    }
}

/// Lowercased extension of an identifier, including the dot.
pub fn resource_extension(resource_id: &str) -> String {
    let last_segment = resource_id
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or(resource_id);
    match last_segment.rfind('.') {
        Some(index) if index + 1 < last_segment.len() => last_segment[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Keep the last two dot-separated segments: `Widgets.css.site.css` becomes `site.css`.
fn dotted_file_name(identifier: &str) -> String {
    let mut segments = identifier.rsplitn(3, '.');
    match (segments.next(), segments.next()) {
        (Some(extension), Some(stem)) => format!("{stem}.{extension}"),
        _ => identifier.to_string(),
    }
}
