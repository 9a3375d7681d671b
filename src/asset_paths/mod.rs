//! Helpers for naming embedded resources.
//!
//! Normalisation, element identity and served URL paths are kept in separate
//! submodules so each convention can be tested on its own. Both the injection
//! pass and the virtual file provider depend on these exact spellings.

mod content;
mod identity;
mod normalize;

pub use content::{CONTENT_ROOT, make_content_path};
pub use identity::{identity_key, sanitize_identity};
pub use normalize::{NormalizedResource, normalize_resource_name, resource_extension};
