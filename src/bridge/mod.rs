//! Page asset bridge: existence checks, attachment and removal of page elements.
//!
//! [`DomBridge`] is the raw, fallible boundary to the page's scripting engine.
//! [`PageAssets`] wraps a bridge and turns every failure into a logged
//! "did not happen" so a single broken call never aborts an injection pass.

mod eval;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

use async_trait::async_trait;
use tracing::warn;

pub use eval::{EvalBridge, ScriptEvaluator};
pub use memory::{MemoryPage, PageElement};
#[cfg(target_arch = "wasm32")]
pub use web::WebDomBridge;

use crate::asset_paths::sanitize_identity;
use crate::error::BridgeError;
use crate::logging::{DebugLog, verbose};
use crate::models::AssetKind;

/// Selector inputs for locating an injected element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    /// Element kind to look for.
    pub kind: AssetKind,
    /// Sanitized element id.
    pub id: String,
    /// URL the element may reference instead (`href` for links, `src` for scripts).
    pub url: String,
}

impl AssetQuery {
    /// Build a query, sanitizing the identity key.
    pub fn new(kind: AssetKind, identity: &str, url: &str) -> Self {
        Self {
            kind,
            id: sanitize_identity(identity),
            url: url.to_string(),
        }
    }

    /// CSS selector matching the element by id or by URL, searched within `<head>`.
    ///
    /// `link[id='…'],link[href='…']` for stylesheets and
    /// `script[id='…'],script[src='…']` for scripts.
    pub fn selector(&self) -> String {
        let tag = self.kind.tag();
        format!(
            "{tag}[id='{}'],{tag}[{}='{}']",
            escape_attribute_value(&self.id),
            self.kind.url_attribute(),
            escape_attribute_value(&self.url)
        )
    }
}

/// Escape a value for use inside a single-quoted CSS attribute selector.
fn escape_attribute_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Raw operations against the page's document head.
///
/// Implementations report failures; callers decide how to tolerate them.
#[async_trait(?Send)]
pub trait DomBridge {
    /// Whether an element matching the query exists.
    async fn asset_exists(&self, query: &AssetQuery) -> Result<bool, BridgeError>;

    /// Append a `<link rel="stylesheet">` over a `text/css` blob of `content`.
    async fn attach_link(&self, id: &str, content: &str) -> Result<(), BridgeError>;

    /// Append a `<script>` over a `text/javascript` blob of `content`.
    async fn attach_script(&self, id: &str, content: &str) -> Result<(), BridgeError>;

    /// Disable and remove the first matching element; returns whether one was found.
    async fn remove_asset(&self, query: &AssetQuery) -> Result<bool, BridgeError>;
}

/// Failure-tolerant page operations used by the injection pass.
#[derive(Debug)]
pub struct PageAssets<B> {
    bridge: B,
    log: DebugLog,
}

impl<B: DomBridge> PageAssets<B> {
    /// Wrap a bridge.
    pub fn new(bridge: B, log: DebugLog) -> Self {
        Self { bridge, log }
    }

    /// The wrapped bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Whether a `<link>` with the identity's id or the given href exists.
    pub async fn link_exists(&self, identity: &str, http_path: &str) -> bool {
        self
            .exists(AssetQuery::new(AssetKind::Stylesheet, identity, http_path))
            .await
    }

    /// Whether a `<script>` with the identity's id or the given src exists.
    pub async fn script_exists(&self, identity: &str, http_path: &str) -> bool {
        self
            .exists(AssetQuery::new(AssetKind::Script, identity, http_path))
            .await
    }

    /// Attach a stylesheet built from `content`; returns whether it was attached.
    pub async fn attach_stylesheet(&self, identity: &str, content: &str) -> bool {
        self.attach(AssetKind::Stylesheet, identity, content).await
    }

    /// Attach a script built from `content`; returns whether it was attached.
    pub async fn attach_script(&self, identity: &str, content: &str) -> bool {
        self.attach(AssetKind::Script, identity, content).await
    }

    /// Disable and remove a matching `<link>`; returns whether one was removed.
    pub async fn remove_link(&self, identity: &str, http_path: &str) -> bool {
        self
            .remove(AssetQuery::new(AssetKind::Stylesheet, identity, http_path))
            .await
    }

    /// Disable and remove a matching `<script>`; returns whether one was removed.
    pub async fn remove_script(&self, identity: &str, http_path: &str) -> bool {
        self
            .remove(AssetQuery::new(AssetKind::Script, identity, http_path))
            .await
    }

    async fn exists(&self, query: AssetQuery) -> bool {
        verbose!(
            self.log,
            selector = %query.selector(),
            "Checking for existing {}",
            query.kind.tag()
        );
        let found = match self.bridge.asset_exists(&query).await {
            Ok(found) => found,
            Err(error) => {
                warn!(id = %query.id, %error, "Existence check failed; treating as absent");
                false
            }
        };
        verbose!(self.log, id = %query.id, found, "Existence check for {}", query.kind.tag());
        found
    }

    async fn attach(&self, kind: AssetKind, identity: &str, content: &str) -> bool {
        let id = sanitize_identity(identity);
        verbose!(self.log, %id, bytes = content.len(), "Attaching {}", kind.tag());
        let result = match kind {
            AssetKind::Stylesheet => self.bridge.attach_link(&id, content).await,
            AssetKind::Script => self.bridge.attach_script(&id, content).await,
        };

        match result {
            Ok(()) => true,
            Err(error) => {
                warn!(%id, %error, "Failed to attach {}", kind.tag());
                false
            }
        }
    }

    async fn remove(&self, query: AssetQuery) -> bool {
        let removed = match self.bridge.remove_asset(&query).await {
            Ok(removed) => removed,
            Err(error) => {
                warn!(id = %query.id, %error, "Failed to remove {}", query.kind.tag());
                false
            }
        };
        verbose!(self.log, id = %query.id, removed, "Remove {}", query.kind.tag());
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn selector_matches_id_or_url() {
        let query = AssetQuery::new(
            AssetKind::Stylesheet,
            "Widgets.blazor:css:site.css",
            "_content/Widgets/site.css",
        );
        assert_eq!(
            query.selector(),
            "link[id='Widgets.blazor_css_site.css'],link[href='_content/Widgets/site.css']"
        );

        let script = AssetQuery::new(AssetKind::Script, "Widgets.app.js", "Widgets.app.js");
        assert_eq!(
            script.selector(),
            "script[id='Widgets.app.js'],script[src='Widgets.app.js']"
        );
    }

    #[test]
    fn selector_escapes_quotes() {
        let query = AssetQuery::new(AssetKind::Script, "it's", "a\\b");
        assert_eq!(query.selector(), "script[id='it\\'s'],script[src='a\\\\b']");
    }

    /// Bridge whose every call fails, counting attempts.
    #[derive(Default)]
    struct BrokenBridge {
        calls: Cell<usize>,
    }

    impl BrokenBridge {
        fn fail<T>(&self) -> Result<T, BridgeError> {
            self.calls.set(self.calls.get() + 1);
            Err(BridgeError::Script("engine went away".into()))
        }
    }

    #[async_trait(?Send)]
    impl DomBridge for BrokenBridge {
        async fn asset_exists(&self, _query: &AssetQuery) -> Result<bool, BridgeError> {
            self.fail()
        }

        async fn attach_link(&self, _id: &str, _content: &str) -> Result<(), BridgeError> {
            self.fail()
        }

        async fn attach_script(&self, _id: &str, _content: &str) -> Result<(), BridgeError> {
            self.fail()
        }

        async fn remove_asset(&self, _query: &AssetQuery) -> Result<bool, BridgeError> {
            self.fail()
        }
    }

    #[test]
    fn failures_are_swallowed() {
        let assets = PageAssets::new(BrokenBridge::default(), DebugLog::new(true));

        block_on(async {
            assert!(!assets.link_exists("Widgets.site.css", "Widgets.site.css").await);
            assert!(!assets.script_exists("Widgets.app.js", "Widgets.app.js").await);
            assert!(!assets.attach_stylesheet("Widgets.site.css", "h1{}").await);
            assert!(!assets.attach_script("Widgets.app.js", "run()").await);
            assert!(!assets.remove_link("Widgets.site.css", "Widgets.site.css").await);
            assert!(!assets.remove_script("Widgets.app.js", "Widgets.app.js").await);
        });

        assert_eq!(assets.bridge().calls.get(), 6);
    }

    #[test]
    fn attaches_and_finds_elements_on_a_page() {
        let assets = PageAssets::new(MemoryPage::new(), DebugLog::quiet());
        let (identity, url) = ("Widgets.blazor:css:a.css", "_content/Widgets/a.css");

        block_on(async {
            assert!(!assets.link_exists(identity, url).await);
            assert!(assets.attach_stylesheet(identity, "a{}").await);
            assert!(assets.link_exists(identity, url).await);
            assert!(!assets.script_exists(identity, url).await);
            assert!(assets.remove_link(identity, url).await);
            assert!(!assets.link_exists(identity, url).await);
        });
    }
}
