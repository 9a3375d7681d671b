//! In-memory page used by headless hosts and tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::bridge::{AssetQuery, DomBridge};
use crate::error::BridgeError;
use crate::models::AssetKind;

/// An element in the simulated `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    /// Element kind.
    pub kind: AssetKind,
    /// `id` attribute, when set.
    pub id: Option<String>,
    /// `href` for links, `src` for scripts.
    pub url: String,
    /// Whether the element was disabled before removal.
    pub disabled: bool,
}

impl PageElement {
    fn matches(&self, query: &AssetQuery) -> bool {
        self.kind == query.kind
            && (self.id.as_deref() == Some(query.id.as_str()) || self.url == query.url)
    }
}

#[derive(Debug, Clone)]
struct BlobRecord {
    mime_type: String,
    content: String,
}

#[derive(Debug, Default)]
struct PageState {
    head: Vec<PageElement>,
    removed: Vec<PageElement>,
    blobs: HashMap<String, BlobRecord>,
    next_blob: usize,
}

/// A document head kept in memory, following the same matching rules as a browser page.
///
/// Attached content is stored behind `blob:memory/{n}` object URLs.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: RefCell<PageState>,
}

impl MemoryPage {
    /// Empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element as if the host page had rendered it.
    pub fn insert(&self, kind: AssetKind, id: Option<&str>, url: &str) {
        self.state.borrow_mut().head.push(PageElement {
            kind,
            id: id.map(str::to_string),
            url: url.to_string(),
            disabled: false,
        });
    }

    /// Elements currently in the head, in document order.
    pub fn elements(&self) -> Vec<PageElement> {
        self.state.borrow().head.clone()
    }

    /// Elements that were disabled and removed, in removal order.
    pub fn removed(&self) -> Vec<PageElement> {
        self.state.borrow().removed.clone()
    }

    /// Number of head elements of a kind.
    pub fn count(&self, kind: AssetKind) -> usize {
        self.state
            .borrow()
            .head
            .iter()
            .filter(|element| element.kind == kind)
            .count()
    }

    /// Element with the given id.
    pub fn element_by_id(&self, id: &str) -> Option<PageElement> {
        self.state
            .borrow()
            .head
            .iter()
            .find(|element| element.id.as_deref() == Some(id))
            .cloned()
    }

    /// MIME type and content of an object URL created by this page.
    pub fn blob(&self, url: &str) -> Option<(String, String)> {
        self.state
            .borrow()
            .blobs
            .get(url)
            .map(|blob| (blob.mime_type.clone(), blob.content.clone()))
    }

    fn attach(&self, kind: AssetKind, id: &str, content: &str) {
        let mut state = self.state.borrow_mut();
        state.next_blob += 1;
        let url = format!("blob:memory/{}", state.next_blob);
        state.blobs.insert(url.clone(), BlobRecord {
            mime_type: kind.mime_type().to_string(),
            content: content.to_string(),
        });
        state.head.push(PageElement {
            kind,
            id: Some(id.to_string()),
            url,
            disabled: false,
        });
    }
}

#[async_trait(?Send)]
impl DomBridge for MemoryPage {
    async fn asset_exists(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        Ok(self.state.borrow().head.iter().any(|element| element.matches(query)))
    }

    async fn attach_link(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        self.attach(AssetKind::Stylesheet, id, content);
        Ok(())
    }

    async fn attach_script(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        self.attach(AssetKind::Script, id, content);
        Ok(())
    }

    async fn remove_asset(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.head.iter().position(|element| element.matches(query)) else {
            return Ok(false);
        };

        let mut element = state.head.remove(index);
        element.disabled = true;
        state.removed.push(element);
        Ok(true)
    }
}
