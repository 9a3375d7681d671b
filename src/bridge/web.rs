//! Bridge that manipulates the browser document directly through `web-sys`.

use async_trait::async_trait;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, HtmlHeadElement, HtmlLinkElement, HtmlScriptElement,
    Url,
};

use crate::bridge::{AssetQuery, DomBridge};
use crate::error::BridgeError;
use crate::models::AssetKind;

/// [`DomBridge`] for code running inside the page itself (wasm32).
#[derive(Debug, Clone, Default)]
pub struct WebDomBridge;

impl WebDomBridge {
    /// Bridge over the current window's document.
    pub fn new() -> Self {
        Self
    }

    fn document() -> Result<Document, BridgeError> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or(BridgeError::NoDocument)
    }

    fn head(document: &Document) -> Result<HtmlHeadElement, BridgeError> {
        document.head().ok_or(BridgeError::NoDocument)
    }

    fn find(query: &AssetQuery) -> Result<Option<Element>, BridgeError> {
        let document = Self::document()?;
        Self::head(&document)?
            .query_selector(&query.selector())
            .map_err(script_error)
    }

    fn object_url(content: &str, kind: AssetKind) -> Result<String, BridgeError> {
        let parts = Array::of1(&JsValue::from_str(content));
        let options = BlobPropertyBag::new();
        options.set_type(kind.mime_type());
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(script_error)?;
        Url::create_object_url_with_blob(&blob).map_err(script_error)
    }
}

fn script_error(error: JsValue) -> BridgeError {
    BridgeError::Script(
        error
            .as_string()
            .unwrap_or_else(|| format!("{error:?}")),
    )
}

#[async_trait(?Send)]
impl DomBridge for WebDomBridge {
    async fn asset_exists(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        Ok(Self::find(query)?.is_some())
    }

    async fn attach_link(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        let document = Self::document()?;
        let head = Self::head(&document)?;
        let href = Self::object_url(content, AssetKind::Stylesheet)?;

        let link: HtmlLinkElement = document
            .create_element("link")
            .map_err(script_error)?
            .dyn_into()
            .map_err(|element: Element| script_error(element.into()))?;
        link.set_rel("stylesheet");
        link.set_type(AssetKind::Stylesheet.mime_type());
        link.set_href(&href);
        link.set_id(id);

        head.append_child(&link).map_err(script_error)?;
        Ok(())
    }

    async fn attach_script(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        let document = Self::document()?;
        let head = Self::head(&document)?;
        let src = Self::object_url(content, AssetKind::Script)?;

        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(script_error)?
            .dyn_into()
            .map_err(|element: Element| script_error(element.into()))?;
        script.set_src(&src);
        script.set_id(id);

        head.append_child(&script).map_err(script_error)?;
        Ok(())
    }

    async fn remove_asset(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        let Some(element) = Self::find(query)? else {
            return Ok(false);
        };

        if let Some(link) = element.dyn_ref::<HtmlLinkElement>() {
            link.set_disabled(true);
        } else {
            element.set_attribute("disabled", "").map_err(script_error)?;
        }
        element.remove();
        Ok(true)
    }
}
