//! Bridge over a generic "evaluate this expression" channel to the page.
//!
//! Hosts that drive a browser from another process (webviews, remote
//! renderers) usually only expose script evaluation. Every argument is passed
//! as a JSON literal into a fixed function body, so content never has to be
//! escaped by hand.

use async_trait::async_trait;
use serde_json::Value;

use crate::bridge::{AssetQuery, DomBridge};
use crate::error::BridgeError;
use crate::models::AssetKind;

/// Channel that evaluates a script in the page and returns its JSON result.
#[async_trait(?Send)]
pub trait ScriptEvaluator {
    /// Evaluate `script` and return the value it produced.
    async fn evaluate(&self, script: &str) -> Result<Value, BridgeError>;
}

const EXISTS_BODY: &str =
    "function(selector){return document.head.querySelector(selector)!==null;}";

const ATTACH_LINK_BODY: &str = "function(id,content,mime){\
var blob=new Blob([content],{type:mime});\
var link=document.createElement('link');\
link.rel='stylesheet';link.type=mime;link.href=URL.createObjectURL(blob);link.id=id;\
document.head.appendChild(link);return true;}";

const ATTACH_SCRIPT_BODY: &str = "function(id,content,mime){\
var blob=new Blob([content],{type:mime});\
var script=document.createElement('script');\
script.src=URL.createObjectURL(blob);script.id=id;\
document.head.appendChild(script);return true;}";

const REMOVE_BODY: &str = "function(selector){\
var el=document.head.querySelector(selector);\
if(el===null){return false;}\
el.disabled=true;el.remove();return true;}";

/// [`DomBridge`] that builds parameterized calls for a [`ScriptEvaluator`].
#[derive(Debug)]
pub struct EvalBridge<E> {
    evaluator: E,
}

impl<E: ScriptEvaluator> EvalBridge<E> {
    /// Wrap an evaluation channel.
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    /// The wrapped channel.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    async fn call(&self, body: &str, args: &[&str]) -> Result<Value, BridgeError> {
        let script = invocation(body, args)?;
        self.evaluator.evaluate(&script).await
    }
}

/// Render `(body)(arg0,arg1,…)` with every argument JSON-encoded.
fn invocation(body: &str, args: &[&str]) -> Result<String, BridgeError> {
    let encoded = args
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({body})({})", encoded.join(",")))
}

fn expect_bool(value: Value) -> Result<bool, BridgeError> {
    match value {
        Value::Bool(flag) => Ok(flag),
        Value::Null => Ok(false),
        other => Err(BridgeError::UnexpectedReply(other)),
    }
}

#[async_trait(?Send)]
impl<E: ScriptEvaluator> DomBridge for EvalBridge<E> {
    async fn asset_exists(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        let selector = query.selector();
        expect_bool(self.call(EXISTS_BODY, &[selector.as_str()]).await?)
    }

    async fn attach_link(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        let mime = AssetKind::Stylesheet.mime_type();
        self.call(ATTACH_LINK_BODY, &[id, content, mime]).await?;
        Ok(())
    }

    async fn attach_script(&self, id: &str, content: &str) -> Result<(), BridgeError> {
        let mime = AssetKind::Script.mime_type();
        self.call(ATTACH_SCRIPT_BODY, &[id, content, mime]).await?;
        Ok(())
    }

    async fn remove_asset(&self, query: &AssetQuery) -> Result<bool, BridgeError> {
        let selector = query.selector();
        expect_bool(self.call(REMOVE_BODY, &[selector.as_str()]).await?)
    }
}
