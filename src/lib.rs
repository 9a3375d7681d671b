#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod bridge;
pub mod config;
pub mod error;
pub mod injector;
pub mod lifecycle;
mod logging;
pub mod models;
pub mod package;
pub mod provider;
pub mod selection;

pub use bridge::{DomBridge, EvalBridge, MemoryPage, PageAssets, ScriptEvaluator};
#[cfg(target_arch = "wasm32")]
pub use bridge::WebDomBridge;
pub use config::{EmbedConfig, EmbedOptions};
pub use error::{BridgeError, PackageError, ProviderError};
pub use injector::EmbeddedContent;
pub use lifecycle::{RenderMode, RenderSignal};
pub use logging::DebugLog;
pub use package::{DirectoryPackage, Package, PackageMarker, PackageRef, StaticPackage};
pub use provider::{DirectoryContents, FileInfo, VirtualFileProvider};
pub use selection::{BlockRules, CssBlocking};
