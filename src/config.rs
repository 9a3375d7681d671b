//! Configuration for the injection pass: verbosity, block rules and package set.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::logging::DebugLog;
use crate::package::{PackageMarker, PackageRef, resolve_packages};
use crate::selection::BlockRules;

const DEFAULT_CONFIG_FILE: &str = "embedded-content.json";

/// Serializable options recognised by the injection pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Emit verbose traces for every enumeration and injection decision.
    pub debug_logging: bool,
    /// Stylesheet block rules, `Package,fragment` or bare `fragment`.
    pub block_css_files: Vec<String>,
}

impl EmbedConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or malformed file falls back to defaults so hosts can keep running.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file, ignoring failures.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::load(path).ok()
    }

    /// Read configuration from a specific JSON file, reporting failures.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Verbosity handle for the components built from this configuration.
    pub fn debug_log(&self) -> DebugLog {
        DebugLog::new(self.debug_logging)
    }

    /// Parsed block rules.
    pub fn block_rules(&self) -> BlockRules {
        BlockRules::new(&self.block_css_files)
    }
}

/// Configuration joined with the runtime package handles to scan.
#[derive(Clone, Default)]
pub struct EmbedOptions {
    /// Serializable options.
    pub config: EmbedConfig,
    /// Explicit packages, scanned in order.
    pub packages: Vec<PackageRef>,
    /// Package owning a designated marker type, added when not already listed.
    pub marker: Option<PackageRef>,
}

impl EmbedOptions {
    /// Start from a configuration with no packages.
    pub fn new(config: EmbedConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append an explicit package.
    pub fn with_package(mut self, package: PackageRef) -> Self {
        self.packages.push(package);
        self
    }

    /// Use the package that embeds `T` as the marker package.
    pub fn with_marker<T: PackageMarker>(mut self) -> Self {
        self.marker = Some(T::package());
        self
    }

    /// The effective package set, explicit packages first.
    pub fn resolved_packages(&self) -> Vec<PackageRef> {
        resolve_packages(&self.packages, self.marker.as_ref())
    }
}

impl std::fmt::Debug for EmbedOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedOptions")
            .field("config", &self.config)
            .field(
                "packages",
                &self.packages.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("marker", &self.marker.as_ref().map(|p| p.name()))
            .finish()
    }
}
