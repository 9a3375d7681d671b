//! Injection orchestrator that attaches embedded stylesheets and scripts to the page.

use tracing::warn;

use crate::asset_paths::{identity_key, normalize_resource_name};
use crate::bridge::{DomBridge, PageAssets};
use crate::config::EmbedOptions;
use crate::lifecycle::{RenderMode, RenderSignal};
use crate::logging::{DebugLog, verbose};
use crate::models::{AssetInjection, AssetKind, InjectionOutcome, InjectionReport};
use crate::package::{Package, PackageRef, list_embedded_resources, read_resource_text};
use crate::selection::BlockRules;

/// Drives the one-shot injection pass for a page.
///
/// The pass runs the first time [`after_render`](Self::after_render) observes an
/// interactive page. Every asset's presence is re-queried from the page before
/// acting on it, so running [`inject`](Self::inject) again never duplicates elements.
pub struct EmbeddedContent<B> {
    assets: PageAssets<B>,
    packages: Vec<PackageRef>,
    blocking: BlockRules,
    log: DebugLog,
    mode: RenderMode,
    has_run: bool,
}

impl<B: DomBridge> EmbeddedContent<B> {
    /// Create an orchestrator over `bridge`, resolving the package set from `options`.
    pub fn new(bridge: B, options: &EmbedOptions) -> Self {
        let log = options.config.debug_log();
        Self {
            assets: PageAssets::new(bridge, log),
            packages: options.resolved_packages(),
            blocking: options.config.block_rules(),
            log,
            mode: RenderMode::Prerendering,
            has_run: false,
        }
    }

    /// Packages scanned by the pass, in order.
    pub fn packages(&self) -> &[PackageRef] {
        &self.packages
    }

    /// The page bridge.
    pub fn bridge(&self) -> &B {
        self.assets.bridge()
    }

    /// Current lifecycle state.
    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether the one-shot pass has already started.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Replace the stylesheet block rules used by later passes.
    pub fn set_block_rules(&mut self, rules: BlockRules) {
        self.blocking = rules;
    }

    /// Host hook called after every render.
    ///
    /// Moves to [`RenderMode::Interactive`] once the signal says so (or cannot tell),
    /// then runs the injection pass exactly once. Returns the report of that pass.
    pub async fn after_render<S: RenderSignal + ?Sized>(
        &mut self,
        signal: &S,
    ) -> Option<InjectionReport> {
        if self.mode == RenderMode::Prerendering && signal.is_interactive() {
            verbose!(self.log, "Page is interactive");
            self.mode = RenderMode::Interactive;
        }

        if self.mode != RenderMode::Interactive || self.has_run {
            return None;
        }

        self.has_run = true;
        Some(self.inject().await)
    }

    /// Run one injection pass over every package regardless of lifecycle state.
    pub async fn inject(&self) -> InjectionReport {
        let mut report = InjectionReport::default();

        for package in &self.packages {
            let resources = match list_embedded_resources(package.as_ref(), &self.log) {
                Ok(resources) => resources,
                Err(error) => {
                    warn!(
                        package = package.name(),
                        %error,
                        "Skipping package that cannot be enumerated"
                    );
                    continue;
                }
            };

            for resource in resources {
                if let Some(asset) = self.inject_resource(package.as_ref(), resource).await {
                    report.assets.push(asset);
                }
            }
        }

        report
    }

    async fn inject_resource(
        &self,
        package: &dyn Package,
        resource: &str,
    ) -> Option<AssetInjection> {
        let package_name = package.name();
        let normalized = normalize_resource_name(package_name, resource);
        verbose!(self.log, "Extension: [{}]", normalized.extension);

        let kind = AssetKind::from_extension(&normalized.extension)?;
        let identity = identity_key(package_name, resource);
        let http_path = normalized.http_path.as_str();

        let link_exists = self.assets.link_exists(&identity, http_path).await;
        let script_exists = self.assets.script_exists(&identity, http_path).await;

        let outcome = if self
            .blocking
            .should_block(package_name, resource, &normalized.extension)
        {
            if !link_exists {
                InjectionOutcome::Blocked
            } else if self.assets.remove_link(&identity, http_path).await {
                InjectionOutcome::Removed
            } else {
                InjectionOutcome::Failed
            }
        } else if link_exists || script_exists {
            InjectionOutcome::AlreadyPresent
        } else {
            self.attach(package, resource, kind, &identity).await
        };

        verbose!(self.log, %identity, ?outcome, "Processed embedded asset");
        Some(AssetInjection {
            package: package_name.to_string(),
            resource: resource.to_string(),
            identity,
            kind,
            outcome,
        })
    }

    async fn attach(
        &self,
        package: &dyn Package,
        resource: &str,
        kind: AssetKind,
        identity: &str,
    ) -> InjectionOutcome {
        let content = match read_resource_text(package, resource) {
            Ok(content) => content,
            Err(error) => {
                warn!(package = package.name(), resource, %error, "Failed to read embedded asset");
                return InjectionOutcome::Failed;
            }
        };
        verbose!(self.log, bytes = content.len(), "Content for {resource}");

        let attached = match kind {
            AssetKind::Stylesheet => self.assets.attach_stylesheet(identity, &content).await,
            AssetKind::Script => self.assets.attach_script(identity, &content).await,
        };

        if attached {
            InjectionOutcome::Attached
        } else {
            InjectionOutcome::Failed
        }
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for EmbeddedContent<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedContent")
            .field("assets", &self.assets)
            .field(
                "packages",
                &self.packages.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("blocking", &self.blocking)
            .field("mode", &self.mode)
            .field("has_run", &self.has_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::executor::block_on;

    use super::*;
    use crate::bridge::MemoryPage;
    use crate::config::EmbedConfig;
    use crate::package::StaticPackage;

    static WIDGETS: StaticPackage = StaticPackage::new(
        "Widgets",
        "1.0.0",
        &[
            ("Widgets.styles.css", b"h1 { color: red; }"),
            ("blazor:js:widgets.js", b"window.widgets = true;"),
            ("Widgets.logo.png", b"\x89PNG"),
        ],
    );

    fn options(block: &[&str]) -> EmbedOptions {
        EmbedOptions::new(EmbedConfig {
            debug_logging: true,
            block_css_files: block.iter().map(|rule| rule.to_string()).collect(),
        })
        .with_package(Arc::new(WIDGETS.clone()))
    }

    #[test]
    fn waits_for_an_interactive_page() {
        let mut content = EmbeddedContent::new(MemoryPage::new(), &options(&[]));

        assert!(block_on(content.after_render(&RenderMode::Prerendering)).is_none());
        assert!(!content.has_run());
        assert!(content.bridge().elements().is_empty());

        let report = block_on(content.after_render(&RenderMode::Interactive)).unwrap();
        assert_eq!(report.count(InjectionOutcome::Attached), 2);
        assert!(content.has_run());

        assert!(block_on(content.after_render(&RenderMode::Interactive)).is_none());
        assert_eq!(content.bridge().elements().len(), 2);
    }

    #[test]
    fn undeterminable_mode_runs_immediately() {
        let mut content = EmbeddedContent::new(MemoryPage::new(), &options(&[]));
        let report = block_on(content.after_render(&None::<RenderMode>));
        assert!(report.is_some());
        assert_eq!(content.render_mode(), RenderMode::Interactive);
    }

    #[test]
    fn interactive_state_is_terminal() {
        let mut content = EmbeddedContent::new(MemoryPage::new(), &options(&[]));
        block_on(content.after_render(&RenderMode::Interactive));
        block_on(content.after_render(&RenderMode::Prerendering));
        assert_eq!(content.render_mode(), RenderMode::Interactive);
    }

    #[test]
    fn skips_non_injectable_resources() {
        let content = EmbeddedContent::new(MemoryPage::new(), &options(&[]));
        let report = block_on(content.inject());

        let resources: Vec<&str> = report.assets.iter().map(|a| a.resource.as_str()).collect();
        assert_eq!(resources, vec!["Widgets.styles.css", "blazor:js:widgets.js"]);
    }

    #[test]
    fn script_identity_replaces_colons() {
        let content = EmbeddedContent::new(MemoryPage::new(), &options(&[]));
        block_on(content.inject());

        let script = content
            .bridge()
            .element_by_id("Widgets.blazor_js_widgets.js")
            .unwrap();
        assert_eq!(script.kind, AssetKind::Script);
        let (mime, body) = content.bridge().blob(&script.url).unwrap();
        assert_eq!(mime, "text/javascript");
        assert_eq!(body, "window.widgets = true;");
    }

    #[test]
    fn host_rendered_assets_are_not_duplicated() {
        let page = MemoryPage::new();
        page.insert(AssetKind::Script, None, "_content/Widgets/widgets.js");
        let content = EmbeddedContent::new(page, &options(&[]));

        let report = block_on(content.inject());
        assert_eq!(
            report.outcome_for("Widgets.blazor_js_widgets.js"),
            Some(InjectionOutcome::AlreadyPresent)
        );
        assert_eq!(content.bridge().count(AssetKind::Script), 1);
    }

    #[test]
    fn blocked_stylesheets_are_never_attached() {
        let content = EmbeddedContent::new(MemoryPage::new(), &options(&["Widgets,styles.css"]));
        let report = block_on(content.inject());

        assert_eq!(
            report.outcome_for("Widgets.Widgets.styles.css"),
            Some(InjectionOutcome::Blocked)
        );
        assert_eq!(content.bridge().count(AssetKind::Stylesheet), 0);
    }

    #[test]
    fn blocked_host_stylesheets_are_removed() {
        let page = MemoryPage::new();
        page.insert(AssetKind::Stylesheet, None, "Widgets.styles.css");
        let content = EmbeddedContent::new(page, &options(&["styles.css"]));

        let report = block_on(content.inject());
        assert_eq!(report.count(InjectionOutcome::Removed), 1);
        assert_eq!(content.bridge().count(AssetKind::Stylesheet), 0);
        assert!(content.bridge().removed()[0].disabled);
    }
}
