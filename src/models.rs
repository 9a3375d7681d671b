//! Data structures produced while injecting embedded assets into a page.

use serde::Serialize;

/// Kind of page element an embedded asset becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// A `<link rel="stylesheet">` element.
    Stylesheet,
    /// A `<script>` element.
    Script,
}

impl AssetKind {
    /// Classify an extension as produced by
    /// [`resource_extension`](crate::asset_paths::resource_extension).
    ///
    /// Only `.css` and `.js` are injectable; everything else yields `None`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".css" => Some(Self::Stylesheet),
            ".js" => Some(Self::Script),
            _ => None,
        }
    }

    /// Element tag used in the page.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Stylesheet => "link",
            Self::Script => "script",
        }
    }

    /// Attribute that holds the element's URL.
    pub fn url_attribute(self) -> &'static str {
        match self {
            Self::Stylesheet => "href",
            Self::Script => "src",
        }
    }

    /// MIME type of the blob the element is created from.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Stylesheet => "text/css",
            Self::Script => "text/javascript",
        }
    }
}

/// What a single injection pass did with one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectionOutcome {
    /// A new element was appended to the page.
    Attached,
    /// A matching element was already in the page; nothing was done.
    AlreadyPresent,
    /// The asset is blocked and its existing element was removed.
    Removed,
    /// The asset is blocked and was not present.
    Blocked,
    /// Reading the resource or talking to the page failed; details were logged.
    Failed,
}

/// Outcome for one embedded asset during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInjection {
    /// Name of the owning package.
    pub package: String,
    /// Raw resource identifier inside the package.
    pub resource: String,
    /// Element id the asset is tracked under.
    pub identity: String,
    /// Element kind the asset maps to.
    pub kind: AssetKind,
    /// Decision taken for the asset.
    pub outcome: InjectionOutcome,
}

/// Per-asset results of one injection pass, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionReport {
    /// Outcomes for every stylesheet or script that was considered.
    pub assets: Vec<AssetInjection>,
}

impl InjectionReport {
    /// Number of assets that ended with the given outcome.
    pub fn count(&self, outcome: InjectionOutcome) -> usize {
        self
            .assets
            .iter()
            .filter(|asset| asset.outcome == outcome)
            .count()
    }

    /// Look up the outcome recorded for an identity key.
    pub fn outcome_for(&self, identity: &str) -> Option<InjectionOutcome> {
        self
            .assets
            .iter()
            .find(|asset| asset.identity == identity)
            .map(|asset| asset.outcome)
    }
}
