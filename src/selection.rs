//! Rules deciding which embedded stylesheets are blocked from the page.

use serde::Deserialize;

/// Trait describing block filters for embedded stylesheets.
pub trait CssBlocking {
    /// Returns `true` when the resource must be kept out of the page.
    fn should_block(&self, package_name: &str, resource_id: &str, extension: &str) -> bool;
}

/// A single parsed block rule.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockRule {
    /// `Package,fragment`: the package must match and the resource contain the fragment.
    Scoped { package: String, fragment: String },
    /// `fragment`: any resource containing the fragment, from any package.
    Anywhere(String),
}

impl BlockRule {
    /// Parse a raw rule, splitting on the first comma. Blank rules yield `None`.
    fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        let rule = match raw.split_once(',') {
            Some((package, fragment)) => Self::Scoped {
                package: package.to_lowercase(),
                fragment: fragment.to_lowercase(),
            },
            None => Self::Anywhere(raw.to_lowercase()),
        };
        Some(rule)
    }

    fn matches(&self, package_name: &str, resource_id: &str) -> bool {
        let resource = resource_id.to_lowercase();
        match self {
            Self::Scoped { package, fragment } => {
                package_name.to_lowercase() == *package && resource.contains(fragment.as_str())
            }
            Self::Anywhere(fragment) => resource.contains(fragment.as_str()),
        }
    }
}

/// Configured list of stylesheet block rules.
///
/// Rules read `Package.Name,fragment` to block resources of one package whose
/// identifier contains `fragment`, or just `fragment` to block it from every
/// package. Matching is case-insensitive and only ever applies to `.css`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct BlockRules {
    rules: Vec<BlockRule>,
}

impl BlockRules {
    /// Parse rules from raw strings, discarding blank entries.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: rules
                .into_iter()
                .filter_map(|rule| BlockRule::parse(rule.as_ref()))
                .collect(),
        }
    }

    /// Returns true when no rules are active.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Determine whether a resource is blocked.
    pub fn should_block(&self, package_name: &str, resource_id: &str, extension: &str) -> bool {
        if !extension.eq_ignore_ascii_case(".css") {
            return false;
        }

        self
            .rules
            .iter()
            .any(|rule| rule.matches(package_name, resource_id))
    }
}

impl CssBlocking for BlockRules {
    fn should_block(&self, package_name: &str, resource_id: &str, extension: &str) -> bool {
        BlockRules::should_block(self, package_name, resource_id, extension)
    }
}

impl From<Vec<String>> for BlockRules {
    fn from(rules: Vec<String>) -> Self {
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_rules_block_nothing() {
        let rules = BlockRules::default();
        assert!(rules.is_empty());
        assert!(!rules.should_block("PkgA", "PkgA.foo.css", ".css"));
    }

    #[test]
    fn scoped_rule_matches_only_its_package() {
        let rules = BlockRules::new(["PkgA,foo.css"]);

        assert!(rules.should_block("PkgA", "PkgA.foo.css", ".css"));
        assert!(!rules.should_block("PkgB", "PkgB.foo.css", ".css"));
        assert!(!rules.should_block("PkgA", "PkgA.bar.css", ".css"));
    }

    #[test]
    fn bare_rule_matches_any_package() {
        let rules = BlockRules::new(["foo.css"]);

        assert!(rules.should_block("PkgA", "PkgA.foo.css", ".css"));
        assert!(rules.should_block("PkgB", "blazor:css:foo.css", ".css"));
        assert!(!rules.should_block("PkgB", "PkgB.bar.css", ".css"));
    }

    #[test]
    fn matching_ignores_case() {
        let rules = BlockRules::new(["blazored.TOAST,Styles.css"]);
        assert!(rules.should_block("Blazored.Toast", "Blazored.Toast.styles.CSS", ".css"));
    }

    #[test]
    fn only_stylesheets_are_blockable() {
        let rules = BlockRules::new(["app"]);
        assert!(!rules.should_block("PkgA", "PkgA.app.js", ".js"));
        assert!(rules.should_block("PkgA", "PkgA.app.css", ".css"));
    }

    #[test]
    fn blank_rules_are_discarded() {
        let rules = BlockRules::new(["", "   ", "\t"]);
        assert!(rules.is_empty());
    }

    #[test]
    fn splits_on_first_comma_only() {
        let rules = BlockRules::new(["PkgA,odd,name.css"]);
        assert!(rules.should_block("PkgA", "PkgA.odd,name.css", ".css"));
        assert!(!rules.should_block("PkgA", "PkgA.odd.css", ".css"));
    }

    #[test]
    fn deserializes_from_a_string_list() {
        let rules: BlockRules = serde_json::from_str(r#"["PkgA,foo.css", ""]"#).unwrap();
        assert!(rules.should_block("PkgA", "PkgA.foo.css", ".css"));
        assert!(!rules.is_empty());
    }

    fn package_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z.]{0,10}"
    }

    fn fragment() -> impl Strategy<Value = String> {
        "[a-z]{1,6}\\.css"
    }

    proptest! {
        #[test]
        fn scoped_rules_match_their_package_in_any_case(
            package in package_name(),
            other in package_name(),
            prefix in "[A-Za-z.:]{0,8}",
            fragment in fragment(),
        ) {
            let rules = BlockRules::new([format!(
                "{},{}",
                package.to_uppercase(),
                fragment.to_uppercase()
            )]);
            let resource = format!("{prefix}{fragment}");

            prop_assert!(rules.should_block(&package.to_lowercase(), &resource, ".css"));
            if !other.eq_ignore_ascii_case(&package) {
                prop_assert!(!rules.should_block(&other, &resource, ".css"));
            }
        }

        #[test]
        fn bare_rules_match_every_package(
            package in package_name(),
            prefix in "[A-Za-z.:]{0,8}",
            fragment in fragment(),
        ) {
            let rules = BlockRules::new([fragment.to_uppercase()]);
            let resource = format!("{prefix}{fragment}");
            prop_assert!(rules.should_block(&package, &resource, ".css"));
        }

        #[test]
        fn non_stylesheets_are_never_blocked(
            package in package_name(),
            resource in "[A-Za-z.:]{1,12}",
            extension in "\\.(js|png|map|woff2|CSs2)|",
        ) {
            let rules = BlockRules::new([
                resource.clone(),
                format!("{package},{resource}"),
                String::from("."),
            ]);
            prop_assert!(!rules.should_block(&package, &resource, &extension));
        }
    }
}
