//! Issue grouping for presentation.
//!
//! Both views keep first-seen order so grouped output follows the order
//! rules ran in.

use indexmap::IndexMap;

use super::issue::Issue;
use super::registry::RuleRegistry;

/// Issues that share a rule.
#[derive(Debug)]
pub struct RuleGroup<'a> {
    /// Rule name, or its id when the rule is not registered.
    pub title: String,
    pub issues: Vec<&'a Issue>,
}

/// Issues that share an asset.
#[derive(Debug)]
pub struct AssetGroup<'a> {
    pub asset_path: String,
    pub issues: Vec<&'a Issue>,
}

impl AssetGroup<'_> {
    /// File name of the asset.
    pub fn file_name(&self) -> &str {
        self.asset_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.asset_path)
    }

    /// Directory of the asset, empty for top-level paths.
    pub fn directory(&self) -> &str {
        self.asset_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }
}

/// Group issues by the rule that raised them.
pub fn group_by_rule<'a>(issues: &'a [Issue], registry: &RuleRegistry) -> Vec<RuleGroup<'a>> {
    let mut groups: IndexMap<String, Vec<&Issue>> = IndexMap::new();
    for issue in issues {
        let title = registry
            .get(issue.rule_id())
            .map(|rule| rule.name().to_string())
            .unwrap_or_else(|| issue.rule_id().to_string());
        groups.entry(title).or_default().push(issue);
    }

    groups
        .into_iter()
        .map(|(title, issues)| RuleGroup { title, issues })
        .collect()
}

/// Group issues by asset path.
pub fn group_by_asset(issues: &[Issue]) -> Vec<AssetGroup<'_>> {
    let mut groups: IndexMap<&str, Vec<&Issue>> = IndexMap::new();
    for issue in issues {
        groups.entry(issue.asset_path()).or_default().push(issue);
    }

    groups
        .into_iter()
        .map(|(asset_path, issues)| AssetGroup {
            asset_path: asset_path.to_string(),
            issues,
        })
        .collect()
}
