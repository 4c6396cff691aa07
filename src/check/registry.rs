//! Rule registry.
//!
//! The [`RuleRegistry`] holds the rules of a scan in the order they are
//! applied. Issue order in a scan report follows this order.

use super::rule::{PreflightRule, RuleId};
use super::rules::{
    AddressableShaderRule, ObodyAvatarRule, OffscreenUpdateRule, PrefabOverridesInScenesRule,
};
use crate::config::RulesConfig;
use crate::project::AssetDatabase;

/// Ordered set of rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn PreflightRule>>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a registry with every built-in rule the config leaves enabled.
    ///
    /// Rules that cache registry state read it from `db` now.
    pub fn with_builtins(config: &RulesConfig, db: &dyn AssetDatabase) -> Self {
        let builtins: Vec<Box<dyn PreflightRule>> = vec![
            Box::new(OffscreenUpdateRule::new(&config.offscreen_update)),
            Box::new(PrefabOverridesInScenesRule::new(db)),
            Box::new(AddressableShaderRule::new(db)),
            Box::new(ObodyAvatarRule::new(&config.obody_avatar)),
        ];

        let mut registry = Self::new();
        for rule in builtins {
            if config.is_disabled(rule.id().as_str()) {
                tracing::debug!("Rule '{}' disabled by config", rule.id());
                continue;
            }
            registry.register(rule);
        }
        registry
    }

    /// Register a rule, replacing any rule with the same id in place.
    pub fn register(&mut self, rule: Box<dyn PreflightRule>) {
        let id = rule.id();
        match self.rules.iter().position(|r| r.id() == id) {
            Some(index) => self.rules[index] = rule,
            None => self.rules.push(rule),
        }
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &RuleId) -> Option<&dyn PreflightRule> {
        self.rules.iter().find(|r| &r.id() == id).map(|r| r.as_ref())
    }

    /// Iterate over rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn PreflightRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Issue, ScanContext, Scope, Severity};
    use crate::error::Result;
    use crate::project::MemoryProject;

    struct MockRule {
        id: &'static str,
        name: &'static str,
    }

    impl PreflightRule for MockRule {
        fn id(&self) -> RuleId {
            RuleId::new(self.id)
        }
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "A mock rule for testing"
        }
        fn default_severity(&self) -> Severity {
            Severity::Info
        }
        fn applies_to(&self, _scope: &Scope<'_>) -> bool {
            false
        }
        fn validate(&self, _scope: &Scope<'_>, _ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
            Ok(vec![])
        }
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn builtins_in_application_order() {
        let registry = RuleRegistry::with_builtins(&RulesConfig::default(), &MemoryProject::new());
        let ids: Vec<String> = registry.iter().map(|r| r.id().to_string()).collect();

        assert_eq!(
            ids,
            vec![
                "offscreen-update",
                "prefab-overrides-in-scenes",
                "addressable-shader",
                "obody-avatar"
            ]
        );
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = RulesConfig {
            disabled: vec!["addressable-shader".into(), "unknown-rule".into()],
            ..Default::default()
        };
        let registry = RuleRegistry::with_builtins(&config, &MemoryProject::new());

        assert_eq!(registry.len(), 3);
        assert!(registry.get(&RuleId::new("addressable-shader")).is_none());
    }

    #[test]
    fn register_replaces_same_id_in_place() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(MockRule { id: "a", name: "first" }));
        registry.register(Box::new(MockRule { id: "b", name: "b" }));
        registry.register(Box::new(MockRule { id: "a", name: "second" }));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next().unwrap().name(), "second");
        assert_eq!(registry.get(&RuleId::new("a")).unwrap().name(), "second");
    }
}
