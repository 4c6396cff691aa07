//! Issues reported by pre-flight rules.

use std::fmt;

use serde::Serialize;

use super::rule::{RuleId, Severity};

/// Handle to an object inside an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectRef {
    /// Asset the object lives in (a prefab or a scene).
    pub asset_path: String,
    /// Path from the asset's root object, joined with `/`.
    pub hierarchy_path: String,
}

impl ObjectRef {
    pub fn new(asset_path: impl Into<String>, hierarchy_path: impl Into<String>) -> Self {
        Self {
            asset_path: asset_path.into(),
            hierarchy_path: hierarchy_path.into(),
        }
    }

    /// Last segment of the hierarchy path.
    pub fn name(&self) -> &str {
        self.hierarchy_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.hierarchy_path)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asset_path, self.hierarchy_path)
    }
}

/// One violation found by one rule.
///
/// Issues are built once and never changed afterwards. The rule that
/// produced an issue is referenced by id and resolved through the
/// registry that ran the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    rule_id: RuleId,
    severity: Severity,
    asset_path: String,
    message: String,
    asset: ObjectRef,
    specific_component: Option<ObjectRef>,
}

impl Issue {
    /// Create an issue against an asset.
    pub fn new(
        rule_id: RuleId,
        severity: Severity,
        asset_path: impl Into<String>,
        message: impl Into<String>,
        asset: ObjectRef,
    ) -> Self {
        Self {
            rule_id,
            severity,
            asset_path: asset_path.into(),
            message: message.into(),
            asset,
            specific_component: None,
        }
    }

    /// Point the issue at one object inside the asset.
    pub fn with_component(mut self, component: ObjectRef) -> Self {
        self.specific_component = Some(component);
        self
    }

    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Path of the offending asset (or scene).
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The primary offending object.
    pub fn asset(&self) -> &ObjectRef {
        &self.asset
    }

    /// The exact sub-object at fault, when finer than [`asset`](Self::asset).
    pub fn specific_component(&self) -> Option<&ObjectRef> {
        self.specific_component.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_creation() {
        let issue = Issue::new(
            RuleId::new("obody-avatar"),
            Severity::Error,
            "Assets/oBody/oBody_A.prefab",
            "missing",
            ObjectRef::new("Assets/oBody/oBody_A.prefab", "oBody_A"),
        );

        assert_eq!(issue.rule_id(), &RuleId::new("obody-avatar"));
        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(issue.asset_path(), "Assets/oBody/oBody_A.prefab");
        assert_eq!(issue.message(), "missing");
        assert!(issue.specific_component().is_none());
    }

    #[test]
    fn issue_with_component() {
        let issue = Issue::new(
            RuleId::new("offscreen-update"),
            Severity::Warning,
            "Assets/uBody/a.prefab",
            "msg",
            ObjectRef::new("Assets/uBody/a.prefab", "a"),
        )
        .with_component(ObjectRef::new("Assets/uBody/a.prefab", "a/Body/Mesh"));

        let component = issue.specific_component().unwrap();
        assert_eq!(component.name(), "Mesh");
        assert_eq!(component.to_string(), "Assets/uBody/a.prefab:a/Body/Mesh");
    }

    #[test]
    fn object_ref_name_without_separator() {
        assert_eq!(ObjectRef::new("x", "Root").name(), "Root");
    }
}
