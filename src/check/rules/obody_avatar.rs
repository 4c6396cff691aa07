//! Avatar check for oBody prefabs.

use crate::check::{Issue, ObjectRef, PreflightRule, RuleId, ScanContext, Scope, Severity};
use crate::config::ObodyAvatarConfig;
use crate::error::Result;

/// Requires an animator with an avatar on the root of every oBody prefab.
///
/// The avatar is configured on the source model's import settings, so
/// there is no automatic fix.
pub struct ObodyAvatarRule {
    path_markers: Vec<String>,
}

impl ObodyAvatarRule {
    pub fn new(config: &ObodyAvatarConfig) -> Self {
        Self {
            path_markers: config.path_markers.clone(),
        }
    }
}

impl Default for ObodyAvatarRule {
    fn default() -> Self {
        Self::new(&ObodyAvatarConfig::default())
    }
}

impl PreflightRule for ObodyAvatarRule {
    fn id(&self) -> RuleId {
        RuleId::new("obody-avatar")
    }

    fn name(&self) -> &str {
        "oBody Avatar Check"
    }

    fn description(&self) -> &str {
        "Ensures all oBody prefabs have an Avatar assigned for proper functionality"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self, scope: &Scope<'_>) -> bool {
        scope.prefab().is_some_and(|(path, _)| {
            self.path_markers
                .iter()
                .any(|marker| path.contains(marker.as_str()))
        })
    }

    fn validate(&self, scope: &Scope<'_>, _ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
        let Some((path, root)) = scope.prefab() else {
            return Ok(Vec::new());
        };

        let message = match root.animator() {
            None => format!(
                "oBody prefab '{}' is missing an Animator component. \
                 oBody prefabs require an Animator component with a configured Avatar to function correctly.",
                root.name
            ),
            Some(animator) if animator.avatar.is_none() => format!(
                "oBody prefab '{}' has an Animator component but no Avatar assigned. \
                 Please assign an Avatar to the Animator component. \
                 You may need to configure the Avatar on the source FBX file.",
                root.name
            ),
            Some(_) => return Ok(Vec::new()),
        };

        Ok(vec![Issue::new(
            self.id(),
            self.default_severity(),
            path,
            message,
            ObjectRef::new(path, &root.name),
        )])
    }
}
