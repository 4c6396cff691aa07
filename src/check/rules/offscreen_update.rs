//! Offscreen update check for body model prefabs.
//!
//! Skinned meshes that stop updating when culled leave body parts frozen
//! in their bind pose at the edge of the camera. Every skinned mesh
//! renderer in a body prefab must keep updating offscreen.

use crate::check::{Issue, ObjectRef, PreflightRule, RuleId, ScanContext, Scope, Severity};
use crate::config::OffscreenUpdateConfig;
use crate::error::Result;
use crate::project::Host;

/// Requires `update_when_offscreen` on every skinned mesh renderer in
/// body prefabs.
pub struct OffscreenUpdateRule {
    category_marker: String,
}

impl OffscreenUpdateRule {
    pub fn new(config: &OffscreenUpdateConfig) -> Self {
        Self {
            category_marker: config.category_marker.clone(),
        }
    }
}

impl Default for OffscreenUpdateRule {
    fn default() -> Self {
        Self::new(&OffscreenUpdateConfig::default())
    }
}

impl PreflightRule for OffscreenUpdateRule {
    fn id(&self) -> RuleId {
        RuleId::new("offscreen-update")
    }

    fn name(&self) -> &str {
        "SkinnedMeshRenderer Update When Offscreen"
    }

    fn description(&self) -> &str {
        "Ensures all SkinnedMeshRenderers in body prefabs have 'Update When Offscreen' enabled"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn applies_to(&self, scope: &Scope<'_>) -> bool {
        scope
            .prefab()
            .is_some_and(|(path, _)| path.contains(&self.category_marker))
    }

    fn validate(&self, scope: &Scope<'_>, _ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
        let Some((path, root)) = scope.prefab() else {
            return Ok(Vec::new());
        };

        let issues = root
            .skinned_mesh_renderers()
            .into_iter()
            .filter(|(_, renderer)| !renderer.update_when_offscreen)
            .map(|(hierarchy_path, _)| {
                let component = ObjectRef::new(path, hierarchy_path);
                Issue::new(
                    self.id(),
                    self.default_severity(),
                    path,
                    format!(
                        "SkinnedMeshRenderer on '{}' does not have 'Update When Offscreen' enabled",
                        component.name()
                    ),
                    ObjectRef::new(path, &root.name),
                )
                .with_component(component)
            })
            .collect();

        Ok(issues)
    }

    fn can_auto_fix(&self) -> bool {
        true
    }

    fn auto_fix(&self, issue: &Issue, host: &mut dyn Host) -> Result<bool> {
        let path = issue.asset_path();
        let mut root = host.load_prefab_contents(path)?;

        let mut modified = false;
        for renderer in root.skinned_mesh_renderers_mut() {
            if !renderer.update_when_offscreen {
                renderer.update_when_offscreen = true;
                modified = true;
            }
        }

        let saved = if modified {
            host.save_prefab_asset(path, &root)
        } else {
            Ok(())
        };
        host.unload_prefab_contents(root);
        saved?;

        if modified {
            tracing::info!("Fixed SkinnedMeshRenderer settings in: {}", path);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::NoopObserver;
    use crate::project::model::{Asset, Component, GameObject, SkinnedMeshRenderer};
    use crate::project::{AssetDatabase, MemoryProject};

    fn renderer(update_when_offscreen: bool) -> Component {
        Component::SkinnedMeshRenderer(SkinnedMeshRenderer {
            update_when_offscreen,
            materials: vec![],
        })
    }

    fn body(flags: &[bool]) -> GameObject {
        flags
            .iter()
            .enumerate()
            .fold(GameObject::new("uBody_Test"), |root, (i, flag)| {
                root.with_child(GameObject::new(format!("Mesh{}", i)).with_component(renderer(*flag)))
            })
    }

    fn validate(rule: &OffscreenUpdateRule, project: &mut MemoryProject, path: &str) -> Vec<Issue> {
        let asset = project.load_asset(path).unwrap();
        let scope = Scope::Asset { path, asset: &asset };
        let mut observer = NoopObserver;
        let mut ctx = ScanContext {
            host: project,
            observer: &mut observer,
        };
        rule.validate(&scope, &mut ctx).unwrap()
    }

    #[test]
    fn applies_only_to_body_prefabs() {
        let rule = OffscreenUpdateRule::default();
        let prefab = Asset::Prefab(GameObject::new("x"));
        let other = Asset::Other {
            extension: "prefab".into(),
        };

        let cases = [
            ("Assets/uBody/uBody_A.prefab", &prefab, true),
            ("Assets/oBody/oBody_A.prefab", &prefab, false),
            ("Assets/uBody/uBody_A.asset", &prefab, false),
            ("Assets/uBody/uBody_A.prefab", &other, false),
        ];
        for (path, asset, expected) in cases {
            assert_eq!(rule.applies_to(&Scope::Asset { path, asset }), expected, "{}", path);
        }
        assert!(!rule.applies_to(&Scope::Project));
    }

    #[test]
    fn reports_one_issue_per_renderer() {
        let rule = OffscreenUpdateRule::default();
        let mut project = MemoryProject::new();
        project.add_addressable("Assets/uBody/uBody_Test.prefab", Asset::Prefab(body(&[false, true, false])));

        let issues = validate(&rule, &mut project, "Assets/uBody/uBody_Test.prefab");

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity() == Severity::Warning));
        assert_eq!(
            issues[0].message(),
            "SkinnedMeshRenderer on 'Mesh0' does not have 'Update When Offscreen' enabled"
        );
        assert_eq!(
            issues[1].specific_component().unwrap().hierarchy_path,
            "uBody_Test/Mesh2"
        );
    }

    #[test]
    fn inactive_objects_are_checked() {
        let rule = OffscreenUpdateRule::default();
        let mut hidden = GameObject::new("Hidden").with_component(renderer(false));
        hidden.active = false;
        let mut project = MemoryProject::new();
        project.add_addressable(
            "Assets/uBody/uBody_B.prefab",
            Asset::Prefab(GameObject::new("uBody_B").with_child(hidden)),
        );

        let issues = validate(&rule, &mut project, "Assets/uBody/uBody_B.prefab");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn custom_category_marker() {
        let rule = OffscreenUpdateRule::new(&OffscreenUpdateConfig {
            category_marker: "hBody".into(),
        });
        let prefab = Asset::Prefab(GameObject::new("x"));

        assert!(rule.applies_to(&Scope::Asset {
            path: "Assets/hBody/h.prefab",
            asset: &prefab
        }));
        assert!(!rule.applies_to(&Scope::Asset {
            path: "Assets/uBody/u.prefab",
            asset: &prefab
        }));
    }

    #[test]
    fn auto_fix_flips_every_renderer_and_saves_once() {
        let rule = OffscreenUpdateRule::default();
        let path = "Assets/uBody/uBody_Test.prefab";
        let mut project = MemoryProject::new();
        project.add_addressable(path, Asset::Prefab(body(&[false, false, false])));

        let issues = validate(&rule, &mut project, path);
        assert!(rule.auto_fix(&issues[0], &mut project).unwrap());

        assert_eq!(project.saves(), [path.to_string()]);
        assert_eq!(project.open_working_copies(), 0);
        assert!(validate(&rule, &mut project, path).is_empty());
    }

    #[test]
    fn auto_fix_is_idempotent() {
        let rule = OffscreenUpdateRule::default();
        let path = "Assets/uBody/uBody_Test.prefab";
        let mut project = MemoryProject::new();
        project.add_addressable(path, Asset::Prefab(body(&[false])));

        let issue = validate(&rule, &mut project, path).remove(0);
        assert!(rule.auto_fix(&issue, &mut project).unwrap());
        assert!(rule.auto_fix(&issue, &mut project).unwrap());

        assert_eq!(project.saves().len(), 1);
        assert_eq!(project.open_working_copies(), 0);
    }

    #[test]
    fn auto_fix_propagates_missing_asset() {
        let rule = OffscreenUpdateRule::default();
        let mut project = MemoryProject::new();
        let issue = Issue::new(
            rule.id(),
            Severity::Warning,
            "Assets/uBody/gone.prefab",
            "msg",
            ObjectRef::new("Assets/uBody/gone.prefab", "gone"),
        );

        assert!(rule.auto_fix(&issue, &mut project).is_err());
    }
}
