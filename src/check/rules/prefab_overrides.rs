//! Unapplied prefab overrides in scenes.
//!
//! Bundles are built from prefab assets, not from scenes. Changes made to
//! a placed instance in a scene never reach the bundle until they are
//! applied back to the prefab.

use std::collections::HashSet;
use std::path::Path;

use crate::check::{
    Issue, ObjectRef, PreflightRule, RuleId, ScanContext, ScanProgress, Scope, Severity,
};
use crate::error::Result;
use crate::project::model::GameObject;
use crate::project::{AssetDatabase, Host};

/// Warns about placed addressable prefabs that carry unapplied overrides.
///
/// Runs once per scan in the project scope. Every scene is opened in turn,
/// so the host is left with the last scene open.
pub struct PrefabOverridesInScenesRule {
    addressable_prefabs: HashSet<String>,
}

impl PrefabOverridesInScenesRule {
    /// Build the rule, caching the paths of every addressable prefab.
    pub fn new(db: &dyn AssetDatabase) -> Self {
        let addressable_prefabs: HashSet<String> = db
            .addressable_settings()
            .into_iter()
            .flat_map(|settings| settings.entries())
            .filter_map(|(_, entry)| db.guid_to_asset_path(&entry.guid))
            .filter(|path| path.ends_with(".prefab"))
            .collect();

        tracing::debug!("Found {} addressable prefabs", addressable_prefabs.len());

        Self {
            addressable_prefabs,
        }
    }

    fn check_object(
        &self,
        host: &dyn Host,
        object: &GameObject,
        hierarchy_path: &str,
        scene_path: &str,
        issues: &mut Vec<Issue>,
    ) {
        if host.is_part_of_prefab_instance(object) {
            if host.is_outermost_prefab_instance_root(object)
                && host
                    .source_template_path(object)
                    .is_some_and(|source| self.addressable_prefabs.contains(&source))
                && host.has_prefab_instance_overrides(object)
            {
                issues.push(self.issue(object, hierarchy_path, scene_path));
            }
            return;
        }

        for child in &object.children {
            let child_path = format!("{}/{}", hierarchy_path, child.name);
            self.check_object(host, child, &child_path, scene_path, issues);
        }
    }

    fn issue(&self, object: &GameObject, hierarchy_path: &str, scene_path: &str) -> Issue {
        let scene_name = Path::new(scene_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Issue::new(
            self.id(),
            self.default_severity(),
            scene_path,
            format!(
                "Prefab '{}' in scene '{}' has unsaved overrides. \
                 Remember to apply prefab overrides if you want them reflected in individual bundles.",
                object.name, scene_name
            ),
            ObjectRef::new(scene_path, hierarchy_path),
        )
    }
}

impl PreflightRule for PrefabOverridesInScenesRule {
    fn id(&self) -> RuleId {
        RuleId::new("prefab-overrides-in-scenes")
    }

    fn name(&self) -> &str {
        "Prefab Overrides in Scenes"
    }

    fn description(&self) -> &str {
        "Checks for prefab instances with unsaved overrides in scenes"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn applies_to(&self, scope: &Scope<'_>) -> bool {
        matches!(scope, Scope::Project)
    }

    fn validate(&self, _scope: &Scope<'_>, ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let scenes = ctx.host.scene_paths();
        let total = scenes.len();

        for (index, scene_path) in scenes.iter().enumerate() {
            if ctx.observer.is_cancelled() {
                tracing::debug!("Scene pass cancelled after {} of {} scenes", index, total);
                break;
            }
            ctx.observer.on_progress(ScanProgress::Scene {
                path: scene_path,
                index,
                total,
            });

            if let Err(e) = ctx.host.open_scene(scene_path) {
                tracing::warn!("Skipping scene {}: {}", scene_path, e);
                continue;
            }

            let host: &dyn Host = &*ctx.host;
            let Some(scene) = host.active_scene() else {
                continue;
            };
            for root in &scene.roots {
                self.check_object(host, root, &root.name, scene_path, &mut issues);
            }
        }

        Ok(issues)
    }
}
