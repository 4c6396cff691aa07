//! Addressable shader check.
//!
//! Bundled materials must reference shaders the game can resolve at load
//! time, which means shaders that are themselves registered as
//! addressable.

use std::collections::HashSet;

use crate::check::{Issue, ObjectRef, PreflightRule, RuleId, ScanContext, Scope, Severity};
use crate::error::Result;
use crate::project::AssetDatabase;

/// Flags materials on skinned mesh renderers whose shader is not addressable.
pub struct AddressableShaderRule {
    addressable_shaders: HashSet<String>,
}

impl AddressableShaderRule {
    /// Build the rule, caching the paths of every addressable shader.
    pub fn new(db: &dyn AssetDatabase) -> Self {
        let addressable_shaders: HashSet<String> = db
            .addressable_settings()
            .into_iter()
            .flat_map(|settings| settings.entries())
            .filter_map(|(_, entry)| db.guid_to_asset_path(&entry.guid))
            .filter(|path| path.ends_with(".shader"))
            .filter(|path| db.load_asset(path).is_some())
            .collect();

        tracing::debug!("Found {} addressable shaders", addressable_shaders.len());

        Self {
            addressable_shaders,
        }
    }

    /// Number of cached shaders.
    pub fn cached_shaders(&self) -> usize {
        self.addressable_shaders.len()
    }

    fn is_addressable(&self, shader_path: Option<&str>) -> bool {
        shader_path.is_some_and(|path| self.addressable_shaders.contains(path))
    }
}

impl PreflightRule for AddressableShaderRule {
    fn id(&self) -> RuleId {
        RuleId::new("addressable-shader")
    }

    fn name(&self) -> &str {
        "Addressable Shader Check"
    }

    fn description(&self) -> &str {
        "Ensures materials on SkinnedMeshRenderers use shaders that are addressable"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self, scope: &Scope<'_>) -> bool {
        scope
            .prefab()
            .is_some_and(|(_, root)| root.has_skinned_mesh_renderers())
    }

    fn validate(&self, scope: &Scope<'_>, _ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
        let Some((path, root)) = scope.prefab() else {
            return Ok(Vec::new());
        };

        let mut issues = Vec::new();

        for (hierarchy_path, renderer) in root.skinned_mesh_renderers() {
            let component = ObjectRef::new(path, hierarchy_path);

            for material in renderer.materials.iter().flatten() {
                let Some(shader) = &material.shader else {
                    continue;
                };
                if self.is_addressable(shader.path.as_deref()) {
                    continue;
                }

                issues.push(
                    Issue::new(
                        self.id(),
                        self.default_severity(),
                        path,
                        format!(
                            "Material '{}' on SkinnedMeshRenderer '{}' uses shader '{}' which is not addressable. \
                             This will cause a build error. \
                             Make sure to use a shader from the game and mark the shader as addressable.",
                            material.name,
                            component.name(),
                            shader.name
                        ),
                        ObjectRef::new(path, &root.name),
                    )
                    .with_component(component.clone()),
                );
            }
        }

        Ok(issues)
    }
}
