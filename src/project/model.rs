//! Object model for project assets.
//!
//! These types map to the YAML documents a project stores on disk
//! (prefabs, scenes and the addressable settings) and are also what the
//! in-memory fixture hands to rules.

use serde::{Deserialize, Serialize};

/// A loaded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    /// A prefab: a reusable object hierarchy.
    Prefab(GameObject),
    /// A shader program.
    Shader(Shader),
    /// A scene.
    Scene(Scene),
    /// Anything the pre-flight rules do not inspect.
    Other { extension: String },
}

impl Asset {
    /// The prefab root, if this asset is a prefab.
    pub fn as_prefab(&self) -> Option<&GameObject> {
        match self {
            Asset::Prefab(root) => Some(root),
            _ => None,
        }
    }
}

/// A node in an object hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameObject {
    /// Object name.
    pub name: String,

    /// Whether the object is active. Inactive objects are still validated.
    #[serde(skip_serializing_if = "is_true")]
    pub active: bool,

    /// Components attached to this object.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,

    /// Child objects.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GameObject>,

    /// Set when this object is placed from a prefab template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefab: Option<PrefabLink>,
}

impl Default for GameObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            active: true,
            components: Vec::new(),
            children: Vec::new(),
            prefab: None,
        }
    }
}

fn is_true(value: &bool) -> bool {
    *value
}

impl GameObject {
    /// Create an empty, active object.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach a component.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Append a child object.
    pub fn with_child(mut self, child: GameObject) -> Self {
        self.children.push(child);
        self
    }

    /// Mark this object as an instance of a prefab template.
    pub fn with_prefab(mut self, link: PrefabLink) -> Self {
        self.prefab = Some(link);
        self
    }

    /// The first animator on this object (children are not searched).
    pub fn animator(&self) -> Option<&Animator> {
        self.components.iter().find_map(|c| match c {
            Component::Animator(animator) => Some(animator),
            _ => None,
        })
    }

    /// All skinned mesh renderers in this hierarchy, paired with the
    /// hierarchy path of the object that owns them.
    ///
    /// Paths start at this object's name and are joined with `/`.
    pub fn skinned_mesh_renderers(&self) -> Vec<(String, &SkinnedMeshRenderer)> {
        let mut found = Vec::new();
        collect_renderers(self, &self.name, &mut found);
        found
    }

    /// Mutable access to every skinned mesh renderer in this hierarchy.
    pub fn skinned_mesh_renderers_mut(&mut self) -> Vec<&mut SkinnedMeshRenderer> {
        let mut found = Vec::new();
        collect_renderers_mut(self, &mut found);
        found
    }

    /// Whether any object in this hierarchy has a skinned mesh renderer.
    pub fn has_skinned_mesh_renderers(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c, Component::SkinnedMeshRenderer(_)))
            || self.children.iter().any(|c| c.has_skinned_mesh_renderers())
    }
}

fn collect_renderers<'a>(
    object: &'a GameObject,
    path: &str,
    found: &mut Vec<(String, &'a SkinnedMeshRenderer)>,
) {
    for component in &object.components {
        if let Component::SkinnedMeshRenderer(renderer) = component {
            found.push((path.to_string(), renderer));
        }
    }
    for child in &object.children {
        let child_path = format!("{}/{}", path, child.name);
        collect_renderers(child, &child_path, found);
    }
}

fn collect_renderers_mut<'a>(
    object: &'a mut GameObject,
    found: &mut Vec<&'a mut SkinnedMeshRenderer>,
) {
    for component in object.components.iter_mut() {
        if let Component::SkinnedMeshRenderer(renderer) = component {
            found.push(renderer);
        }
    }
    for child in object.children.iter_mut() {
        collect_renderers_mut(child, found);
    }
}

/// A component attached to a [`GameObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    /// Renders a mesh deformed by a skeleton.
    SkinnedMeshRenderer(SkinnedMeshRenderer),
    /// Drives skeletal animation.
    Animator(Animator),
    /// Any component the rules do not care about.
    Other { type_name: String },
}

/// Skinned mesh renderer settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinnedMeshRenderer {
    /// Keep animating the mesh when it is culled.
    pub update_when_offscreen: bool,

    /// Material slots. Empty slots are `None`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Option<Material>>,
}

/// Animator settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Animator {
    /// Skeletal avatar binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A material slot assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader: Option<ShaderRef>,
}

/// Reference from a material to the shader it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderRef {
    /// Declared shader name, e.g. `Custom/Toon`.
    pub name: String,

    /// Asset path of the shader. Built-in shaders have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A shader asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shader {
    pub name: String,
}

/// Link from a placed object back to its prefab template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabLink {
    /// Asset path of the source template.
    pub source: String,

    /// False for prefabs nested inside another placed prefab.
    #[serde(default = "default_outermost")]
    pub outermost: bool,

    /// Per-instance overrides that have not been applied to the template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<PropertyOverride>,
}

fn default_outermost() -> bool {
    true
}

impl PrefabLink {
    /// Create an outermost link with no overrides.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outermost: true,
            overrides: Vec::new(),
        }
    }

    /// Add an override.
    pub fn with_override(mut self, property_override: PropertyOverride) -> Self {
        self.overrides.push(property_override);
        self
    }
}

/// A single per-instance property override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOverride {
    /// Hierarchy path relative to the instance root. Empty means the root.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// Serialized property path, e.g. `m_Materials.Array.data[0]`.
    pub property: String,

    #[serde(default)]
    pub value: serde_yaml::Value,
}

/// Root properties every placed instance overrides by necessity.
const DEFAULT_OVERRIDE_PREFIXES: &[&str] = &[
    "m_Name",
    "m_LocalPosition",
    "m_LocalRotation",
    "m_LocalEulerAnglesHint",
    "m_RootOrder",
];

impl PropertyOverride {
    /// Create an override on the instance root.
    pub fn new(property: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        Self {
            target: String::new(),
            property: property.into(),
            value: value.into(),
        }
    }

    /// Retarget the override to a descendant of the instance root.
    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Whether this is one of the overrides every instance carries
    /// (its name and placement).
    pub fn is_default_override(&self) -> bool {
        self.target.is_empty()
            && DEFAULT_OVERRIDE_PREFIXES
                .iter()
                .any(|prefix| self.property.starts_with(prefix))
    }
}

/// A scene: a set of root objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Asset path the scene was opened from.
    #[serde(skip)]
    pub path: String,

    pub roots: Vec<GameObject>,
}

/// Addressable registry settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressableSettings {
    pub groups: Vec<AddressableGroup>,
}

impl AddressableSettings {
    /// Every entry in group order.
    pub fn entries(&self) -> impl Iterator<Item = (&AddressableGroup, &AddressableEntry)> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().map(move |entry| (group, entry)))
    }
}

/// A group of addressable entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressableGroup {
    pub name: String,

    /// Marks the built-in player data group.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub player_data: bool,

    pub entries: Vec<AddressableEntry>,
}

impl AddressableGroup {
    /// Whether this group holds player data rather than mod content.
    pub fn is_player_data(&self) -> bool {
        self.player_data
    }
}

/// One registered asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressableEntry {
    pub guid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl AddressableEntry {
    /// Create an entry for a GUID.
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            ..Default::default()
        }
    }
}
