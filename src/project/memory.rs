//! In-memory project host.
//!
//! [`MemoryProject`] holds assets, scenes and addressable settings in
//! plain collections. It is what rule and manager tests run against, and
//! it records saves, refreshes and open working copies so tests can
//! assert on host side effects.

use std::collections::{BTreeMap, HashMap};

use crate::error::{PreflightError, Result};

use super::model::{AddressableEntry, AddressableGroup, AddressableSettings, Asset, GameObject, Scene};
use super::{AssetDatabase, PrefabIntrospection, SceneProvider};

/// Name of the group [`MemoryProject::add_addressable`] registers into.
pub const DEFAULT_GROUP: &str = "Default Local Group";

/// A project that lives entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryProject {
    settings: Option<AddressableSettings>,
    guids: HashMap<String, String>,
    assets: BTreeMap<String, Asset>,
    active_scene: Option<Scene>,
    next_guid: u64,
    saves: Vec<String>,
    refreshes: usize,
    open_working_copies: usize,
}

impl Default for MemoryProject {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProject {
    /// Create a project with an empty default addressable group.
    pub fn new() -> Self {
        let settings = AddressableSettings {
            groups: vec![AddressableGroup {
                name: DEFAULT_GROUP.to_string(),
                player_data: false,
                entries: Vec::new(),
            }],
        };
        Self {
            settings: Some(settings),
            ..Self::without_settings()
        }
    }

    /// Create a project with no addressable settings at all.
    pub fn without_settings() -> Self {
        Self {
            settings: None,
            guids: HashMap::new(),
            assets: BTreeMap::new(),
            active_scene: None,
            next_guid: 1,
            saves: Vec::new(),
            refreshes: 0,
            open_working_copies: 0,
        }
    }

    /// Store an asset without registering it as addressable.
    ///
    /// Returns the GUID assigned to the asset.
    pub fn add_asset(&mut self, path: &str, asset: Asset) -> String {
        let guid = format!("{:032x}", self.next_guid);
        self.next_guid += 1;
        self.guids.insert(guid.clone(), path.to_string());
        self.assets.insert(path.to_string(), asset);
        guid
    }

    /// Store an asset and register it in the default addressable group.
    pub fn add_addressable(&mut self, path: &str, asset: Asset) -> String {
        let guid = self.add_asset(path, asset);
        self.add_entry(&guid);
        guid
    }

    /// Register a raw GUID in the default group, whether or not it resolves.
    pub fn add_entry(&mut self, guid: &str) {
        if let Some(settings) = self.settings.as_mut() {
            if settings.groups.is_empty() {
                settings.groups.push(AddressableGroup {
                    name: DEFAULT_GROUP.to_string(),
                    ..Default::default()
                });
            }
            settings.groups[0].entries.push(AddressableEntry::new(guid));
        }
    }

    /// Store a scene.
    pub fn add_scene(&mut self, path: &str, scene: Scene) -> String {
        self.add_asset(path, Asset::Scene(scene))
    }

    /// Look at a stored asset.
    pub fn asset(&self, path: &str) -> Option<&Asset> {
        self.assets.get(path)
    }

    /// Paths of prefabs saved through [`AssetDatabase::save_prefab_asset`], in order.
    pub fn saves(&self) -> &[String] {
        &self.saves
    }

    /// How many times [`AssetDatabase::refresh`] was called.
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Working copies loaded but not yet unloaded.
    pub fn open_working_copies(&self) -> usize {
        self.open_working_copies
    }
}

impl AssetDatabase for MemoryProject {
    fn addressable_settings(&self) -> Option<&AddressableSettings> {
        self.settings.as_ref()
    }

    fn guid_to_asset_path(&self, guid: &str) -> Option<String> {
        self.guids.get(guid).cloned()
    }

    fn load_asset(&self, path: &str) -> Option<Asset> {
        self.assets.get(path).cloned()
    }

    fn load_prefab_contents(&mut self, path: &str) -> Result<GameObject> {
        match self.assets.get(path) {
            Some(Asset::Prefab(root)) => {
                self.open_working_copies += 1;
                Ok(root.clone())
            }
            Some(_) => Err(PreflightError::NotAPrefab {
                path: path.to_string(),
            }),
            None => Err(PreflightError::AssetNotFound {
                path: path.to_string(),
            }),
        }
    }

    fn save_prefab_asset(&mut self, path: &str, root: &GameObject) -> Result<()> {
        self.assets
            .insert(path.to_string(), Asset::Prefab(root.clone()));
        self.saves.push(path.to_string());
        Ok(())
    }

    fn unload_prefab_contents(&mut self, root: GameObject) {
        drop(root);
        self.open_working_copies = self.open_working_copies.saturating_sub(1);
    }

    fn refresh(&mut self) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }
}

impl SceneProvider for MemoryProject {
    fn scene_paths(&self) -> Vec<String> {
        self.assets
            .iter()
            .filter(|(_, asset)| matches!(asset, Asset::Scene(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn open_scene(&mut self, path: &str) -> Result<()> {
        match self.assets.get(path) {
            Some(Asset::Scene(scene)) => {
                let mut scene = scene.clone();
                scene.path = path.to_string();
                self.active_scene = Some(scene);
                Ok(())
            }
            _ => Err(PreflightError::SceneNotFound {
                path: path.to_string(),
            }),
        }
    }

    fn active_scene(&self) -> Option<&Scene> {
        self.active_scene.as_ref()
    }
}

impl PrefabIntrospection for MemoryProject {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addressable_assets_resolve_through_guid() {
        let mut project = MemoryProject::new();
        let guid = project.add_addressable("Assets/a.prefab", Asset::Prefab(GameObject::new("a")));

        assert_eq!(
            project.guid_to_asset_path(&guid).as_deref(),
            Some("Assets/a.prefab")
        );
        assert!(matches!(
            project.load_asset("Assets/a.prefab"),
            Some(Asset::Prefab(_))
        ));
        assert_eq!(project.addressable_settings().unwrap().entries().count(), 1);
    }

    #[test]
    fn plain_assets_are_not_registered() {
        let mut project = MemoryProject::new();
        project.add_asset("Assets/a.prefab", Asset::Prefab(GameObject::new("a")));
        assert_eq!(project.addressable_settings().unwrap().entries().count(), 0);
    }

    #[test]
    fn without_settings_has_no_registry() {
        let mut project = MemoryProject::without_settings();
        project.add_entry("dangling");
        assert!(project.addressable_settings().is_none());
    }

    #[test]
    fn working_copies_are_tracked() {
        let mut project = MemoryProject::new();
        project.add_asset("Assets/a.prefab", Asset::Prefab(GameObject::new("a")));

        let mut root = project.load_prefab_contents("Assets/a.prefab").unwrap();
        assert_eq!(project.open_working_copies(), 1);

        root.name = "renamed".to_string();
        project.save_prefab_asset("Assets/a.prefab", &root).unwrap();
        project.unload_prefab_contents(root);

        assert_eq!(project.open_working_copies(), 0);
        assert_eq!(project.saves(), ["Assets/a.prefab".to_string()]);
        assert_eq!(
            project.asset("Assets/a.prefab").unwrap().as_prefab().unwrap().name,
            "renamed"
        );
    }

    #[test]
    fn load_prefab_contents_rejects_other_assets() {
        let mut project = MemoryProject::new();
        project.add_asset("Assets/readme.txt", Asset::Other { extension: "txt".into() });

        assert!(matches!(
            project.load_prefab_contents("Assets/readme.txt"),
            Err(PreflightError::NotAPrefab { .. })
        ));
        assert!(matches!(
            project.load_prefab_contents("Assets/missing.prefab"),
            Err(PreflightError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn opening_a_scene_replaces_the_active_one() {
        let mut project = MemoryProject::new();
        project.add_scene("Assets/Scenes/b.unity", Scene::default());
        project.add_scene("Assets/Scenes/a.unity", Scene::default());

        assert_eq!(
            project.scene_paths(),
            vec!["Assets/Scenes/a.unity", "Assets/Scenes/b.unity"]
        );

        project.open_scene("Assets/Scenes/a.unity").unwrap();
        project.open_scene("Assets/Scenes/b.unity").unwrap();
        assert_eq!(project.active_scene().unwrap().path, "Assets/Scenes/b.unity");

        assert!(project.open_scene("Assets/Scenes/missing.unity").is_err());
    }
}
