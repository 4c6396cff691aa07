//! Host project abstraction.
//!
//! The pre-flight rules never touch a project directly. Everything they
//! need goes through three narrow capabilities:
//!
//! - [`AssetDatabase`] - addressable registry, GUID resolution, asset loading
//!   and editable working copies of prefabs
//! - [`SceneProvider`] - scene enumeration and the single currently open scene
//! - [`PrefabIntrospection`] - questions about placed prefab instances
//!
//! Anything implementing all three is a [`Host`]. Two hosts ship with the
//! crate: [`MemoryProject`] for fixtures and tests, and [`FsProject`] for
//! project directories on disk.
//!
//! # Example
//!
//! ```
//! use preflight::project::{AssetDatabase, MemoryProject};
//! use preflight::project::model::{GameObject, Asset};
//!
//! let mut project = MemoryProject::new();
//! project.add_addressable("Assets/uBody/uBody_A.prefab", Asset::Prefab(GameObject::new("uBody_A")));
//!
//! let settings = project.addressable_settings().unwrap();
//! assert_eq!(settings.entries().count(), 1);
//! ```

pub mod fs;
pub mod memory;
pub mod model;

pub use fs::{FsProject, ProjectLayout};
pub use memory::MemoryProject;

use crate::error::Result;
use model::{AddressableSettings, Asset, GameObject, Scene};

/// Access to the addressable registry and the asset store behind it.
pub trait AssetDatabase {
    /// The addressable settings, or `None` when the project has none.
    fn addressable_settings(&self) -> Option<&AddressableSettings>;

    /// Resolve a GUID to an asset path.
    fn guid_to_asset_path(&self, guid: &str) -> Option<String>;

    /// Load the asset stored at a path.
    fn load_asset(&self, path: &str) -> Option<Asset>;

    /// Load an editable working copy of a prefab.
    fn load_prefab_contents(&mut self, path: &str) -> Result<GameObject>;

    /// Persist a working copy back to the prefab at `path`.
    fn save_prefab_asset(&mut self, path: &str, root: &GameObject) -> Result<()>;

    /// Release a working copy obtained from [`load_prefab_contents`](Self::load_prefab_contents).
    fn unload_prefab_contents(&mut self, root: GameObject) {
        drop(root);
    }

    /// Re-read registry state after assets changed.
    fn refresh(&mut self) -> Result<()>;
}

/// Access to project scenes.
///
/// Opening a scene replaces whatever scene was open before. Callers that
/// scan scenes leave the last one open.
pub trait SceneProvider {
    /// Paths of every scene in the project, sorted.
    fn scene_paths(&self) -> Vec<String>;

    /// Open a scene, replacing the currently open one.
    fn open_scene(&mut self, path: &str) -> Result<()>;

    /// The currently open scene.
    fn active_scene(&self) -> Option<&Scene>;
}

/// Questions about objects placed from prefab templates.
///
/// The default methods answer from the object model; hosts backed by a
/// richer prefab system can override them.
pub trait PrefabIntrospection {
    /// Whether the object was placed from a prefab template.
    fn is_part_of_prefab_instance(&self, object: &GameObject) -> bool {
        object.prefab.is_some()
    }

    /// Whether the object is the root of an instance that is not nested
    /// inside another instance.
    fn is_outermost_prefab_instance_root(&self, object: &GameObject) -> bool {
        object.prefab.as_ref().is_some_and(|link| link.outermost)
    }

    /// Asset path of the template the object was placed from.
    fn source_template_path(&self, object: &GameObject) -> Option<String> {
        object.prefab.as_ref().map(|link| link.source.clone())
    }

    /// Whether the instance carries unapplied overrides, ignoring the
    /// name and placement overrides every instance has.
    fn has_prefab_instance_overrides(&self, object: &GameObject) -> bool {
        object.prefab.as_ref().is_some_and(|link| {
            link.overrides
                .iter()
                .any(|property| !property.is_default_override())
        })
    }
}

/// Everything the pre-flight engine needs from a project.
pub trait Host: AssetDatabase + SceneProvider + PrefabIntrospection {}

impl<T: AssetDatabase + SceneProvider + PrefabIntrospection> Host for T {}

/// Normalize a filesystem-relative path to forward-slash asset form.
pub fn to_asset_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// File extension of an asset path, lowercased and without the dot.
pub fn asset_extension(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
