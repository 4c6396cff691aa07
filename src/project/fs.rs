//! File-backed project host.
//!
//! [`FsProject`] reads a mod project directory laid out like this:
//!
//! ```text
//! <root>/
//!   Assets/
//!     AddressableAssetsData/addressables.yml   addressable groups and entries
//!     Characters/uBody/uBody_Foo.prefab        prefab (YAML GameObject)
//!     Characters/uBody/uBody_Foo.prefab.meta   sidecar holding `guid: ...`
//!     Shaders/Toon.shader                      shader source
//!     Scenes/Stage.unity                       scene (YAML list of roots)
//! ```
//!
//! GUIDs come from the `.meta` sidecars, so an addressable entry resolves
//! only when the asset it names has one.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{PreflightError, Result};

use super::model::{AddressableSettings, Asset, GameObject, Scene, Shader};
use super::{asset_extension, to_asset_path, AssetDatabase, PrefabIntrospection, SceneProvider};

/// Shader name declaration at the top of a shader source file.
static SHADER_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*Shader\s+"([^"]+)""#).expect("SHADER_NAME_REGEX must compile")
});

/// Where things live inside a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Asset root, relative to the project root.
    pub assets_dir: String,
    /// Addressable settings file, relative to the project root.
    pub addressables: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            assets_dir: "Assets".to_string(),
            addressables: "Assets/AddressableAssetsData/addressables.yml".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct MetaFile {
    guid: String,
}

/// A project directory on disk.
#[derive(Debug)]
pub struct FsProject {
    root: PathBuf,
    layout: ProjectLayout,
    settings: Option<AddressableSettings>,
    guids: HashMap<String, String>,
    active_scene: Option<Scene>,
}

impl FsProject {
    /// Open a project directory and index its meta files.
    ///
    /// A missing addressable settings file is not an error here; the
    /// check manager reports it when a scan starts.
    ///
    /// # Errors
    ///
    /// Returns `AssetParseError` if the settings file exists but is invalid.
    pub fn open(root: impl Into<PathBuf>, layout: ProjectLayout) -> Result<Self> {
        let mut project = Self {
            root: root.into(),
            layout,
            settings: None,
            guids: HashMap::new(),
            active_scene: None,
        };
        project.reindex()?;
        Ok(project)
    }

    /// Number of GUIDs found in meta files.
    pub fn indexed_guids(&self) -> usize {
        self.guids.len()
    }

    fn full_path(&self, asset_path: &str) -> PathBuf {
        self.root.join(asset_path)
    }

    fn reindex(&mut self) -> Result<()> {
        self.guids = self.scan_meta_files();
        self.settings = self.read_settings()?;
        tracing::debug!(
            "Indexed {} GUIDs under {}",
            self.guids.len(),
            self.root.display()
        );
        Ok(())
    }

    fn scan_meta_files(&self) -> HashMap<String, String> {
        let mut guids = HashMap::new();

        for entry in WalkDir::new(self.root.join(&self.layout.assets_dir))
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "meta") {
                continue;
            }

            let meta: MetaFile = match fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_yaml::from_str(&content).map_err(|e| e.to_string()))
            {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!("Skipping unreadable meta file {}: {}", path.display(), e);
                    continue;
                }
            };

            let asset = path.with_extension("");
            if let Ok(relative) = asset.strip_prefix(&self.root) {
                guids.insert(meta.guid, to_asset_path(relative));
            }
        }

        guids
    }

    fn read_settings(&self) -> Result<Option<AddressableSettings>> {
        let path = self.full_path(&self.layout.addressables);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PreflightError::Io(e)),
        };

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| PreflightError::AssetParseError {
                path: self.layout.addressables.clone(),
                message: e.to_string(),
            })
    }

    fn read_yaml<T: serde::de::DeserializeOwned>(&self, asset_path: &str) -> Result<T> {
        let content = fs::read_to_string(self.full_path(asset_path)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PreflightError::AssetNotFound {
                    path: asset_path.to_string(),
                }
            } else {
                PreflightError::Io(e)
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| PreflightError::AssetParseError {
            path: asset_path.to_string(),
            message: e.to_string(),
        })
    }

    fn read_shader(&self, asset_path: &str) -> Result<Shader> {
        let content = fs::read_to_string(self.full_path(asset_path))?;
        let name = content
            .lines()
            .find_map(|line| SHADER_NAME_REGEX.captures(line))
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| {
                Path::new(asset_path)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
        Ok(Shader { name })
    }

    fn read_asset(&self, asset_path: &str) -> Result<Asset> {
        match asset_extension(asset_path).as_str() {
            "prefab" => self.read_yaml(asset_path).map(Asset::Prefab),
            "unity" => self.read_yaml(asset_path).map(Asset::Scene),
            "shader" => self.read_shader(asset_path).map(Asset::Shader),
            extension => Ok(Asset::Other {
                extension: extension.to_string(),
            }),
        }
    }
}

impl AssetDatabase for FsProject {
    fn addressable_settings(&self) -> Option<&AddressableSettings> {
        self.settings.as_ref()
    }

    fn guid_to_asset_path(&self, guid: &str) -> Option<String> {
        self.guids.get(guid).cloned()
    }

    fn load_asset(&self, path: &str) -> Option<Asset> {
        if !self.full_path(path).is_file() {
            return None;
        }

        match self.read_asset(path) {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!("Could not load {}: {}", path, e);
                None
            }
        }
    }

    fn load_prefab_contents(&mut self, path: &str) -> Result<GameObject> {
        if asset_extension(path) != "prefab" {
            return Err(PreflightError::NotAPrefab {
                path: path.to_string(),
            });
        }
        self.read_yaml(path)
    }

    fn save_prefab_asset(&mut self, path: &str, root: &GameObject) -> Result<()> {
        let yaml = serde_yaml::to_string(root).map_err(anyhow::Error::from)?;
        let target = self.full_path(path);

        // Write beside the prefab and rename over it, so a failed write
        // leaves the original intact.
        let temp_path = target.with_extension("prefab.tmp");
        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(yaml.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&temp_path, &target)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        tracing::debug!("Saved prefab {}", path);
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.reindex()
    }
}

impl SceneProvider for FsProject {
    fn scene_paths(&self) -> Vec<String> {
        let mut scenes: Vec<String> = WalkDir::new(self.root.join(&self.layout.assets_dir))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "unity"))
            .filter_map(|e| {
                e.path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(to_asset_path)
            })
            .collect();
        scenes.sort();
        scenes
    }

    fn open_scene(&mut self, path: &str) -> Result<()> {
        let mut scene: Scene = self.read_yaml(path).map_err(|e| match e {
            PreflightError::AssetNotFound { path } => PreflightError::SceneNotFound { path },
            other => other,
        })?;
        scene.path = path.to_string();
        self.active_scene = Some(scene);
        Ok(())
    }

    fn active_scene(&self) -> Option<&Scene> {
        self.active_scene.as_ref()
    }
}

impl PrefabIntrospection for FsProject {}
