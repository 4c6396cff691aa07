//! Built-in pre-flight rules.

pub mod addressable_shader;
pub mod obody_avatar;
pub mod offscreen_update;
pub mod prefab_overrides;

pub use addressable_shader::AddressableShaderRule;
pub use obody_avatar::ObodyAvatarRule;
pub use offscreen_update::OffscreenUpdateRule;
pub use prefab_overrides::PrefabOverridesInScenesRule;
