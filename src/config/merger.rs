//! Layering of configuration files.
//!
//! The local override file is overlaid on the project config:
//!
//! - Mappings merge key by key
//! - Sequences are replaced whole, so a local `disabled:` list wins outright
//! - A `null` in the overlay removes the key, restoring the built-in default
//! - An empty file (a `null` document) changes nothing

use serde_yaml::Value;

/// Overlay one YAML value on another.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();

            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                } else if let Some(existing) = base_map.get(key) {
                    merged.insert(key.clone(), deep_merge(existing, value));
                } else {
                    merged.insert(key.clone(), value.clone());
                }
            }

            Value::Mapping(merged)
        }
        (base, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Merge config layers in order, later layers taking precedence.
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn local_setting_overrides_project_setting() {
        let base = yaml("settings:\n  fail_on: error\n  assets_dir: Assets\n");
        let overlay = yaml("settings:\n  fail_on: warning\n");

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["settings"]["fail_on"], "warning");
        assert_eq!(result["settings"]["assets_dir"], "Assets");
    }

    #[test]
    fn sequences_are_replaced() {
        let base = yaml("rules:\n  disabled: [offscreen-update, obody-avatar]\n");
        let overlay = yaml("rules:\n  disabled: [addressable-shader]\n");

        let result = deep_merge(&base, &overlay);
        let disabled = result["rules"]["disabled"].as_sequence().unwrap();

        assert_eq!(disabled.len(), 1);
        assert_eq!(disabled[0], "addressable-shader");
    }

    #[test]
    fn null_removes_key() {
        let base = yaml("settings:\n  fail_on: never\n  assets_dir: Content\n");
        let overlay = yaml("settings:\n  fail_on: null\n");

        let result = deep_merge(&base, &overlay);

        assert!(result["settings"].get("fail_on").is_none());
        assert_eq!(result["settings"]["assets_dir"], "Content");
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let layers = vec![yaml("settings:\n  fail_on: warning\n"), yaml("")];
        let result = merge_configs(&layers);
        assert_eq!(result["settings"]["fail_on"], "warning");
    }

    #[test]
    fn merge_of_nothing_is_empty_mapping() {
        let result = merge_configs(&[]);
        assert!(result.as_mapping().unwrap().is_empty());
    }
}
