//! Texture variable resolution.
//!
//! Face textures are either concrete ids (`minecraft:block/stone`) or
//! `#variable` references into the model's texture map, which may chain
//! (`#side -> #all -> block/stone`).

use std::collections::HashMap;

/// Resolve a face texture reference to a concrete texture id.
///
/// Returns `None` when the chain hits an undefined variable, an empty id, or
/// takes more steps than there are texture entries (a cycle).
pub fn resolve_texture<'a>(
    reference: &'a str,
    textures: &'a HashMap<String, String>,
) -> Option<&'a str> {
    let max_steps = textures.len() + 1;
    let mut current = reference;

    for _ in 0..=max_steps {
        match current.strip_prefix('#') {
            Some(key) => current = textures.get(key)?.as_str(),
            None if current.is_empty() => return None,
            None => return Some(current),
        }
    }

    None
}

/// Resolve every entry of a texture map.
/// Entries whose chain does not terminate in a concrete id are left out.
pub fn resolve_texture_map(textures: &HashMap<String, String>) -> HashMap<String, String> {
    textures
        .iter()
        .filter_map(|(key, value)| {
            resolve_texture(value, textures).map(|id| (key.clone(), id.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textures(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_concrete_reference_unchanged() {
        let map = textures(&[]);
        assert_eq!(resolve_texture("block/dirt", &map), Some("block/dirt"));
    }

    #[test]
    fn test_resolve_chain() {
        let map = textures(&[("all", "#base"), ("base", "minecraft:block/stone")]);
        assert_eq!(resolve_texture("#all", &map), Some("minecraft:block/stone"));
        assert_eq!(resolve_texture("#base", &map), Some("minecraft:block/stone"));
    }

    #[test]
    fn test_self_cycle_is_unresolved() {
        let map = textures(&[("all", "#all")]);
        assert_eq!(resolve_texture("#all", &map), None);
    }

    #[test]
    fn test_two_step_cycle_is_unresolved() {
        let map = textures(&[("a", "#b"), ("b", "#a"), ("c", "block/stone")]);
        assert_eq!(resolve_texture("#a", &map), None);
        assert_eq!(resolve_texture("#c", &map), Some("block/stone"));
    }

    #[test]
    fn test_missing_variable_is_unresolved() {
        let map = textures(&[("all", "block/stone")]);
        assert_eq!(resolve_texture("#side", &map), None);
        assert_eq!(resolve_texture("#", &map), None);
        assert_eq!(resolve_texture("", &map), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let map = textures(&[("all", "#base"), ("base", "minecraft:block/stone")]);
        let once = resolve_texture("#all", &map).unwrap();
        assert_eq!(resolve_texture(once, &map), Some(once));
    }

    #[test]
    fn test_resolve_texture_map_drops_cycles() {
        let map = textures(&[
            ("particle", "#all"),
            ("all", "block/stone"),
            ("loop", "#loop"),
        ]);
        let resolved = resolve_texture_map(&map);
        assert_eq!(resolved.get("particle"), Some(&"block/stone".to_string()));
        assert_eq!(resolved.get("all"), Some(&"block/stone".to_string()));
        assert!(!resolved.contains_key("loop"));
    }
}
