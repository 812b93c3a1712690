//! Material grouping.
//!
//! Every face resolves to a [`Material`]: a concrete texture id, or a
//! diagnostic marker when there is nothing sensible to show. Consecutive
//! faces with the same material and tint category share one index range.

use super::tint::TintCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Placeholder materials that make failures visible in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// The model resolved to zero elements.
    NoElements,
    /// A face texture could not be resolved, or its element was malformed.
    MissingTexture,
}

impl Diagnostic {
    /// Flat RGB color the placeholder renders with.
    pub fn color(&self) -> [f32; 3] {
        match self {
            Diagnostic::NoElements => [1.0, 0.0, 0.0],
            Diagnostic::MissingTexture => [1.0, 0.0, 1.0],
        }
    }
}

/// What a material group is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Material {
    /// A resolved texture id, e.g. `minecraft:block/dirt`.
    Texture(String),
    Diagnostic(Diagnostic),
}

impl Material {
    pub fn texture(id: impl Into<String>) -> Self {
        Material::Texture(id.into())
    }

    pub fn texture_id(&self) -> Option<&str> {
        match self {
            Material::Texture(id) => Some(id.as_str()),
            Material::Diagnostic(_) => None,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Material::Diagnostic(_))
    }
}

/// A contiguous range of indices drawn with one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialGroup {
    pub material: Material,
    /// First index into [`GeometryResult::indices`](super::GeometryResult::indices).
    pub start: u32,
    /// Number of indices (a multiple of 6: two triangles per face).
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<TintCategory>,
    /// Loaded-texture handle attached by [`attach_texture_handles`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_handle: Option<String>,
}

impl MaterialGroup {
    pub fn new(material: Material, start: u32, count: u32, tint: Option<TintCategory>) -> Self {
        Self {
            material,
            start,
            count,
            tint,
            texture_handle: None,
        }
    }

    pub fn index_range(&self) -> Range<usize> {
        self.start as usize..(self.start + self.count) as usize
    }

    fn extends(&self, material: &Material, tint: Option<TintCategory>, start: u32) -> bool {
        self.material == *material && self.tint == tint && self.start + self.count == start
    }
}

/// Append `count` indices starting at `start` to the group list, merging into
/// the last group when material and tint match.
pub fn push_group(
    groups: &mut Vec<MaterialGroup>,
    material: Material,
    tint: Option<TintCategory>,
    start: u32,
    count: u32,
) {
    if let Some(last) = groups.last_mut() {
        if last.extends(&material, tint, start) {
            last.count += count;
            return;
        }
    }
    groups.push(MaterialGroup::new(material, start, count, tint));
}

/// Attach loaded-texture handles to texture groups.
///
/// Lookup tries the id as-is and with the `minecraft:` namespace added or
/// removed. An empty map means no textures were loaded and leaves groups
/// untouched; otherwise a texture group the map does not know becomes a
/// [`Diagnostic::MissingTexture`] group.
pub fn attach_texture_handles(groups: &mut [MaterialGroup], handles: &HashMap<String, String>) {
    if handles.is_empty() {
        return;
    }

    for group in groups.iter_mut() {
        let Some(id) = group.material.texture_id() else {
            continue;
        };

        match lookup_handle(id, handles) {
            Some(handle) => group.texture_handle = Some(handle.to_string()),
            None => {
                log::debug!("No loaded texture for {}, using missing-texture material", id);
                group.material = Material::Diagnostic(Diagnostic::MissingTexture);
                group.tint = None;
                group.texture_handle = None;
            }
        }
    }
}

fn lookup_handle<'a>(id: &str, handles: &'a HashMap<String, String>) -> Option<&'a str> {
    if let Some(handle) = handles.get(id) {
        return Some(handle.as_str());
    }
    let alternate = match id.strip_prefix("minecraft:") {
        Some(short) => short.to_string(),
        None if !id.contains(':') => format!("minecraft:{}", id),
        None => return None,
    };
    handles.get(&alternate).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_group_coalesces_runs() {
        let mut groups = Vec::new();
        let dirt = Material::texture("minecraft:block/dirt");

        push_group(&mut groups, dirt.clone(), None, 0, 6);
        push_group(&mut groups, dirt.clone(), None, 6, 6);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].index_range(), 0..12);

        // Same texture, different tint: new group
        push_group(&mut groups, dirt.clone(), Some(TintCategory::Grass), 12, 6);
        // Different texture
        push_group(&mut groups, Material::texture("minecraft:block/stone"), None, 18, 6);
        assert_eq!(groups.len(), 3);

        // Back to dirt after stone does not reopen the first group
        push_group(&mut groups, dirt, None, 24, 6);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn test_diagnostic_colors() {
        assert_eq!(Diagnostic::NoElements.color(), [1.0, 0.0, 0.0]);
        assert_eq!(Diagnostic::MissingTexture.color(), [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_attach_handles_both_namespace_forms() {
        let mut groups = vec![
            MaterialGroup::new(Material::texture("minecraft:block/dirt"), 0, 6, None),
            MaterialGroup::new(Material::texture("block/stone"), 6, 6, None),
        ];
        let handles: HashMap<String, String> = [
            ("block/dirt".to_string(), "tex-0".to_string()),
            ("minecraft:block/stone".to_string(), "tex-1".to_string()),
        ]
        .into_iter()
        .collect();

        attach_texture_handles(&mut groups, &handles);
        assert_eq!(groups[0].texture_handle.as_deref(), Some("tex-0"));
        assert_eq!(groups[1].texture_handle.as_deref(), Some("tex-1"));
    }

    #[test]
    fn test_attach_handles_unknown_becomes_missing() {
        let mut groups = vec![MaterialGroup::new(
            Material::texture("minecraft:block/grass_block_top"),
            0,
            6,
            Some(TintCategory::Grass),
        )];
        let handles: HashMap<String, String> =
            [("minecraft:block/dirt".to_string(), "tex-0".to_string())]
                .into_iter()
                .collect();

        attach_texture_handles(&mut groups, &handles);
        assert_eq!(groups[0].material, Material::Diagnostic(Diagnostic::MissingTexture));
        assert_eq!(groups[0].tint, None);
    }

    #[test]
    fn test_attach_handles_empty_map_is_noop() {
        let mut groups = vec![MaterialGroup::new(Material::texture("block/dirt"), 0, 6, None)];
        attach_texture_handles(&mut groups, &HashMap::new());
        assert_eq!(groups[0].material, Material::texture("block/dirt"));
        assert_eq!(groups[0].texture_handle, None);
    }

    #[test]
    fn test_material_serialization() {
        let json = serde_json::to_string(&Material::Diagnostic(Diagnostic::NoElements)).unwrap();
        assert_eq!(json, r#"{"kind":"diagnostic","value":"no_elements"}"#);
        let back: Material = serde_json::from_str(r#"{"kind":"texture","value":"block/dirt"}"#).unwrap();
        assert_eq!(back, Material::texture("block/dirt"));
    }
}
