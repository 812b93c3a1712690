//! Model inheritance resolution.
//!
//! Models are supplied by the caller (pack loading lives outside this crate);
//! the resolver only walks the `parent` chain and merges.

use crate::error::{GeometryError, Result};
use crate::model::{normalize_location, BlockModel};
use std::collections::HashMap;

/// Maximum depth for model inheritance to prevent infinite loops.
const MAX_INHERITANCE_DEPTH: usize = 20;

/// Lookup of unresolved models by resource location.
pub trait ModelSource {
    /// Get the model at a normalized location (e.g., "minecraft:block/stone").
    fn get_model(&self, location: &str) -> Option<&BlockModel>;
}

impl ModelSource for HashMap<String, BlockModel> {
    fn get_model(&self, location: &str) -> Option<&BlockModel> {
        self.get(location).or_else(|| {
            location
                .strip_prefix("minecraft:")
                .and_then(|short| self.get(short))
        })
    }
}

/// Resolves model inheritance chains.
pub struct ModelResolver<'a, S: ModelSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ModelSource + ?Sized> ModelResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolve a model with all inherited properties.
    pub fn resolve(&self, model_location: &str) -> Result<BlockModel> {
        self.resolve_internal(model_location, 0)
    }

    fn resolve_internal(&self, model_location: &str, depth: usize) -> Result<BlockModel> {
        if depth >= MAX_INHERITANCE_DEPTH {
            return Err(GeometryError::ModelInheritanceTooDeep(
                model_location.to_string(),
            ));
        }

        let normalized = normalize_location(model_location);

        let base_model = self.source.get_model(&normalized).ok_or_else(|| {
            GeometryError::ModelResolution(format!("Model not found: {}", normalized))
        })?;

        let parent_location = match &base_model.parent {
            Some(parent) => parent.clone(),
            None => return Ok(base_model.clone()),
        };

        // builtin/generated, builtin/entity have no JSON behind them
        if parent_location.starts_with("builtin/")
            || parent_location.starts_with("minecraft:builtin/")
        {
            log::debug!("{} stops at builtin parent {}", normalized, parent_location);
            let mut model = base_model.clone();
            model.parent = None;
            return Ok(model);
        }

        let parent_model = self.resolve_internal(&parent_location, depth + 1)?;

        Ok(merge_models(&parent_model, base_model))
    }
}

/// Merge a parent model into a child model.
/// Child properties override parent properties.
pub fn merge_models(parent: &BlockModel, child: &BlockModel) -> BlockModel {
    let mut merged = parent.clone();

    for (key, value) in &child.textures {
        merged.textures.insert(key.clone(), value.clone());
    }

    // Child elements replace parent elements wholesale
    if !child.elements.is_empty() {
        merged.elements = child.elements.clone();
    }

    if child.ambient_occlusion.is_some() {
        merged.ambient_occlusion = child.ambient_occlusion;
    }
    merged.parent = None;

    merged
}
