//! Request and response messages crossing the worker boundary.
//!
//! Everything is owned: buffers move into the response and then to the
//! caller without being copied.

use crate::mesher::{build_model, GeometryOptions, GeometryResult, TintCategory, TintColors};
use crate::model::BlockModel;
use crate::types::{BlockstateRotation, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inputs for one geometry computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRequest {
    /// Flattened model (no parent left to resolve).
    pub model: BlockModel,
    /// Texture id to loadable handle, used only for material grouping.
    #[serde(default)]
    pub resolved_textures: HashMap<String, String>,
    #[serde(default)]
    pub biome_color: Option<Rgb>,
    #[serde(default)]
    pub blockstate_rotation: Option<BlockstateRotation>,
}

impl GeometryRequest {
    pub fn new(model: BlockModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    pub fn with_resolved_textures(mut self, textures: HashMap<String, String>) -> Self {
        self.resolved_textures = textures;
        self
    }

    pub fn with_biome_color(mut self, color: Rgb) -> Self {
        self.biome_color = Some(color);
        self
    }

    pub fn with_rotation(mut self, rotation: BlockstateRotation) -> Self {
        self.blockstate_rotation = Some(rotation);
        self
    }
}

/// A request tagged with its correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub id: u64,
    #[serde(flatten)]
    pub request: GeometryRequest,
}

/// The computed geometry for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: u64,
    pub elements: Vec<GeometryResult>,
    /// Echo of the request's rotation.
    pub blockstate_rotation: Option<BlockstateRotation>,
    pub tint_colors: TintColors,
}

impl WorkerResponse {
    pub fn tint_color(&self, category: TintCategory) -> [f32; 3] {
        self.tint_colors.color(category)
    }
}

/// Run the geometry pipeline for one request.
///
/// Shared by the worker thread and the inline fallback, so both paths
/// produce identical results.
pub fn compute_geometry(request: WorkerRequest) -> WorkerResponse {
    let WorkerRequest { id, request } = request;

    let options = GeometryOptions {
        rotation: request.blockstate_rotation,
        biome_color: request.biome_color,
        texture_handles: request.resolved_textures,
        occluded: Vec::new(),
    };
    let geometry = build_model(&request.model, &options);

    WorkerResponse {
        id,
        elements: geometry.elements,
        blockstate_rotation: geometry.rotation,
        tint_colors: geometry.tint_colors,
    }
}
