//! # Block Geometry
//!
//! Resolve Minecraft block models into renderable geometry.
//!
//! ## Overview
//!
//! This library takes a flattened block model (plus an optional blockstate
//! rotation, biome color and texture handle map) and produces, per model
//! element, flat position/normal/uv/index buffers with material groups and
//! tint categories. Computation runs on a background worker with an inline
//! fallback.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_geometry::{BlockModel, BlockstateRotation, GeometryRequest, GeometryScheduler};
//!
//! let model = BlockModel::from_json(&json)?;
//! let scheduler = GeometryScheduler::default();
//!
//! let request = GeometryRequest::new(model)
//!     .with_rotation(BlockstateRotation::new(0, 90, true));
//! let response = scheduler.compute(request)?.await?;
//!
//! for element in &response.elements {
//!     for group in &element.material_groups {
//!         // one draw call per group
//!     }
//! }
//! ```
//!
//! ## Synchronous use
//!
//! The pipeline itself is pure; call it directly when no worker is wanted:
//!
//! ```ignore
//! use block_geometry::{build_model, GeometryOptions};
//!
//! let geometry = build_model(&model, &GeometryOptions::default());
//! ```

pub mod error;
pub mod export;
pub mod mesher;
pub mod model;
pub mod resolver;
pub mod scheduler;
pub mod types;

// Re-export main types for convenience
pub use error::{GeometryError, Result};
pub use mesher::{
    build_model, Diagnostic, GeometryOptions, GeometryResult, Material, MaterialGroup,
    ModelGeometry, TintCategory, TintColors,
};
pub use model::{BlockModel, BlockstateDefinition, ModelElement, ModelFace};
pub use resolver::{resolve_texture, ModelResolver};
pub use scheduler::{
    ComputeHandle, FallbackPolicy, GeometryRequest, GeometryScheduler, SchedulerConfig,
    WorkerResponse,
};
pub use types::{Axis, BlockstateRotation, BoundingBox, Direction, ElementRotation, Rgb};
