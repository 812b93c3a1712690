//! Typed block model and blockstate definitions.

pub mod block_model;
pub mod blockstate;

pub use block_model::{normalize_location, BlockModel, ModelElement, ModelFace};
pub use blockstate::{BlockstateDefinition, ModelVariant, MultipartCase, VariantValue};
