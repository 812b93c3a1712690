//! Texture variable, model inheritance and blockstate variant resolution.

pub mod model_resolver;
pub mod state_resolver;
pub mod texture;

pub use model_resolver::{merge_models, ModelResolver, ModelSource};
pub use state_resolver::default_variant;
pub use texture::{resolve_texture, resolve_texture_map};
