//! Default variant selection for previewing a block in isolation.

use crate::error::{GeometryError, Result};
use crate::model::{BlockstateDefinition, ModelVariant};

/// Pick the variant a preview shows when no block properties are known.
///
/// Variants: `""`, then `"normal"`, then the first key in sorted order.
/// Multipart: the first unconditional case, else the first case.
pub fn default_variant(definition: &BlockstateDefinition) -> Result<&ModelVariant> {
    let variant = match definition {
        BlockstateDefinition::Variants(variants) => variants
            .get("")
            .or_else(|| variants.get("normal"))
            .or_else(|| variants.values().next())
            .and_then(|list| list.first()),
        BlockstateDefinition::Multipart(cases) => cases
            .iter()
            .find(|case| case.when.is_none())
            .or_else(|| cases.first())
            .and_then(|case| case.apply.first()),
    };

    variant.ok_or_else(|| {
        GeometryError::BlockstateResolution("blockstate has no model variants".to_string())
    })
}
