//! Template context: the single `Entry` binding exposed to archetypes.

use serde::Serialize;
use serde_json::{Map, Value};

use midas_core::Payload;

use crate::error::RenderError;

/// Rendering payload for an archetype.
///
/// Archetypes see exactly one variable, `Entry`, holding the full entry map
/// from the CMS: `{{ Entry.Title }}`, `{{ Entry.id }}`, plus any extra field.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeContext<'a> {
    #[serde(rename = "Entry")]
    pub entry: &'a Map<String, Value>,
}

impl<'a> ArchetypeContext<'a> {
    pub fn from_payload(payload: &'a Payload) -> Self {
        Self {
            entry: payload.entry(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
