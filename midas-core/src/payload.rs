//! Typed content payload, validated at the boundary.
//!
//! A CMS webhook delivers two untyped maps: `metadata` (must name the
//! `model`) and `entry` (must carry `Title` and an integer `id`). [`Payload`]
//! checks those fields once, up front, and keeps the full entry map so every
//! extra field still reaches the archetype verbatim.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PayloadError;
use crate::types::{EntryId, ModelName};

/// Field holding the entry's human title.
pub const TITLE_FIELD: &str = "Title";
/// Field holding the entry's numeric identifier.
pub const ID_FIELD: &str = "id";
/// Metadata field naming the content model.
pub const MODEL_FIELD: &str = "model";

/// A validated content-change payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    model: ModelName,
    id: i64,
    title: String,
    entry: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    entry: Map<String, Value>,
}

impl Payload {
    /// Validate raw `metadata` and `entry` maps.
    pub fn from_maps(
        metadata: Map<String, Value>,
        entry: Map<String, Value>,
    ) -> Result<Self, PayloadError> {
        let model = match metadata.get(MODEL_FIELD) {
            None | Some(Value::Null) => {
                return Err(PayloadError::MissingMetadata { field: MODEL_FIELD })
            }
            Some(Value::String(s)) if !s.is_empty() => ModelName::from(s.as_str()),
            Some(_) => {
                return Err(PayloadError::InvalidField {
                    field: MODEL_FIELD,
                    expected: "a non-empty string",
                })
            }
        };

        let title = match entry.get(TITLE_FIELD) {
            None | Some(Value::Null) => {
                return Err(PayloadError::MissingField { field: TITLE_FIELD })
            }
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => {
                return Err(PayloadError::InvalidField {
                    field: TITLE_FIELD,
                    expected: "a string, number or boolean",
                })
            }
        };

        let id = match entry.get(ID_FIELD) {
            None | Some(Value::Null) => return Err(PayloadError::MissingField { field: ID_FIELD }),
            Some(v) => v.as_i64().ok_or(PayloadError::InvalidField {
                field: ID_FIELD,
                expected: "an integer",
            })?,
        };

        Ok(Self {
            model,
            id,
            title,
            entry,
        })
    }

    /// Parse and validate a `{ "metadata": {...}, "entry": {...} }` document.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let raw: RawPayload = serde_json::from_str(json)?;
        Self::from_maps(raw.metadata, raw.entry)
    }

    pub fn model(&self) -> &ModelName {
        &self.model
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// The title, stringified when the CMS sent a number or boolean.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The full entry map, including `Title` and `id`.
    pub fn entry(&self) -> &Map<String, Value> {
        &self.entry
    }

    /// `"<model>-<id>"`.
    pub fn entry_id(&self) -> EntryId {
        EntryId::new(&self.model, self.id)
    }
}
