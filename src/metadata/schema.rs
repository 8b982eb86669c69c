use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::layout::Rect;

/// Placement of one image inside the atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEntry {
    /// File overwritten when the atlas is split back
    pub original_path: PathBuf,
    pub filename: String,
    /// Content box in atlas pixels, excluding padding
    #[serde(rename = "box")]
    pub bounds: Rect,
}

/// Which on-disk layout a metadata record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Object form carrying the canvas size recorded at pack time
    Current { canvas_size: (u32, u32) },
    /// Bare item list with no canvas size; dimensions cannot be verified
    Legacy,
}

/// The placement table written next to every atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasMetadata {
    pub schema: Schema,
    pub items: Vec<PlacementEntry>,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(default)]
    canvas_size: Option<[u32; 2]>,
    #[serde(default)]
    items: Vec<PlacementEntry>,
}

#[derive(Serialize)]
struct CurrentDocument<'a> {
    canvas_size: [u32; 2],
    items: &'a [PlacementEntry],
}

impl AtlasMetadata {
    pub fn new(canvas_size: (u32, u32), items: Vec<PlacementEntry>) -> Self {
        Self {
            schema: Schema::Current { canvas_size },
            items,
        }
    }

    pub fn legacy(items: Vec<PlacementEntry>) -> Self {
        Self {
            schema: Schema::Legacy,
            items,
        }
    }

    /// Canvas size recorded at pack time, if the schema carries one
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        match self.schema {
            Schema::Current { canvas_size } => Some(canvas_size),
            Schema::Legacy => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.schema == Schema::Legacy
    }

    /// Parse either the current object form or a legacy bare item list.
    ///
    /// An object without `canvas_size` is read as legacy, and a missing
    /// `items` key yields an empty list.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;

        match value {
            Value::Array(_) => {
                let items: Vec<PlacementEntry> = serde_json::from_value(value)?;
                Ok(Self::legacy(items))
            }
            Value::Object(_) => {
                let raw: RawObject = serde_json::from_value(value)?;
                Ok(match raw.canvas_size {
                    Some([w, h]) => Self::new((w, h), raw.items),
                    None => Self::legacy(raw.items),
                })
            }
            other => Err(serde_json::Error::custom(format!(
                "expected an object or an array of items, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Serialize in the same schema the record was created or read with
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self.schema {
            Schema::Current {
                canvas_size: (w, h),
            } => serde_json::to_string_pretty(&CurrentDocument {
                canvas_size: [w, h],
                items: &self.items,
            }),
            Schema::Legacy => serde_json::to_string_pretty(&self.items),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
