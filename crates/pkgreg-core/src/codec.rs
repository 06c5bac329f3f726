//! Serialization of `paths` values at the storage boundary.
//!
//! The registry treats `paths` as opaque structured data. A codec turns it
//! into the text stored in the `paths` column and back again; whatever a codec
//! accepts on `encode` must come back structurally equal from `decode`.

use crate::error::Result;
use serde_json::Value;

/// Encoder/decoder for the `paths` column.
pub trait PathsCodec: Send + Sync {
    /// Serialize a value for storage.
    fn encode(&self, paths: &Value) -> Result<String>;

    /// Rebuild a value from its stored form.
    fn decode(&self, raw: &str) -> Result<Value>;
}

/// Compact JSON text, the default on-disk form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PathsCodec for JsonCodec {
    fn encode(&self, paths: &Value) -> Result<String> {
        Ok(serde_json::to_string(paths)?)
    }

    fn decode(&self, raw: &str) -> Result<Value> {
        Ok(serde_json::from_str(raw)?)
    }
}
