//! Event payloads and the `JSON_WRAP`/`EVENT` "digest of wrapped JSON"
//! shape they share.
//!
//! Grounded on the teacher's evidence event struct: a serde-derived,
//! content-hashable payload with a lifecycle state plus free-form
//! input/output/codebase fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cake::{Cake, CakeRole, CakeType};
use crate::errors::{CakeError, EncodingError};

/// Lifecycle state of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    /// Just created, not yet started.
    New = 1,
    /// Currently running.
    InProcess = 2,
    /// Completed without error.
    Success = 3,
    /// Completed with an error.
    Fail = 4,
}

/// A structured event payload: lifecycle state plus input/output and two
/// optional free-form fields. Serializes to JSON; the serialized bytes are
/// what an `EVENT` Cake's digest is computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Current lifecycle state.
    pub state: EventState,
    /// Input given to whatever produced this event.
    pub input: Value,
    /// Output produced, if any.
    pub output: Value,
    /// Identifies the code version that produced this event, if tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codebase: Option<String>,
    /// Additional free-form data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
}

impl Event {
    /// Build a new event in the `NEW` state.
    pub fn new(input: Value) -> Self {
        Self {
            state: EventState::New,
            input,
            output: Value::Null,
            codebase: None,
            additional_data: None,
        }
    }

    /// Serialize to the canonical JSON bytes this event's Cake digests.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CakeError> {
        serde_json::to_vec(self).map_err(|e| CakeError::Remote(format!("event serialization failed: {e}")))
    }

    /// Build the `EVENT` Cake for this event: role `SYNAPSE`, payload is
    /// the SHA-256 digest of the serialized event.
    pub fn to_cake(&self) -> Result<Cake, CakeError> {
        let bytes = self.to_json_bytes()?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        JsonWrap::cake_for_digest(digest, CakeType::Event, CakeRole::Synapse)
    }
}

/// Helper shared between `EVENT` and `JSON_WRAP`: both Cake types are a
/// digest of some serialized JSON value, differing only in the role
/// attached by their producer.
pub struct JsonWrap;

impl JsonWrap {
    /// Wrap `value` as a `JSON_WRAP` Cake: role `SYNAPSE`, payload is the
    /// SHA-256 digest of `value`'s canonical `serde_json` serialization.
    pub fn wrap(value: &Value) -> Result<Cake, CakeError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| CakeError::Remote(format!("json serialization failed: {e}")))?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        Self::cake_for_digest(digest, CakeType::JsonWrap, CakeRole::Synapse)
    }

    fn cake_for_digest(digest: [u8; 32], cake_type: CakeType, role: CakeRole) -> Result<Cake, CakeError> {
        if !cake_type.is_resolved() {
            return Err(EncodingError::WrongPayloadLength {
                cake_type,
                actual: 0,
            }
            .into());
        }
        Cake::parse(&{
            let header = (cake_type.code() << 1) | role.as_bit();
            let mut bytes = Vec::with_capacity(1 + 32);
            bytes.push(header);
            bytes.extend_from_slice(&digest);
            cake_common::BASE62.encode(&bytes)
        })
    }
}
