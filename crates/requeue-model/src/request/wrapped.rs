use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use super::Request;

/// An action that carries another request.
///
/// The retry stage never inspects `kind` or `payload`; it only descends into `original_request`
/// and rebuilds the wrapper around the updated inner request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WrappedRequest {
    /// Action type tag of the wrapper.
    pub kind: String,
    /// Opaque wrapper data.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
    /// The wrapped request.
    pub original_request: Box<Request>,
}

impl WrappedRequest {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value, inner: Request) -> Self {
        Self {
            kind: kind.into(),
            payload,
            original_request: Box::new(inner),
        }
    }
}
