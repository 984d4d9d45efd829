use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::strategy::{RetryPolicy, lenient_policy};

/// Caller-supplied request options.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Retry policy override. A malformed value decodes as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_policy",
        skip_serializing_if = "Option::is_none"
    )]
    pub when_failing: Option<RetryPolicy>,
}

/// Pipeline bookkeeping attached to a request.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    /// Retries already scheduled for this lineage.
    ///
    /// Written only by the retry stage, which increments it by one per scheduled retry.
    #[serde(default)]
    pub retry_count: u32,
}
