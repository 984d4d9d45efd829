use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::{
    HttpMethod, Query, RetryPolicy,
    domain::DEFAULT_API_VERSION,
    request::{RequestMeta, RequestOptions},
};

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Declarative description of an HTTP request issued through the data layer.
///
/// `HttpRequest` describes *what* to send and *what* to do with the result; it never performs I/O.
///
/// Fields cover:
/// - the call itself (`method`, `path`, `api_version`, `query`, `body`)
/// - continuation tags handed back to the issuer (`on_success`, `on_failure`)
/// - caller options such as the retry policy override (`options`)
/// - pipeline bookkeeping (`meta`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path, relative to the API root.
    pub path: String,
    /// API version the path belongs to.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Query-string parameters.
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub query: Query,
    /// Request body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Continuation emitted by the issuer when the request succeeds.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub on_success: serde_json::Value,
    /// Continuation emitted by the issuer when the request fails for good.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub on_failure: serde_json::Value,
    /// Caller options.
    #[serde(default)]
    pub options: RequestOptions,
    /// Pipeline bookkeeping.
    #[serde(default)]
    pub meta: RequestMeta,
}

impl HttpRequest {
    /// Create a request with default version, no options and a fresh lineage.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            api_version: default_api_version(),
            query: Query::default(),
            body: None,
            on_success: serde_json::Value::Null,
            on_failure: serde_json::Value::Null,
            options: RequestOptions::default(),
            meta: RequestMeta::default(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Attach an explicit retry policy (`options.whenFailing`).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.options.when_failing = Some(policy);
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn on_success(mut self, action: serde_json::Value) -> Self {
        self.on_success = action;
        self
    }

    pub fn on_failure(mut self, action: serde_json::Value) -> Self {
        self.on_failure = action;
        self
    }

    /// Explicit retry policy, if the caller set one.
    pub fn policy(&self) -> Option<&RetryPolicy> {
        self.options.when_failing.as_ref()
    }

    /// Retries already performed for this lineage.
    pub fn retry_count(&self) -> u32 {
        self.meta.retry_count
    }

    /// Copy of this request marked as the next attempt of the same lineage.
    pub fn next_attempt(&self) -> Self {
        let mut next = self.clone();
        next.meta.retry_count = self.meta.retry_count.saturating_add(1);
        next
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_request_starts_a_fresh_lineage() {
        let req = HttpRequest::get("/sites");

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.api_version, "v1");
        assert_eq!(req.retry_count(), 0);
        assert!(req.policy().is_none());
    }

    #[test]
    fn next_attempt_only_bumps_retry_count() {
        let req = HttpRequest::get("/sites")
            .with_policy(RetryPolicy::simple_retry(1_000, 3))
            .on_failure(json!({ "type": "FAIL" }));

        let next = req.next_attempt().next_attempt();

        assert_eq!(next.retry_count(), 2);
        assert_eq!(next.path, req.path);
        assert_eq!(next.options, req.options);
        assert_eq!(next.on_failure, req.on_failure);
    }

    #[test]
    fn serde_skips_empty_fields() {
        let json = serde_json::to_value(HttpRequest::get("/me")).unwrap();

        assert_eq!(
            json,
            json!({
                "method": "GET",
                "path": "/me",
                "apiVersion": "v1",
                "options": {},
                "meta": { "retryCount": 0 }
            })
        );
    }

    #[test]
    fn decode_fills_defaults() {
        let req: HttpRequest =
            serde_json::from_value(json!({ "method": "POST", "path": "/sites/new" })).unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.api_version, "v1");
        assert_eq!(req.retry_count(), 0);
        assert!(req.body.is_none());
    }
}
