mod http;
pub use http::HttpRequest;

mod meta;
pub use meta::{RequestMeta, RequestOptions};

mod wrapped;
pub use wrapped::WrappedRequest;

use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// A request as it travels through the data layer.
///
/// Either a plain HTTP request, or an action that wraps another request (for instance a tracking or
/// optimistic-update action). Wrappers can nest arbitrarily; retry bookkeeping always lives on the
/// innermost [`HttpRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Request {
    /// An action carrying another request under `originalRequest`.
    Wrapped(WrappedRequest),
    /// A plain HTTP request.
    Http(HttpRequest),
}

impl Request {
    /// Wrap this request into an action of the given kind.
    pub fn wrap(self, kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Request::Wrapped(WrappedRequest::new(kind, payload, self))
    }

    /// Returns the innermost HTTP request.
    pub fn innermost(&self) -> &HttpRequest {
        match self {
            Request::Http(http) => http,
            Request::Wrapped(w) => w.original_request.innermost(),
        }
    }

    /// Rebuild this request with `f` applied to the innermost HTTP request.
    ///
    /// Every wrapper on the way down is reproduced unchanged.
    pub fn map_innermost<F>(&self, f: F) -> Request
    where
        F: FnOnce(&HttpRequest) -> HttpRequest,
    {
        match self {
            Request::Http(http) => Request::Http(f(http)),
            Request::Wrapped(w) => Request::Wrapped(WrappedRequest {
                kind: w.kind.clone(),
                payload: w.payload.clone(),
                original_request: Box::new(w.original_request.map_innermost(f)),
            }),
        }
    }

    /// Number of wrappers around the innermost HTTP request.
    pub fn depth(&self) -> usize {
        match self {
            Request::Http(_) => 0,
            Request::Wrapped(w) => 1 + w.original_request.depth(),
        }
    }

    /// Retries already performed for this request lineage.
    pub fn retry_count(&self) -> u32 {
        self.innermost().retry_count()
    }
}

impl From<HttpRequest> for Request {
    fn from(http: HttpRequest) -> Self {
        Request::Http(http)
    }
}

impl From<WrappedRequest> for Request {
    fn from(w: WrappedRequest) -> Self {
        Request::Wrapped(w)
    }
}
