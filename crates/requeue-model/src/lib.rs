mod domain;
pub use domain::{DEFAULT_API_VERSION, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
pub use domain::Query;

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::HttpMethod;

mod request;
pub use request::{HttpRequest, Request, RequestMeta, RequestOptions, WrappedRequest};

mod strategy;
pub use strategy::RetryPolicy;
