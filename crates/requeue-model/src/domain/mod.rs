mod query;
pub use query::Query;

mod constants;
pub use constants::{DEFAULT_API_VERSION, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
