mod retry;
pub use retry::RetryPolicy;
pub(crate) use retry::lenient_policy;
