//! HTTP middleware

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{RateLimiterConfig, RateLimiterLayer, RateLimiterState};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
