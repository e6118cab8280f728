// ABOUTME: HTTP middleware for request correlation, rate limiting, and CORS
// ABOUTME: Provides request ID propagation, span creation, and per-client request limits

/// CORS configuration
pub mod cors;
/// Per-client rate limiting with standard headers
pub mod rate_limiting;
/// Request ID propagation and request spans
pub mod request_id;

pub use cors::setup_cors;
pub use rate_limiting::{client_ip, create_rate_limit_headers, headers, rate_limit_middleware};
pub use request_id::{create_request_span, request_id_middleware, RequestId};
