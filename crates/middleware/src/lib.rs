pub mod api_middleware;
pub mod validation;

pub use api_middleware::{logging_middleware, security_headers_middleware};
