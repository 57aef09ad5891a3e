//! Public entry points for HTTP clients.

pub mod http;

pub use http::router;
