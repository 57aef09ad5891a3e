//! Shared utilities that glue the service layers together.
pub mod config;
pub mod error;
pub mod log;

pub use error::{PredictCode, PredictError, PredictResult};
