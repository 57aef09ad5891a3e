//! Inference domain: request validation and the single prediction operation.
//!
//! TODO: Expose batch prediction once the frontend submits several profiles per call.

pub mod domain;
pub mod service;

pub use domain::{PredictInput, Prediction};
pub use service::PredictionService;
