// lib.rs - prediction service wiring
pub mod api;
pub mod common;
pub mod features;
pub mod inference;
pub mod models;

pub use api::router;
pub use common::{PredictCode, PredictError, PredictResult};
pub use inference::{PredictInput, Prediction, PredictionService};
