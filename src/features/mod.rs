//! Categorical encodings and model feature layouts.

pub mod domain;

pub use domain::{ClassifierFeatures, Gender, RegressorFeatures, Severity, StressLevel};
