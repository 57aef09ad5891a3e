//! Model artefacts: capability traits, fitted parameters and loading.

pub mod domain;
pub mod repo_fs;

pub use domain::{Classifier, GaussianNb, LinearRegressor, ModelBundle, Regressor};
pub use repo_fs::{FsModelRepo, ModelRepo};
