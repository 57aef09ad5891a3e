//! Filesystem repository for the fitted model artefacts.
//!
//! TODO: Verify a checksum written by the export step before trusting parameters.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::common::config::AppCfg;
use crate::common::error::{PredictError, PredictResult};

use super::domain::{GaussianNb, LinearRegressor, ModelBundle};

/// Repository contract for model artefacts.
pub trait ModelRepo {
    fn load_regressor(&self) -> PredictResult<LinearRegressor>;
    fn load_classifier(&self) -> PredictResult<GaussianNb>;

    /// Load and validate both artefacts.
    fn load_bundle(&self) -> PredictResult<ModelBundle> {
        let regressor = self.load_regressor()?;
        let classifier = self.load_classifier()?;
        Ok(ModelBundle {
            regressor: Arc::new(regressor),
            classifier: Arc::new(classifier),
        })
    }
}

/// Reads JSON artefacts from fixed paths under `cfg.model_root`.
pub struct FsModelRepo {
    regressor_path: PathBuf,
    classifier_path: PathBuf,
}

impl FsModelRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self {
            regressor_path: cfg.regressor_path(),
            classifier_path: cfg.classifier_path(),
        }
    }

    pub fn regressor_path(&self) -> &Path {
        &self.regressor_path
    }

    pub fn classifier_path(&self) -> &Path {
        &self.classifier_path
    }
}

impl ModelRepo for FsModelRepo {
    fn load_regressor(&self) -> PredictResult<LinearRegressor> {
        let model: LinearRegressor = read_json(&self.regressor_path)?;
        model.validate().map_err(|err| at_path(&self.regressor_path, err))?;
        warn_if_sample(&self.regressor_path, model.is_sample());
        tracing::debug!(path = %self.regressor_path.display(), "regressor loaded");
        Ok(model)
    }

    fn load_classifier(&self) -> PredictResult<GaussianNb> {
        let model: GaussianNb = read_json(&self.classifier_path)?;
        model.validate().map_err(|err| at_path(&self.classifier_path, err))?;
        warn_if_sample(&self.classifier_path, model.is_sample());
        tracing::debug!(
            path = %self.classifier_path.display(),
            classes = model.classes.len(),
            "classifier loaded"
        );
        Ok(model)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> PredictResult<T> {
    let raw = fs::read_to_string(path).map_err(|err| PredictError::io(path, &err))?;
    serde_json::from_str(&raw)
        .map_err(|err| PredictError::model_missing(format!("{}: {err}", path.display())))
}

fn warn_if_sample(path: &Path, sample: bool) {
    if sample {
        tracing::warn!(
            path = %path.display(),
            "artefact is tagged as sample data; predictions are not from a trained model"
        );
    }
}

fn at_path(path: &Path, err: PredictError) -> PredictError {
    PredictError::new(err.code, format!("{}: {}", path.display(), err.msg))
}
