//! Model capabilities and the fitted-parameter artefacts behind them.
//!
//! The prediction service only sees [`Regressor`] and [`Classifier`]; the
//! concrete artefact types are built once by the repository and never mutated.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::common::error::{PredictError, PredictResult};
use crate::features::domain::{ClassifierFeatures, RegressorFeatures};

/// Capability: map the regressor tuple to a single number.
pub trait Regressor: Send + Sync {
    fn kind(&self) -> &'static str;
    fn predict(&self, features: &RegressorFeatures) -> PredictResult<f64>;
}

/// Capability: map the classifier tuple to a category code.
pub trait Classifier: Send + Sync {
    fn kind(&self) -> &'static str;
    fn predict(&self, features: &ClassifierFeatures) -> PredictResult<i64>;
}

/// Both models, loaded together before serving begins.
#[derive(Clone)]
pub struct ModelBundle {
    pub regressor: Arc<dyn Regressor>,
    pub classifier: Arc<dyn Classifier>,
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("regressor", &self.regressor.kind())
            .field("classifier", &self.classifier.kind())
            .finish()
    }
}

/// Ordinary least squares fit: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinearRegressor {
    pub kind: String,
    /// Provenance written by the export step; `"sample"` marks fixture data.
    #[serde(default)]
    pub source: Option<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub const KIND: &'static str = "linear_regression";

    pub fn is_sample(&self) -> bool {
        is_sample(self.source.as_deref())
    }

    /// Check the artefact against the regressor tuple layout.
    pub fn validate(&self) -> PredictResult<()> {
        expect_kind(&self.kind, Self::KIND)?;
        expect_features(&self.feature_names, &RegressorFeatures::NAMES)?;
        if self.coefficients.len() != RegressorFeatures::NAMES.len() {
            return Err(PredictError::model_missing(format!(
                "linear_regression: expected {} coefficients, found {}",
                RegressorFeatures::NAMES.len(),
                self.coefficients.len()
            )));
        }
        if !all_finite(&self.coefficients) || !self.intercept.is_finite() {
            return Err(PredictError::model_missing(
                "linear_regression: parameters must be finite",
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn predict(&self, features: &RegressorFeatures) -> PredictResult<f64> {
        let x = features.to_array();
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(x.iter())
            .map(|(c, v)| c * v)
            .sum();
        Ok(self.intercept + dot)
    }
}

/// Gaussian Naive Bayes fit, stored with per-class means (`theta`) and
/// variances (`var`).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GaussianNb {
    pub kind: String,
    #[serde(default)]
    pub source: Option<String>,
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub class_prior: Vec<f64>,
    pub theta: Vec<Vec<f64>>,
    pub var: Vec<Vec<f64>>,
}

impl GaussianNb {
    pub const KIND: &'static str = "gaussian_nb";

    pub fn is_sample(&self) -> bool {
        is_sample(self.source.as_deref())
    }

    /// Check the artefact against the classifier tuple layout.
    pub fn validate(&self) -> PredictResult<()> {
        expect_kind(&self.kind, Self::KIND)?;
        expect_features(&self.feature_names, &ClassifierFeatures::NAMES)?;

        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(PredictError::model_missing("gaussian_nb: no classes"));
        }
        let mut unique = self.classes.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != n_classes {
            return Err(PredictError::model_missing("gaussian_nb: duplicate class labels"));
        }
        if self.class_prior.len() != n_classes
            || self.theta.len() != n_classes
            || self.var.len() != n_classes
        {
            return Err(PredictError::model_missing(format!(
                "gaussian_nb: parameter rows must match {n_classes} classes"
            )));
        }

        let n_features = ClassifierFeatures::NAMES.len();
        if self
            .theta
            .iter()
            .chain(self.var.iter())
            .any(|row| row.len() != n_features)
        {
            return Err(PredictError::model_missing(format!(
                "gaussian_nb: every parameter row needs {n_features} values"
            )));
        }

        if self.class_prior.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(PredictError::model_missing(
                "gaussian_nb: class priors must be positive",
            ));
        }
        if self.theta.iter().any(|row| !all_finite(row)) {
            return Err(PredictError::model_missing("gaussian_nb: means must be finite"));
        }
        if self.var.iter().flatten().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(PredictError::model_missing(
                "gaussian_nb: variances must be positive",
            ));
        }
        Ok(())
    }

    /// Joint log likelihood `ln P(c) + Σ ln N(x_f; θ_cf, σ²_cf)` for each class.
    pub fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        self.class_prior
            .iter()
            .zip(self.theta.iter().zip(self.var.iter()))
            .map(|(prior, (means, vars))| {
                let likelihood: f64 = x
                    .iter()
                    .zip(means.iter().zip(vars.iter()))
                    .map(|(value, (mean, var))| {
                        let diff = value - mean;
                        -0.5 * (2.0 * std::f64::consts::PI * var).ln() - diff * diff / (2.0 * var)
                    })
                    .sum();
                prior.ln() + likelihood
            })
            .collect()
    }
}

impl Classifier for GaussianNb {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn predict(&self, features: &ClassifierFeatures) -> PredictResult<i64> {
        let scores = self.joint_log_likelihood(&features.to_array());
        let mut best: Option<(usize, f64)> = None;
        for (idx, score) in scores.into_iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            // Strict comparison keeps the lowest index on ties.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| self.classes[idx])
            .ok_or_else(|| PredictError::internal("gaussian_nb: no finite class score"))
    }
}

fn expect_kind(found: &str, expected: &str) -> PredictResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(PredictError::model_missing(format!(
            "expected artefact kind `{expected}`, found `{found}`"
        )))
    }
}

fn expect_features(found: &[String], expected: &[&str]) -> PredictResult<()> {
    if found.len() == expected.len() && found.iter().zip(expected).all(|(a, b)| a == b) {
        Ok(())
    } else {
        Err(PredictError::model_missing(format!(
            "feature order mismatch: expected {expected:?}, found {found:?}"
        )))
    }
}

/// Artefacts tagged as samples carry placeholder parameters, not a real fit.
pub const SAMPLE_SOURCE: &str = "sample";

fn is_sample(source: Option<&str>) -> bool {
    source.map_or(false, |s| s.trim().eq_ignore_ascii_case(SAMPLE_SOURCE))
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
