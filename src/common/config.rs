//! Runtime configuration loaded from the process environment.
//!
//! TODO: Accept a key=value file next to the artefacts so deployments can pin
//!       model file names without touching the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::common::error::{PredictError, PredictResult};

/// Snapshot of configuration values consumed by the service.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_root: String,
    pub regressor_file: String,
    pub classifier_file: String,
    pub bind: String,
    pub log_filter: String,
    pub log_json: bool,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            model_root: env_or("ACTIVITY_MODEL_ROOT", "./models"),
            regressor_file: env_or("ACTIVITY_REGRESSOR_FILE", "linear_regression_model.json"),
            classifier_file: env_or("ACTIVITY_CLASSIFIER_FILE", "naive_bayes.json"),
            bind: env_or("ACTIVITY_BIND", "127.0.0.1:5000"),
            log_filter: env_or("ACTIVITY_LOG", "info"),
            log_json: matches!(
                env_or("ACTIVITY_LOG_JSON", "false").trim(),
                "1" | "true" | "yes"
            ),
        }
    }

    pub fn regressor_path(&self) -> PathBuf {
        PathBuf::from(&self.model_root).join(&self.regressor_file)
    }

    pub fn classifier_path(&self) -> PathBuf {
        PathBuf::from(&self.model_root).join(&self.classifier_file)
    }

    /// Parse the listen address.
    pub fn bind_addr(&self) -> PredictResult<SocketAddr> {
        self.bind
            .parse()
            .map_err(|_| PredictError::internal(format!("invalid bind address `{}`", self.bind)))
    }
}
