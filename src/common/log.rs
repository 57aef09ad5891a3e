//! Structured logging built on `tracing`.
//!
//! Request events keep a fixed field schema: `ev`, `code` and `dur_ms`.
//!
//! TODO: Add a per-request id field once a fronting proxy forwards one.

use tracing_subscriber::EnvFilter;

use crate::common::config::AppCfg;
use crate::common::error::{PredictCode, PredictError};

/// Install the global subscriber. A second install keeps the first one.
pub fn init(cfg: &AppCfg) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if cfg.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = installed {
        tracing::debug!(%err, "subscriber already installed; keeping it");
    }
}

/// Emit the completion event for a single request.
pub fn log_outcome(event: &str, outcome: Result<(), &PredictError>, dur_ms: u64) {
    let code = match outcome {
        Ok(()) => PredictCode::Ok,
        Err(err) => err.code,
    } as u32;

    match outcome {
        Ok(()) => tracing::info!(ev = event, code, dur_ms, "ok"),
        Err(err) if err.code.is_client() => {
            tracing::debug!(ev = event, code, dur_ms, msg = %err.msg, "rejected")
        }
        Err(err) => tracing::error!(ev = event, code, dur_ms, msg = %err.msg, "failed"),
    }
}
