use std::sync::Arc;

use activity_predictor::common::config::AppCfg;
use activity_predictor::common::log;
use activity_predictor::models::{FsModelRepo, ModelRepo};
use activity_predictor::{router, PredictionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppCfg::load();
    log::init(&cfg);

    let repo = FsModelRepo::new(&cfg);
    tracing::info!(
        regressor = %repo.regressor_path().display(),
        classifier = %repo.classifier_path().display(),
        "loading models"
    );
    let models = repo.load_bundle()?;
    let service = Arc::new(PredictionService::new(models));

    let addr = cfg.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router(service)).await?;
    Ok(())
}
