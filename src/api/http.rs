//! HTTP surface: `POST /predict` and `GET /health`.
//!
//! TODO: Add a request timeout layer for deployments without a fronting proxy.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::common::error::{PredictCode, PredictError};
use crate::common::log;
use crate::inference::service::PredictionService;

/// Error body shared by every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Status code for each error kind.
pub fn status_for(code: PredictCode) -> StatusCode {
    match code {
        PredictCode::Ok => StatusCode::OK,
        PredictCode::InvalidInput => StatusCode::BAD_REQUEST,
        PredictCode::ModelMissing | PredictCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, err: &PredictError) -> Response {
    let body = ErrorBody {
        error: err.client_message(),
    };
    (status, Json(body)).into_response()
}

/// Build the application router around a loaded service.
pub fn router(service: Arc<PredictionService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(cors)
        .with_state(service)
}

async fn predict(
    State(service): State<Arc<PredictionService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = match payload {
        Ok(Json(body)) => service
            .predict(&body)
            .map_err(|err| (status_for(err.code), err)),
        Err(rejection) => Err((
            rejection_status(&rejection),
            PredictError::invalid(rejection.body_text()),
        )),
    };
    let dur_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(prediction) => {
            log::log_outcome("predict", Ok(()), dur_ms);
            Json(prediction).into_response()
        }
        Err((status, err)) => {
            log::log_outcome("predict", Err(&err), dur_ms);
            error_response(status, &err)
        }
    }
}

/// Body rejections are client errors; an oversized body keeps its 413.
pub fn rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

async fn health(State(service): State<Arc<PredictionService>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "models": {
            "regressor": service.regressor_kind(),
            "classifier": service.classifier_kind(),
        },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::common::config::AppCfg;
    use crate::inference::service::tests::stub_service;
    use crate::models::repo_fs::{FsModelRepo, ModelRepo};

    const VALID: &str = r#"{
        "Sleep_Hours": 7,
        "Work_Hours": 8,
        "Age": 30,
        "Actual_Physical_Activity_Hours": 1,
        "Gender": "Male",
        "Stress_Level": "Low"
    }"#;

    fn stub_app(value: f64, code: i64) -> Router {
        router(Arc::new(stub_service(value, code)))
    }

    fn bundled_app() -> Router {
        let mut cfg = AppCfg::from_lookup(|_| None);
        cfg.model_root = concat!(env!("CARGO_MANIFEST_DIR"), "/models/testdata").to_string();
        let models = FsModelRepo::new(&cfg).load_bundle().expect("bundled models load");
        router(Arc::new(PredictionService::new(models)))
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn with(key: &str, value: Value) -> String {
        let mut body: Value = serde_json::from_str(VALID).unwrap();
        body[key] = value;
        body.to_string()
    }

    fn without(key: &str) -> String {
        let mut body: Value = serde_json::from_str(VALID).unwrap();
        body.as_object_mut().unwrap().remove(key);
        body.to_string()
    }

    #[tokio::test]
    async fn scenario_with_bundled_models() {
        let (status, body) = send(bundled_app(), post_json(VALID)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["predicted_physical_activity_hours"].is_i64());
        let recommended = body["recommended_additional_hours"].as_f64().unwrap();
        assert!(recommended >= 0.0);
        let severity = body["predicted_severity"].as_str().unwrap();
        assert!(["Low", "Medium", "High", "None"].contains(&severity));
    }

    #[tokio::test]
    async fn identical_requests_get_identical_answers() {
        let app = bundled_app();
        let (_, first) = send(app.clone(), post_json(VALID)).await;
        let (_, second) = send(app, post_json(VALID)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stubbed_prediction_body() {
        let (status, body) = send(stub_app(3.5, 2), post_json(VALID)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "predicted_physical_activity_hours": 4,
                "recommended_additional_hours": 3.0,
                "predicted_severity": "High"
            })
        );
    }

    #[tokio::test]
    async fn missing_age_is_bad_request() {
        let (status, body) = send(stub_app(3.0, 0), post_json(without("Age"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing one or more required fields: Age");
    }

    #[tokio::test]
    async fn any_missing_field_is_bad_request() {
        for key in crate::inference::domain::REQUIRED_FIELDS {
            let (status, body) = send(stub_app(3.0, 0), post_json(without(key))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{key}");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn non_numeric_input_is_bad_request() {
        let req = post_json(with("Sleep_Hours", json!("abc")));
        let (status, body) = send(stub_app(3.0, 0), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Sleep_Hours"));
    }

    #[tokio::test]
    async fn unknown_categories_are_bad_request() {
        for (key, value) in [("Gender", "Unknown"), ("Stress_Level", "Severe")] {
            let req = post_json(with(key, json!(value)));
            let (status, body) = send(stub_app(3.0, 0), req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid value for Gender or Stress Level");
        }
    }

    #[tokio::test]
    async fn numeric_strings_are_accepted() {
        let req = post_json(with("Actual_Physical_Activity_Hours", json!("0.5")));
        let (status, body) = send(stub_app(2.0, 1), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_additional_hours"], 1.5);
    }

    #[tokio::test]
    async fn recommendation_never_negative() {
        let req = post_json(with("Actual_Physical_Activity_Hours", json!(9)));
        let (status, body) = send(stub_app(2.0, 1), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_additional_hours"], 0.0);
    }

    #[tokio::test]
    async fn unmapped_severity_is_sanitised_server_error() {
        let (status, body) = send(stub_app(3.0, 11), post_json(VALID)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send(stub_app(3.0, 0), post_json("{ nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_object_json_is_bad_request() {
        let (status, body) = send(stub_app(3.0, 0), post_json("[1, 2]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request body must be a JSON object");
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .body(Body::from(VALID))
            .unwrap();
        let (status, body) = send(stub_app(3.0, 0), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let padding = "x".repeat(3 * 1024 * 1024);
        let req = post_json(with("Notes", json!(padding)));
        let (status, body) = send(stub_app(3.0, 0), req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/predict")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let resp = stub_app(3.0, 0).oneshot(req).await.unwrap();
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn simple_requests_carry_cors_header() {
        let mut req = post_json(VALID);
        req.headers_mut()
            .insert("origin", "http://example.test".parse().unwrap());
        let resp = stub_app(3.0, 0).oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn health_reports_loaded_models() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(bundled_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["models"]["regressor"], "linear_regression");
        assert_eq!(body["models"]["classifier"], "gaussian_nb");
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(status_for(PredictCode::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(PredictCode::Internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_for(PredictCode::ModelMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
