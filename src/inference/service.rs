//! Prediction orchestration: validate, run both models, assemble the response.

use std::sync::Arc;

use serde_json::Value;

use crate::common::error::{PredictError, PredictResult};
use crate::features::domain::Severity;
use crate::models::domain::{Classifier, ModelBundle, Regressor};

use super::domain::{recommended_hours, round_prediction, PredictInput, Prediction};

/// Read-only handle over both models, shared by every request.
#[derive(Clone)]
pub struct PredictionService {
    regressor: Arc<dyn Regressor>,
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(models: ModelBundle) -> Self {
        Self {
            regressor: models.regressor,
            classifier: models.classifier,
        }
    }

    pub fn regressor_kind(&self) -> &'static str {
        self.regressor.kind()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Validate a raw JSON body and predict. Nothing runs on invalid input.
    pub fn predict(&self, body: &Value) -> PredictResult<Prediction> {
        let input = PredictInput::from_json(body)?;
        self.predict_input(&input)
    }

    /// Predict for an already validated input.
    pub fn predict_input(&self, input: &PredictInput) -> PredictResult<Prediction> {
        let raw = self.regressor.predict(&input.regressor_features())?;
        let predicted = round_prediction(raw)?;
        let recommended = recommended_hours(predicted, input.actual_activity_hours);

        let code = self.classifier.predict(&input.classifier_features())?;
        let severity = Severity::from_code(code).ok_or_else(|| {
            PredictError::internal(format!("classifier returned unmapped code {code}"))
        })?;

        Ok(Prediction {
            predicted_physical_activity_hours: predicted,
            recommended_additional_hours: recommended,
            predicted_severity: severity,
        })
    }
}
