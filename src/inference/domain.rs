//! Request validation, the prediction response and the arithmetic between the
//! two model calls.

use serde::Serialize;
use serde_json::Value;

use crate::common::error::{PredictError, PredictResult};
use crate::features::domain::{
    ClassifierFeatures, Gender, RegressorFeatures, Severity, StressLevel,
};

pub const SLEEP_HOURS: &str = "Sleep_Hours";
pub const WORK_HOURS: &str = "Work_Hours";
pub const AGE: &str = "Age";
pub const ACTUAL_ACTIVITY_HOURS: &str = "Actual_Physical_Activity_Hours";
pub const GENDER: &str = "Gender";
pub const STRESS_LEVEL: &str = "Stress_Level";

/// Every key a request must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    SLEEP_HOURS,
    WORK_HOURS,
    AGE,
    ACTUAL_ACTIVITY_HOURS,
    GENDER,
    STRESS_LEVEL,
];

const NUMERIC_FIELDS: [&str; 4] = [SLEEP_HOURS, WORK_HOURS, AGE, ACTUAL_ACTIVITY_HOURS];

/// Largest magnitude an `f64` holds with integer precision (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Fully validated request; building one never touches a model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PredictInput {
    pub sleep_hours: f64,
    pub work_hours: f64,
    pub age: f64,
    pub actual_activity_hours: f64,
    pub gender: Gender,
    pub stress_level: StressLevel,
}

impl PredictInput {
    /// Validate a decoded JSON body: presence, then numeric coercion, then
    /// categorical lookup. Each stage reports every offending field.
    pub fn from_json(body: &Value) -> PredictResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| PredictError::invalid("Request body must be a JSON object"))?;

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(PredictError::invalid(format!(
                "Missing one or more required fields: {}",
                missing.join(", ")
            )));
        }

        let mut numbers = [0.0_f64; 4];
        let mut invalid = Vec::new();
        for (slot, key) in numbers.iter_mut().zip(NUMERIC_FIELDS) {
            match coerce_number(&object[key]) {
                Some(value) => *slot = value,
                None => invalid.push(key),
            }
        }
        if !invalid.is_empty() {
            return Err(PredictError::invalid(format!(
                "All numerical inputs must be valid numbers: {}",
                invalid.join(", ")
            )));
        }
        let [sleep_hours, work_hours, age, actual_activity_hours] = numbers;

        let gender = object[GENDER].as_str().and_then(Gender::from_label);
        let stress_level = object[STRESS_LEVEL].as_str().and_then(StressLevel::from_label);
        let (Some(gender), Some(stress_level)) = (gender, stress_level) else {
            return Err(PredictError::invalid("Invalid value for Gender or Stress Level"));
        };

        Ok(Self {
            sleep_hours,
            work_hours,
            age,
            actual_activity_hours,
            gender,
            stress_level,
        })
    }

    pub fn regressor_features(&self) -> RegressorFeatures {
        RegressorFeatures {
            sleep_hours: self.sleep_hours,
            work_hours: self.work_hours,
            age: self.age,
        }
    }

    pub fn classifier_features(&self) -> ClassifierFeatures {
        ClassifierFeatures {
            gender: self.gender,
            stress_level: self.stress_level,
            work_hours: self.work_hours,
            sleep_hours: self.sleep_hours,
            physical_activity_hours: self.actual_activity_hours,
            age: self.age,
        }
    }
}

/// Accept JSON numbers and numeric strings; everything non-finite is rejected.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Round the regressor output half-to-even (2.5 -> 2, 3.5 -> 4).
pub fn round_prediction(raw: f64) -> PredictResult<i64> {
    let rounded = raw.round_ties_even();
    if !rounded.is_finite() || rounded.abs() > MAX_EXACT_INTEGER {
        return Err(PredictError::internal(format!(
            "regressor produced an unusable value: {raw}"
        )));
    }
    Ok(rounded as i64)
}

/// `max(0, predicted - actual)` on the already rounded prediction. Keeps the
/// fractional part of `actual` and never yields `-0.0`.
pub fn recommended_hours(predicted: i64, actual: f64) -> f64 {
    let deficit = predicted as f64 - actual;
    if deficit > 0.0 {
        deficit
    } else {
        0.0
    }
}

/// Successful response body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_physical_activity_hours: i64,
    pub recommended_additional_hours: f64,
    pub predicted_severity: Severity,
}
