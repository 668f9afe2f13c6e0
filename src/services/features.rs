use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::FeatureVector,
};

/// Builds the feature vector for a recommendation request.
///
/// A missing key counts as `0`. A key that is present but cannot be coerced
/// (explicit `null`, a non-numeric string, an array, a non-finite number) is
/// rejected with `InvalidInput`. Values are not range-checked.
pub fn extract(fields: &Map<String, Value>) -> AppResult<FeatureVector> {
    Ok(FeatureVector {
        math_score: real_field(fields, "math_score")?,
        science_score: real_field(fields, "science_score")?,
        reading_score: real_field(fields, "reading_score")?,
        learning_style: integer_field(fields, "learning_style")?,
        interest_level: integer_field(fields, "interest_level")?,
        previous_performance: integer_field(fields, "previous_performance")?,
    })
}

/// Same as [`extract`] for an arbitrary JSON body, which must be an object
pub fn extract_value(body: &Value) -> AppResult<FeatureVector> {
    match body {
        Value::Object(fields) => extract(fields),
        other => Err(AppError::InvalidInput(format!(
            "request body must be a JSON object, got {}",
            json_kind(other)
        ))),
    }
}

fn real_field(fields: &Map<String, Value>, key: &str) -> AppResult<f64> {
    let Some(value) = fields.get(key) else {
        return Ok(0.0);
    };

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(invalid(key, value, "a real number")),
    }
}

fn integer_field(fields: &Map<String, Value>, key: &str) -> AppResult<i64> {
    let Some(value) = fields.get(key) else {
        return Ok(0);
    };

    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    number.ok_or_else(|| invalid(key, value, "an integer"))
}

// Floats are truncated toward zero, as long as the result fits in an i64
fn truncate(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let truncated = n.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

fn invalid(key: &str, value: &Value, expected: &str) -> AppError {
    AppError::InvalidInput(format!("{key}: expected {expected}, got {value}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
