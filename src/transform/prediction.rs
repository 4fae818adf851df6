use serde_json::Value;
use tracing::warn;

use crate::entities::condition::Prediction;
use crate::entities::matching::MAX_RESULTS;
use crate::transform::condition::{clean_name, string_list, text};

fn percentage(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0))
        .unwrap_or(0.0)
}

pub(crate) fn prediction_from_value(value: &Value) -> Option<Prediction> {
    let disease = value.get("disease").and_then(clean_name)?;
    Some(Prediction {
        disease,
        match_percentage: percentage(value.get("match_percentage")),
        description: text(value.get("description")),
        precautions: string_list(value.get("precautions")),
        medications: string_list(value.get("medications")),
    })
}

/// Normalizes a remote `{"predictions": [..]}` payload.
///
/// Server order is kept; zero matches are dropped and the list is capped at
/// [`MAX_RESULTS`]. Returns `None` when the payload has no prediction list.
pub(crate) fn predictions_from_payload(payload: &Value) -> Option<Vec<Prediction>> {
    let items = payload.get("predictions")?.as_array()?;
    let mut out = Vec::new();
    for item in items {
        match prediction_from_value(item) {
            Some(p) if p.match_percentage > 0.0 => out.push(p),
            Some(_) => {}
            None => warn!("Dropping remote prediction without a disease name"),
        }
        if out.len() >= MAX_RESULTS {
            break;
        }
    }
    Some(out)
}
