use serde_json::Value;
use tracing::warn;

use crate::entities::condition::ConditionRecord;

pub(crate) fn clean_name(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Coerces a list-ish value into strings. A lone string becomes a one-item
/// list; non-string and blank entries are dropped.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Vec::new()
            } else {
                vec![s.to_string()]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn record_with_name(name: String, fields: &Value) -> ConditionRecord {
    ConditionRecord {
        name,
        description: text(fields.get("description")),
        symptoms: string_list(fields.get("symptoms")),
        precautions: string_list(fields.get("precautions")),
        medications: string_list(fields.get("medications")),
    }
}

/// Builds a record from an object carrying its own `name`.
pub(crate) fn record_from_value(value: &Value) -> Option<ConditionRecord> {
    let name = value.get("name").and_then(clean_name)?;
    Some(record_with_name(name, value))
}

fn records_from_array(items: &[Value]) -> Vec<ConditionRecord> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match record_from_value(item) {
            Some(record) => out.push(record),
            None => warn!(index = idx, "Dropping condition record without a usable name"),
        }
    }
    out
}

fn records_from_map(map: &serde_json::Map<String, Value>) -> Vec<ConditionRecord> {
    let mut out = Vec::with_capacity(map.len());
    for (key, fields) in map {
        let name = key.trim();
        if name.is_empty() {
            warn!("Dropping condition record keyed by a blank name");
            continue;
        }
        let name = fields
            .get("name")
            .and_then(clean_name)
            .unwrap_or_else(|| name.to_string());
        out.push(record_with_name(name, fields));
    }
    out
}

/// Extracts records from a condition-list payload.
///
/// Accepts `{"diseases": [..]}`, `{"diseases": {name: {..}}}`, or a bare
/// array. Returns `None` when the payload has none of these shapes.
pub(crate) fn records_from_payload(payload: &Value) -> Option<Vec<ConditionRecord>> {
    match payload {
        Value::Array(items) => Some(records_from_array(items)),
        Value::Object(obj) => match obj.get("diseases")? {
            Value::Array(items) => Some(records_from_array(items)),
            Value::Object(map) => Some(records_from_map(map)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_malformed_fields_become_empty() {
        let record = record_from_value(&json!({
            "name": "Flu",
            "description": 42,
            "symptoms": "fever",
            "precautions": {"rest": true},
        }))
        .expect("record");
        assert_eq!(record.name, "Flu");
        assert_eq!(record.description, "");
        assert_eq!(record.symptoms, vec!["fever"]);
        assert!(record.precautions.is_empty());
        assert!(record.medications.is_empty());
    }

    #[test]
    fn non_string_list_entries_are_dropped() {
        let record = record_from_value(&json!({
            "name": "Cold",
            "symptoms": ["cough", 3, null, "  ", " sneezing "],
        }))
        .expect("record");
        assert_eq!(record.symptoms, vec!["cough", "sneezing"]);
    }

    #[test]
    fn records_without_names_are_dropped() {
        let records = records_from_payload(&json!([
            {"symptoms": ["fever"]},
            {"name": "   "},
            {"name": 7},
            {"name": "Flu"},
        ]))
        .expect("array payload");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Flu");
    }

    #[test]
    fn wrapped_list_and_map_payloads_are_recognized() {
        let wrapped = records_from_payload(&json!({
            "diseases": [{"name": "Flu", "symptoms": ["fever"]}]
        }))
        .expect("wrapped list");
        assert_eq!(wrapped[0].name, "Flu");

        let mapped = records_from_payload(&json!({
            "diseases": {"Cold": {"symptoms": ["cough"], "description": "Mild"}}
        }))
        .expect("wrapped map");
        assert_eq!(mapped[0].name, "Cold");
        assert_eq!(mapped[0].description, "Mild");
        assert_eq!(mapped[0].symptoms, vec!["cough"]);
    }

    #[test]
    fn unexpected_shapes_are_rejected() {
        assert!(records_from_payload(&json!({"items": []})).is_none());
        assert!(records_from_payload(&json!({"diseases": "Flu"})).is_none());
        assert!(records_from_payload(&json!("Flu")).is_none());
        assert!(records_from_payload(&json!(null)).is_none());
    }

    #[test]
    fn blank_symptoms_do_not_count_toward_match_base() {
        let record = record_from_value(&json!({
            "name": "Flu",
            "symptoms": ["fever", ""],
        }))
        .expect("record");
        assert_eq!(record.symptoms, vec!["fever"]);

        let catalog: crate::entities::catalog::Catalog = [record].into_iter().collect();
        let selection: crate::entities::selection::SelectionSet =
            ["fever".to_string()].into_iter().collect();
        let predictions = crate::entities::matching::score(&catalog, &selection);
        assert_eq!(predictions[0].match_percentage, 100.0);
    }
}
