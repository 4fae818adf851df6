use serde::Serialize;

use crate::error::SymptomMatchError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, SymptomMatchError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::to_pretty;
    use crate::entities::condition::Prediction;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Demo<'a> {
        symptom: &'a str,
        score: f64,
    }

    #[test]
    fn to_pretty_serializes_with_indentation() {
        let payload = Demo {
            symptom: "fever",
            score: 0.5,
        };
        let json = to_pretty(&payload).expect("json");
        assert!(json.contains('\n'));
        assert!(json.contains("\"symptom\": \"fever\""));
        assert!(json.contains("\"score\": 0.5"));
    }

    #[test]
    fn json_render_prediction() {
        let prediction = Prediction {
            disease: "Flu".to_string(),
            match_percentage: 50.0,
            description: "Viral infection".to_string(),
            precautions: vec!["rest".to_string()],
            medications: Vec::new(),
        };

        let json = to_pretty(&prediction).expect("prediction json");
        assert!(json.contains("\"disease\": \"Flu\""));
        assert!(json.contains("\"match_percentage\": 50.0"));
        assert!(json.contains("\"medications\": []"));
    }
}
