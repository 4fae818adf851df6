#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SymptomMatchError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Source unavailable: {source_name} is not available. {reason}\n\nTry: {suggestion}")]
    SourceUnavailable {
        source_name: String,
        reason: String,
        suggestion: String,
    },

    #[error(
        "Please select at least one symptom.\n\nTry: symptomatch symptoms --filter <term> to browse available symptoms"
    )]
    EmptySelection,

    #[error("A catalog load is already in progress")]
    LoadInProgress,

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::SymptomMatchError;

    #[test]
    fn source_unavailable_display_includes_reason() {
        let err = SymptomMatchError::SourceUnavailable {
            source_name: "seed".to_string(),
            reason: "seed.json is missing".to_string(),
            suggestion: "Pass --seed <path>".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("Source unavailable: seed"));
        assert!(msg.contains("seed.json is missing"));
        assert!(msg.contains("Pass --seed <path>"));
    }

    #[test]
    fn api_error_display_includes_api_name() {
        let err = SymptomMatchError::Api {
            api: "remote".to_string(),
            message: "HTTP 500".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("remote"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn empty_selection_display_points_at_symptom_browser() {
        let msg = SymptomMatchError::EmptySelection.to_string();
        assert!(msg.contains("at least one symptom"));
        assert!(msg.contains("symptomatch symptoms"));
    }
}
