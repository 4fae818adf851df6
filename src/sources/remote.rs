use http_cache_reqwest::CacheMode;
use serde::Serialize;
use tracing::debug;

use crate::entities::condition::{ConditionRecord, Prediction};
use crate::error::SymptomMatchError;

pub(crate) const REMOTE_API: &str = "remote";
pub(crate) const REMOTE_BASE_ENV: &str = "SYMPTOMATCH_API_BASE";

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    symptoms: &'a [String],
}

/// Client for the optional condition service (`GET /diseases`,
/// `POST /predict`).
#[derive(Clone)]
pub struct RemoteClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base: String,
}

impl RemoteClient {
    pub fn new(base: impl Into<String>) -> Result<Self, SymptomMatchError> {
        let base = base.into();
        if base.trim().is_empty() {
            return Err(SymptomMatchError::InvalidArgument(
                "Remote base URL is empty. Example: --api-base http://localhost:5000".into(),
            ));
        }
        Ok(Self {
            client: crate::sources::shared_client()?,
            base,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        crate::sources::join_endpoint(&self.base, path)
    }

    /// Fetches the full condition list.
    ///
    /// Fails on transport errors, non-success statuses, and payloads that are
    /// not a recognizable condition collection. The request skips the HTTP
    /// cache: a stored copy must never hide an outage from the loader.
    pub async fn diseases(&self) -> Result<Vec<ConditionRecord>, SymptomMatchError> {
        let url = self.endpoint("diseases");
        debug!(url = %url, "Fetching remote condition list");
        let payload = crate::sources::send_json(
            REMOTE_API,
            self.client
                .get(&url)
                .header(reqwest::header::ACCEPT, "application/json")
                .with_extension(CacheMode::NoStore),
        )
        .await?;

        crate::transform::condition::records_from_payload(&payload).ok_or_else(|| {
            SymptomMatchError::Api {
                api: REMOTE_API.to_string(),
                message: "Unexpected response shape: expected a `diseases` collection".into(),
            }
        })
    }

    pub async fn predict(&self, symptoms: &[String]) -> Result<Vec<Prediction>, SymptomMatchError> {
        let url = self.endpoint("predict");
        debug!(url = %url, count = symptoms.len(), "Requesting remote predictions");
        let payload = crate::sources::send_json(
            REMOTE_API,
            self.client
                .post(&url)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&PredictRequest { symptoms }),
        )
        .await?;

        crate::transform::prediction::predictions_from_payload(&payload).ok_or_else(|| {
            SymptomMatchError::Api {
                api: REMOTE_API.to_string(),
                message: "Unexpected response shape: expected a `predictions` list".into(),
            }
        })
    }
}
