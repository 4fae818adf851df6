use std::path::PathBuf;

use tracing::debug;

use crate::entities::condition::ConditionRecord;
use crate::error::SymptomMatchError;

pub(crate) const SEED_API: &str = "seed";

/// Where the demo seed list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedLocation {
    Embedded,
    Path(PathBuf),
    Url(String),
}

impl SeedLocation {
    /// `http://` and `https://` values are URLs, anything else a file path.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(Self::Url(raw.to_string()))
        } else {
            Some(Self::Path(PathBuf::from(raw)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => "embedded seed.json".to_string(),
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

pub(crate) async fn fetch_seed(
    location: &SeedLocation,
) -> Result<Vec<ConditionRecord>, SymptomMatchError> {
    match location {
        SeedLocation::Embedded => crate::sources::bundled::bundled_seed(),
        SeedLocation::Path(path) => {
            debug!(path = %path.display(), "Reading seed list");
            let raw = tokio::fs::read_to_string(path).await?;
            crate::sources::bundled::parse_records(SEED_API, &raw)
        }
        SeedLocation::Url(url) => {
            debug!(url = %url, "Fetching seed list");
            let client = crate::sources::shared_client()?;
            let payload = crate::sources::send_json(
                SEED_API,
                client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "application/json"),
            )
            .await?;
            crate::transform::condition::records_from_payload(&payload).ok_or_else(|| {
                SymptomMatchError::Api {
                    api: SEED_API.to_string(),
                    message: "Unexpected seed shape: expected an array of condition records"
                        .into(),
                }
            })
        }
    }
}
