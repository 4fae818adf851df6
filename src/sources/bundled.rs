use std::borrow::Cow;

use rust_embed::RustEmbed;

use crate::entities::condition::ConditionRecord;
use crate::error::SymptomMatchError;

pub(crate) const BUNDLED_CATALOG_PATH: &str = "diseases.json";
pub(crate) const BUNDLED_SEED_PATH: &str = "seed.json";

#[derive(RustEmbed)]
#[folder = "data/"]
struct EmbeddedData;

fn embedded_text(path: &str) -> Result<String, SymptomMatchError> {
    let Some(asset) = EmbeddedData::get(path) else {
        return Err(SymptomMatchError::SourceUnavailable {
            source_name: "bundled".into(),
            reason: format!("{path} is not embedded in this build."),
            suggestion: "symptomatch --api-base <url> or --demo --seed <path>".into(),
        });
    };

    let bytes: Cow<'static, [u8]> = asset.data;
    String::from_utf8(bytes.into_owned()).map_err(|_| {
        SymptomMatchError::InvalidArgument(format!("Embedded dataset {path} is not valid UTF-8"))
    })
}

/// Parses a dataset document into records, tagging failures with `source`.
pub(crate) fn parse_records(
    source: &str,
    raw: &str,
) -> Result<Vec<ConditionRecord>, SymptomMatchError> {
    let payload: serde_json::Value =
        serde_json::from_str(raw).map_err(|source_err| SymptomMatchError::ApiJson {
            api: source.to_string(),
            source: source_err,
        })?;
    crate::transform::condition::records_from_payload(&payload).ok_or_else(|| {
        SymptomMatchError::Api {
            api: source.to_string(),
            message: "Unexpected dataset shape: expected an array of condition records".into(),
        }
    })
}

/// The condition catalog compiled into the binary.
pub(crate) fn bundled_catalog() -> Result<Vec<ConditionRecord>, SymptomMatchError> {
    parse_records("bundled", &embedded_text(BUNDLED_CATALOG_PATH)?)
}

/// The small seed list used for demo expansion when no `--seed` is given.
pub(crate) fn bundled_seed() -> Result<Vec<ConditionRecord>, SymptomMatchError> {
    parse_records("seed", &embedded_text(BUNDLED_SEED_PATH)?)
}
