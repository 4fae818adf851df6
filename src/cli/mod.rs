//! Command-line surface: argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

use crate::config::{DataOptions, LoaderConfig};
use crate::entities::condition::ConditionRecord;
use crate::error::SymptomMatchError;
use crate::loader::{CatalogLoader, LoadStatus, SourceFailure, SourceKind};
use crate::render;
use crate::session::{PredictionOutcome, Session};
use crate::sources::remote::RemoteClient;

pub mod health;
pub mod interactive;

#[derive(Parser, Debug)]
#[command(
    name = "symptomatch",
    version,
    about = "Rank candidate conditions for a set of symptoms",
    long_about = "Rank candidate conditions for a set of symptoms.\n\nData comes from a remote condition service when configured, falling back to the bundled dataset and then to an expanded demo dataset.\n\nResults are informational only and not medical advice."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output JSON instead of Markdown
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Bypass the on-disk HTTP cache for this command
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Base URL of the remote condition service (default: $SYMPTOMATCH_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Never contact the remote condition service
    #[arg(long, global = true)]
    pub offline: bool,

    /// Skip the dataset compiled into the binary
    #[arg(long, global = true)]
    pub no_bundled: bool,

    /// Fall back to a demo catalog expanded from a seed list
    #[arg(long, global = true)]
    pub demo: bool,

    /// Seed list for --demo, as a file path or http(s) URL (default: embedded seed)
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub seed: Option<String>,

    /// Number of demo records to generate (default: 500)
    #[arg(long, global = true, value_name = "N")]
    pub demo_size: Option<usize>,
}

impl DataArgs {
    fn to_options(&self) -> DataOptions {
        DataOptions {
            api_base: self.api_base.clone(),
            offline: self.offline,
            no_bundled: self.no_bundled,
            demo: self.demo,
            seed: self.seed.clone(),
            demo_size: self.demo_size,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List symptoms available for selection
    Symptoms {
        /// Only show symptoms containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Rank conditions for the given symptoms
    Predict {
        /// Symptom names or search terms, e.g. fever "sore throat"
        symptoms: Vec<String>,

        /// Ask the remote service to score first, falling back to local matching
        #[arg(long)]
        remote: bool,
    },
    /// Show which data source was loaded and what it contains
    Catalog {
        /// Maximum number of condition names to list
        #[arg(short, long, default_value = "25")]
        limit: usize,
    },
    /// Pick symptoms interactively and submit them for ranking
    Interactive,
    /// Check connectivity of the configured data sources
    Health,
}

#[derive(Debug, Serialize)]
struct SymptomsJson<'a> {
    status: LoadStatus,
    source: Option<SourceKind>,
    failures: &'a [SourceFailure],
    total: usize,
    symptoms: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct CatalogJson<'a> {
    status: LoadStatus,
    source: Option<SourceKind>,
    failures: &'a [SourceFailure],
    conditions: usize,
    symptoms: usize,
    records: Vec<&'a ConditionRecord>,
}

#[derive(Debug, Serialize)]
struct PredictJson<'a> {
    load_status: LoadStatus,
    #[serde(flatten)]
    outcome: &'a PredictionOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ignored: Vec<String>,
}

pub(crate) async fn load_session(config: &LoaderConfig) -> Result<Session, SymptomMatchError> {
    if !config.has_any_source() {
        warn!("No condition source configured; drop --no-bundled or add --demo");
    }
    let loader = CatalogLoader::from_config(config)?;
    let report = loader.load().await?;
    let mut session = Session::new();
    session.apply_load(report);
    Ok(session)
}

pub(crate) fn remote_client(
    config: &LoaderConfig,
    requested: bool,
) -> Result<Option<RemoteClient>, SymptomMatchError> {
    if !requested {
        return Ok(None);
    }
    let Some(base) = config.remote_base.as_deref() else {
        return Err(SymptomMatchError::InvalidArgument(
            "--remote requires --api-base <URL> or SYMPTOMATCH_API_BASE (and no --offline)".into(),
        ));
    };
    Ok(Some(RemoteClient::new(base)?))
}

/// Selects each term, resolving it against the symptom index. Returns the
/// terms that matched nothing.
///
/// With no catalog loaded there is nothing to resolve against, so terms are
/// selected verbatim and the outcome reports the no-data state.
fn select_terms(session: &mut Session, terms: &[String]) -> Vec<String> {
    let mut ignored = Vec::new();
    for term in terms {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        if session.index().is_empty() {
            session.select(term);
            continue;
        }
        if session.select_term(term).is_none() {
            warn!(term, "No symptom matches search term");
            ignored.push(term.to_string());
        }
    }
    ignored
}

async fn run_inner(cli: Cli) -> anyhow::Result<String> {
    let config = LoaderConfig::resolve(&cli.data.to_options())?;
    let json = cli.json;

    match cli.command {
        Commands::Symptoms { filter } => {
            let session = load_session(&config).await?;
            if json {
                return Ok(render::json::to_pretty(&SymptomsJson {
                    status: session.load_status(),
                    source: session.load_source(),
                    failures: session.load_failures(),
                    total: session.index().len(),
                    symptoms: session.index().filter(filter.as_deref().unwrap_or_default()),
                })?);
            }
            Ok(render::markdown::symptoms_markdown(
                &session,
                filter.as_deref(),
            )?)
        }
        Commands::Predict { symptoms, remote } => {
            let remote = remote_client(&config, remote)?;
            let mut session = load_session(&config).await?;
            let ignored = select_terms(&mut session, &symptoms);
            let outcome = session.predict(remote.as_ref()).await?;
            if json {
                return Ok(render::json::to_pretty(&PredictJson {
                    load_status: session.load_status(),
                    outcome: &outcome,
                    ignored,
                })?);
            }
            let mut out = String::new();
            if !ignored.is_empty() {
                out.push_str(&format!(
                    "> Ignored unknown symptoms: {}\n\n",
                    ignored.join(", ")
                ));
            }
            out.push_str(&render::markdown::predictions_markdown(&session, &outcome)?);
            Ok(out)
        }
        Commands::Catalog { limit } => {
            let session = load_session(&config).await?;
            if json {
                return Ok(render::json::to_pretty(&CatalogJson {
                    status: session.load_status(),
                    source: session.load_source(),
                    failures: session.load_failures(),
                    conditions: session.catalog().len(),
                    symptoms: session.index().len(),
                    records: session.catalog().iter().take(limit).collect(),
                })?);
            }
            Ok(render::markdown::catalog_markdown(&session, limit)?)
        }
        Commands::Interactive => {
            let remote = config
                .remote_base
                .as_deref()
                .map(RemoteClient::new)
                .transpose()?;
            let mut session = load_session(&config).await?;
            interactive::run_stdio(&mut session, remote.as_ref()).await?;
            Ok("Goodbye.".to_string())
        }
        Commands::Health => {
            let report = health::check(&config).await?;
            if json {
                return Ok(render::json::to_pretty(&report)?);
            }
            Ok(report.to_markdown())
        }
    }
}

/// Runs a parsed command and returns its rendered output.
///
/// # Errors
///
/// Returns an error for invalid options, an empty symptom selection, or
/// rendering failures. Data-source failures are reported in the output.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let no_cache = cli.no_cache;
    crate::sources::with_no_cache(no_cache, run_inner(cli)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::condition::ConditionRecord;
    use crate::loader::LoadReport;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn global_data_flags_parse_after_subcommand() {
        let cli = parse(&[
            "symptomatch",
            "predict",
            "fever",
            "sore throat",
            "--demo",
            "--demo-size",
            "40",
            "--offline",
            "--json",
        ]);
        assert!(cli.json);
        assert!(cli.data.demo);
        assert!(cli.data.offline);
        assert_eq!(cli.data.demo_size, Some(40));
        match cli.command {
            Commands::Predict { symptoms, remote } => {
                assert_eq!(symptoms, vec!["fever", "sore throat"]);
                assert!(!remote);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn remote_flag_requires_configured_base() {
        let err = remote_client(&LoaderConfig::default(), true)
            .err()
            .expect("missing base should fail");
        assert!(matches!(err, SymptomMatchError::InvalidArgument(_)));
        assert!(remote_client(&LoaderConfig::default(), false).unwrap().is_none());
    }

    #[test]
    fn select_terms_reports_unknown_terms() {
        let mut session = Session::new();
        session.apply_load(LoadReport {
            catalog: [ConditionRecord::new("Flu").with_symptoms(["fever", "cough"])]
                .into_iter()
                .collect(),
            source: Some(SourceKind::Bundled),
            failures: Vec::new(),
        });

        let ignored = select_terms(
            &mut session,
            &["FEVER".to_string(), "rash".to_string(), " ".to_string()],
        );
        assert_eq!(ignored, vec!["rash"]);
        assert_eq!(session.selection().to_vec(), vec!["fever".to_string()]);
    }

    #[test]
    fn select_terms_keeps_raw_terms_without_catalog() {
        let mut session = Session::new();
        let ignored = select_terms(&mut session, &["fever".to_string()]);
        assert!(ignored.is_empty());
        assert_eq!(session.selection().to_vec(), vec!["fever".to_string()]);
    }

    #[tokio::test]
    async fn predict_with_bundled_data_renders_matches() {
        let cli = parse(&["symptomatch", "predict", "fever", "cough", "--offline"]);
        let out = run(cli).await.unwrap();
        assert!(out.contains("# Condition Matches"));
        assert!(out.contains("Influenza"));
        assert!(out.contains("Match: "));
    }

    #[tokio::test]
    async fn predict_without_symptoms_is_rejected() {
        let cli = parse(&["symptomatch", "predict", "--offline"]);
        let err = run(cli).await.unwrap_err();
        let err = err
            .downcast_ref::<SymptomMatchError>()
            .expect("typed error");
        assert!(matches!(err, SymptomMatchError::EmptySelection));
    }

    #[tokio::test]
    async fn predict_with_no_sources_reports_no_data() {
        let cli = parse(&[
            "symptomatch",
            "predict",
            "fever",
            "--offline",
            "--no-bundled",
            "--json",
        ]);
        let out = run(cli).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["state"], "no_data");
        assert_eq!(value["load_status"], "no_data");
    }

    #[tokio::test]
    async fn demo_catalog_json_reports_expanded_size() {
        let cli = parse(&[
            "symptomatch",
            "catalog",
            "--offline",
            "--no-bundled",
            "--demo",
            "--limit",
            "3",
            "--json",
        ]);
        let out = run(cli).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "ready");
        assert_eq!(value["source"], "demo");
        assert_eq!(value["conditions"], 500);
        assert_eq!(value["records"].as_array().map(Vec::len), Some(3));
    }
}
