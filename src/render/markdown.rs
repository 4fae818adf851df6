use std::sync::OnceLock;

use minijinja::{Environment, context};

use crate::entities::condition::Prediction;
use crate::error::SymptomMatchError;
use crate::loader::{LoadStatus, SourceFailure, SourceKind};
use crate::session::{OutcomeState, PredictionEngine, PredictionOutcome, Session};

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

const CHART_WIDTH: usize = 20;

fn env() -> Result<&'static Environment<'static>, SymptomMatchError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_filter("pct", |v: f64| -> String { format_percentage(v) });
    env.add_template(
        "predictions.md.j2",
        include_str!("../../templates/predictions.md.j2"),
    )?;
    env.add_template(
        "symptoms.md.j2",
        include_str!("../../templates/symptoms.md.j2"),
    )?;
    env.add_template(
        "catalog.md.j2",
        include_str!("../../templates/catalog.md.j2"),
    )?;

    let _ = ENV.set(env);
    ENV.get().ok_or_else(|| SymptomMatchError::Api {
        api: "render".into(),
        message: "Template environment initialization failed".into(),
    })
}

pub fn format_percentage(v: f64) -> String {
    format!("{v:.1}%")
}

fn status_label(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Ready => "ready",
        LoadStatus::Degraded => "degraded",
        LoadStatus::NoData => "no data",
    }
}

fn engine_label(engine: PredictionEngine) -> &'static str {
    match engine {
        PredictionEngine::Local => "local matcher",
        PredictionEngine::Remote => "remote service",
    }
}

fn state_key(state: OutcomeState) -> &'static str {
    match state {
        OutcomeState::NoData => "no_data",
        OutcomeState::NoMatches => "no_matches",
        OutcomeState::Matches => "matches",
    }
}

/// Warning or error banner describing how the catalog was loaded. `None`
/// when the preferred source answered.
pub fn load_banner(
    status: LoadStatus,
    source: Option<SourceKind>,
    failures: &[SourceFailure],
) -> Option<String> {
    let reasons = failures
        .iter()
        .map(|f| format!("{}: {}", f.source, f.reason.lines().next().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("; ");
    match (status, source) {
        (LoadStatus::Ready, _) => None,
        (LoadStatus::Degraded, Some(source)) => Some(format!(
            "> **Warning:** running in degraded mode on the {source} ({reasons})."
        )),
        (LoadStatus::Degraded, None) | (LoadStatus::NoData, _) => {
            if reasons.is_empty() {
                Some("> **No data:** no condition source is configured.".to_string())
            } else {
                Some(format!(
                    "> **No data:** every condition source failed ({reasons})."
                ))
            }
        }
    }
}

fn prediction_banner(session: &Session, outcome: &PredictionOutcome) -> Option<String> {
    let load = load_banner(
        session.load_status(),
        session.load_source(),
        session.load_failures(),
    );
    let remote = outcome.remote_failure.as_ref().map(|reason| {
        format!(
            "> **Warning:** remote scoring failed ({}); showing local matches.",
            reason.lines().next().unwrap_or_default()
        )
    });
    match (load, remote) {
        (Some(a), Some(b)) => Some(format!("{a}\n>\n{b}")),
        (a, b) => a.or(b),
    }
}

/// Horizontal bar chart of match percentages, one row per prediction.
pub fn bar_chart(predictions: &[Prediction]) -> String {
    let label_width = predictions
        .iter()
        .map(|p| p.disease.chars().count())
        .max()
        .unwrap_or(0);

    predictions
        .iter()
        .map(|p| {
            let pct = p.match_percentage.clamp(0.0, 100.0);
            let filled = ((pct / 100.0) * CHART_WIDTH as f64).round() as usize;
            let filled = filled.min(CHART_WIDTH);
            format!(
                "{:<label_width$}  {}{}  {:>6}",
                p.disease,
                "█".repeat(filled),
                "░".repeat(CHART_WIDTH - filled),
                format_percentage(pct),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn predictions_markdown(
    session: &Session,
    outcome: &PredictionOutcome,
) -> Result<String, SymptomMatchError> {
    let tmpl = env()?.get_template("predictions.md.j2")?;
    Ok(tmpl.render(context! {
        banner => prediction_banner(session, outcome),
        selected => &outcome.selected,
        state => state_key(outcome.state),
        engine => engine_label(outcome.engine),
        chart => bar_chart(&outcome.predictions),
        predictions => &outcome.predictions,
    })?)
}

pub fn symptoms_markdown(session: &Session, filter: Option<&str>) -> Result<String, SymptomMatchError> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty());
    let symptoms = session.index().filter(filter.unwrap_or_default());
    let tmpl = env()?.get_template("symptoms.md.j2")?;
    Ok(tmpl.render(context! {
        banner => load_banner(session.load_status(), session.load_source(), session.load_failures()),
        filter => filter,
        symptoms => symptoms,
        total => session.index().len(),
    })?)
}

pub fn catalog_markdown(session: &Session, limit: usize) -> Result<String, SymptomMatchError> {
    let names: Vec<&str> = session.catalog().names().take(limit).collect();
    let tmpl = env()?.get_template("catalog.md.j2")?;
    Ok(tmpl.render(context! {
        banner => load_banner(session.load_status(), session.load_source(), session.load_failures()),
        status => status_label(session.load_status()),
        source => session.load_source().map(|s| s.to_string()),
        conditions => session.catalog().len(),
        symptoms => session.index().len(),
        names => names,
    })?)
}
