//! Per-run state: the loaded catalog, its symptom index, and the user's
//! selection, plus the submit path that turns them into predictions.

use serde::Serialize;
use tracing::warn;

use crate::entities::catalog::Catalog;
use crate::entities::condition::Prediction;
use crate::entities::matching;
use crate::entities::selection::SelectionSet;
use crate::entities::symptom_index::SymptomIndex;
use crate::error::SymptomMatchError;
use crate::loader::{LoadReport, LoadStatus, SourceFailure, SourceKind};
use crate::sources::remote::RemoteClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionEngine {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeState {
    /// No catalog is loaded, so nothing could be scored.
    NoData,
    NoMatches,
    Matches,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub state: OutcomeState,
    pub engine: PredictionEngine,
    pub selected: Vec<String>,
    pub predictions: Vec<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_failure: Option<String>,
}

impl PredictionOutcome {
    /// Remote scoring was requested but the local engine answered.
    pub fn degraded(&self) -> bool {
        self.remote_failure.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    index: SymptomIndex,
    selection: SelectionSet,
    load_status: LoadStatus,
    load_source: Option<SourceKind>,
    load_failures: Vec<SourceFailure>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            index: SymptomIndex::default(),
            selection: SelectionSet::new(),
            load_status: LoadStatus::NoData,
            load_source: None,
            load_failures: Vec::new(),
        }
    }

    /// Replaces the catalog wholesale and rebuilds the symptom index.
    ///
    /// A report from a total failure installs its empty catalog, so the
    /// session ends up in the no-data state rather than keeping stale data.
    pub fn apply_load(&mut self, report: LoadReport) {
        self.load_status = report.status();
        self.load_source = report.source;
        self.load_failures = report.failures;
        self.catalog = report.catalog;
        self.index = SymptomIndex::from_catalog(&self.catalog);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SymptomIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn load_source(&self) -> Option<SourceKind> {
        self.load_source
    }

    pub fn load_failures(&self) -> &[SourceFailure] {
        &self.load_failures
    }

    pub fn select(&mut self, symptom: &str) -> bool {
        self.selection.insert(symptom)
    }

    pub fn deselect(&mut self, symptom: &str) -> bool {
        self.selection.remove(symptom)
    }

    pub fn toggle(&mut self, symptom: &str) -> bool {
        self.selection.toggle(symptom)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Resolves a typed search term against the symptom index and selects the
    /// match. Returns the selected name, or `None` when nothing matched.
    pub fn select_term(&mut self, term: &str) -> Option<String> {
        let symptom = self.index.resolve(term)?.to_string();
        self.selection.insert(symptom.clone());
        Some(symptom)
    }

    fn ensure_selection(&self) -> Result<(), SymptomMatchError> {
        if self.selection.is_empty() {
            return Err(SymptomMatchError::EmptySelection);
        }
        Ok(())
    }

    fn local_outcome(&self, remote_failure: Option<String>) -> PredictionOutcome {
        let selected = self.selection.to_vec();
        if self.catalog.is_empty() {
            return PredictionOutcome {
                state: OutcomeState::NoData,
                engine: PredictionEngine::Local,
                selected,
                predictions: Vec::new(),
                remote_failure,
            };
        }

        let predictions = matching::score(&self.catalog, &self.selection);
        PredictionOutcome {
            state: if predictions.is_empty() {
                OutcomeState::NoMatches
            } else {
                OutcomeState::Matches
            },
            engine: PredictionEngine::Local,
            selected,
            predictions,
            remote_failure,
        }
    }

    /// Scores the current selection with the local engine.
    ///
    /// # Errors
    ///
    /// Returns [`SymptomMatchError::EmptySelection`] when nothing is selected.
    pub fn predict_local(&self) -> Result<PredictionOutcome, SymptomMatchError> {
        self.ensure_selection()?;
        Ok(self.local_outcome(None))
    }

    /// Scores the current selection, asking the remote service first when a
    /// client is given. Any remote failure falls back to the local engine.
    ///
    /// # Errors
    ///
    /// Returns [`SymptomMatchError::EmptySelection`] when nothing is selected.
    pub async fn predict(
        &self,
        remote: Option<&RemoteClient>,
    ) -> Result<PredictionOutcome, SymptomMatchError> {
        self.ensure_selection()?;
        let Some(remote) = remote else {
            return Ok(self.local_outcome(None));
        };

        let selected = self.selection.to_vec();
        match remote.predict(&selected).await {
            Ok(predictions) => Ok(PredictionOutcome {
                state: if predictions.is_empty() {
                    OutcomeState::NoMatches
                } else {
                    OutcomeState::Matches
                },
                engine: PredictionEngine::Remote,
                selected,
                predictions,
                remote_failure: None,
            }),
            Err(err) => {
                warn!(error = %err, "Remote prediction failed; scoring locally");
                Ok(self.local_outcome(Some(err.to_string())))
            }
        }
    }
}
