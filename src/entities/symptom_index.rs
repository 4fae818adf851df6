use std::collections::BTreeSet;

use serde::Serialize;

use crate::entities::catalog::Catalog;

/// Sorted, deduplicated symptom names across a catalog.
///
/// Deduplication is by exact value: `Fever` and `fever` are both kept so the
/// original casing survives for display. Case folding only happens in the
/// search helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymptomIndex {
    symptoms: Vec<String>,
}

impl SymptomIndex {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let symptoms: BTreeSet<&str> = catalog
            .iter()
            .flat_map(|record| record.symptoms.iter().map(String::as_str))
            .collect();
        Self {
            symptoms: symptoms.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms
            .binary_search_by(|probe| probe.as_str().cmp(symptom))
            .is_ok()
    }

    /// Entries containing `term`, ignoring case. A blank term matches all.
    pub fn filter(&self, term: &str) -> Vec<&str> {
        let term = term.trim().to_lowercase();
        self.symptoms
            .iter()
            .map(String::as_str)
            .filter(|s| term.is_empty() || s.to_lowercase().contains(&term))
            .collect()
    }

    /// Picks the symptom a typed search term refers to: an exact
    /// case-insensitive match first, otherwise the first entry containing it.
    ///
    /// An exact match wins even when a partial match sorts earlier, so typing
    /// `cough` selects `cough` rather than `chronic cough`.
    pub fn resolve(&self, term: &str) -> Option<&str> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        self.symptoms
            .iter()
            .find(|s| s.to_lowercase() == term)
            .or_else(|| self.symptoms.iter().find(|s| s.to_lowercase().contains(&term)))
            .map(String::as_str)
    }
}
