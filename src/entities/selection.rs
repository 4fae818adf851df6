use serde::Serialize;

/// Symptom names the user has picked, in the order they were picked.
///
/// Names are stored as displayed. Nothing here checks them against a catalog;
/// scoring treats unknown names as non-matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    symptoms: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the name was already selected.
    pub fn insert(&mut self, symptom: impl Into<String>) -> bool {
        let symptom = symptom.into();
        if self.contains(&symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    /// Returns `false` when the name was not selected.
    pub fn remove(&mut self, symptom: &str) -> bool {
        let before = self.symptoms.len();
        self.symptoms.retain(|s| s != symptom);
        self.symptoms.len() != before
    }

    /// Returns whether the name is selected afterwards.
    pub fn toggle(&mut self, symptom: &str) -> bool {
        if self.remove(symptom) {
            false
        } else {
            self.symptoms.push(symptom.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.symptoms.clear();
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.symptoms.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for symptom in iter {
            set.insert(symptom);
        }
        set
    }
}
