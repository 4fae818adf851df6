use serde::{Deserialize, Serialize};

/// One named condition with its symptom profile and care notes.
///
/// Every field except `name` may be empty; malformed upstream values are
/// coerced to the empty form by `transform::condition` before a record is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl ConditionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            symptoms: Vec::new(),
            precautions: Vec::new(),
            medications: Vec::new(),
        }
    }

    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symptoms = symptoms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_precautions<I, S>(mut self, precautions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precautions = precautions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_medications<I, S>(mut self, medications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.medications = medications.into_iter().map(Into::into).collect();
        self
    }

    /// Clone under a different display name, keeping every other field.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub match_percentage: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl Prediction {
    pub(crate) fn from_record(record: &ConditionRecord, match_percentage: f64) -> Self {
        Self {
            disease: record.name.clone(),
            match_percentage,
            description: record.description.clone(),
            precautions: record.precautions.clone(),
            medications: record.medications.clone(),
        }
    }
}
