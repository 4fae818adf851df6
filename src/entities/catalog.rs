use std::collections::HashMap;

use serde::Serialize;

use crate::entities::condition::ConditionRecord;

/// Insertion-ordered mapping from condition name to record.
///
/// Keys are unique. Inserting a name that already exists replaces the stored
/// record but keeps its original position, so ranking ties stay anchored to
/// the first time a condition was seen.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<ConditionRecord>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ConditionRecord) {
        match self.positions.get(&record.name) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.positions.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConditionRecord> {
        self.positions.get(name).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

impl FromIterator<ConditionRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = ConditionRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ConditionRecord;
    type IntoIter = std::slice::Iter<'a, ConditionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_replaces_in_place() {
        let catalog: Catalog = [
            ConditionRecord::new("Flu").with_symptoms(["fever"]),
            ConditionRecord::new("Cold").with_symptoms(["cough"]),
            ConditionRecord::new("Flu").with_symptoms(["chills"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Flu", "Cold"]);
        assert_eq!(
            catalog.get("Flu").map(|r| r.symptoms.clone()),
            Some(vec!["chills".to_string()])
        );
    }

    #[test]
    fn lookup_is_exact() {
        let catalog: Catalog = [ConditionRecord::new("Flu")].into_iter().collect();
        assert!(catalog.contains("Flu"));
        assert!(!catalog.contains("flu"));
        assert!(catalog.get("Cold").is_none());
    }

    #[test]
    fn serializes_as_record_list() {
        let catalog: Catalog = [ConditionRecord::new("Flu")].into_iter().collect();
        let json = serde_json::to_value(&catalog).expect("catalog json");
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "Flu");
    }
}
