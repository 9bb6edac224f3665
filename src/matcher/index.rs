// WHY: Abbreviation -> long forms, in first-seen order with duplicates kept.
// Order matters because substitution and first-seen fallback both depend on it

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Append-only, insertion-ordered mapping of abbreviations to observed long forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl AbbreviationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a long form, creating the key on first sight
    pub fn record(&mut self, abbreviation: &str, long_form: impl Into<String>) {
        match self.positions.get(abbreviation) {
            Some(&position) => self.entries[position].1.push(long_form.into()),
            None => {
                self.positions.insert(abbreviation.to_string(), self.entries.len());
                self.entries.push((abbreviation.to_string(), vec![long_form.into()]));
            }
        }
    }

    pub fn get(&self, abbreviation: &str) -> Option<&[String]> {
        self.positions
            .get(abbreviation)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.positions.contains_key(abbreviation)
    }

    /// Entries in the order their abbreviations were first recorded
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(abbreviation, long_forms)| (abbreviation.as_str(), long_forms.as_slice()))
    }

    pub fn abbreviations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(abbreviation, _)| abbreviation.as_str())
    }

    /// Number of distinct abbreviations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total long forms recorded across all abbreviations
    pub fn long_form_count(&self) -> usize {
        self.entries.iter().map(|(_, long_forms)| long_forms.len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Append every entry of `other`, keeping both orders
    pub fn merge(&mut self, other: &AbbreviationIndex) {
        for (abbreviation, long_forms) in other.iter() {
            for long_form in long_forms {
                self.record(abbreviation, long_form.as_str());
            }
        }
    }
}

impl Serialize for AbbreviationIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (abbreviation, long_forms) in &self.entries {
            map.serialize_entry(abbreviation, long_forms)?;
        }
        map.end()
    }
}

struct IndexVisitor;

impl<'de> Visitor<'de> for IndexVisitor {
    type Value = AbbreviationIndex;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of abbreviations to lists of long forms")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut index = AbbreviationIndex::new();
        while let Some((abbreviation, long_forms)) = access.next_entry::<String, Vec<String>>()? {
            for long_form in long_forms {
                index.record(&abbreviation, long_form);
            }
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for AbbreviationIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order_and_duplicates() {
        let mut index = AbbreviationIndex::new();
        index.record("TNF", "Tumor necrosis factor");
        index.record("IL6", "Interleukin 6");
        index.record("TNF", "tumor necrosis factor");
        index.record("TNF", "Tumor necrosis factor");

        assert_eq!(index.len(), 2);
        assert_eq!(index.long_form_count(), 4);
        assert_eq!(index.abbreviations().collect::<Vec<_>>(), vec!["TNF", "IL6"]);
        assert_eq!(
            index.get("TNF").unwrap(),
            ["Tumor necrosis factor", "tumor necrosis factor", "Tumor necrosis factor"]
        );
        assert!(index.get("DNA").is_none());
    }

    #[test]
    fn test_clear_and_merge() {
        let mut first = AbbreviationIndex::new();
        first.record("IL6", "Interleukin 6");
        let mut second = AbbreviationIndex::new();
        second.record("TNF", "Tumor necrosis factor");
        second.record("IL6", "interleukin 6");

        first.merge(&second);
        assert_eq!(first.abbreviations().collect::<Vec<_>>(), vec!["IL6", "TNF"]);
        assert_eq!(first.get("IL6").unwrap(), ["Interleukin 6", "interleukin 6"]);

        first.clear();
        assert!(first.is_empty());
        assert!(!first.contains("IL6"));
    }

    #[test]
    fn test_json_keeps_first_seen_order() {
        let mut index = AbbreviationIndex::new();
        index.record("TNF", "Tumor necrosis factor");
        index.record("BMI", "body mass index");
        index.record("AD", "Alzheimer disease");

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(
            json,
            r#"{"TNF":["Tumor necrosis factor"],"BMI":["body mass index"],"AD":["Alzheimer disease"]}"#
        );

        let restored: AbbreviationIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, index);
    }
}
