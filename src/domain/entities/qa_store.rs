//! Question/answer table with alias expansion

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::answer::{QuestionEntry, RawAnswer};
use crate::application::errors::StorageError;

/// Flattened lookup table: every canonical question and every alias is a key.
///
/// Keys keep the order of the data file, a canonical question followed by its
/// aliases. A key always resolves to exactly one entry; aliases share the
/// entry of their canonical question.
#[derive(Debug, Clone, Default)]
pub struct QaStore {
    keys: Vec<String>,
    entries: HashMap<String, Arc<QuestionEntry>>,
    questions: usize,
}

impl QaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = QuestionEntry>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    /// Parse the JSON data file format.
    ///
    /// The top level must be an object. Values that are neither a string nor
    /// a `{text, image?, aliases?}` object are skipped with a warning.
    pub fn from_json_str(content: &str) -> Result<Self, StorageError> {
        let table: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut store = Self::new();
        for (question, value) in table {
            match serde_json::from_value::<RawAnswer>(value) {
                Ok(raw) => store.insert(QuestionEntry::from_raw(question, raw)),
                Err(e) => {
                    tracing::warn!("Skipping malformed QA entry {:?}: {}", question, e);
                }
            }
        }
        Ok(store)
    }

    /// Add an entry under its question and aliases. Keys already taken keep
    /// their first entry.
    pub fn insert(&mut self, entry: QuestionEntry) {
        let entry = Arc::new(entry);
        let keys = std::iter::once(&entry.question).chain(entry.aliases.iter());

        let mut inserted = false;
        for key in keys {
            if key.trim().is_empty() {
                continue;
            }
            if self.entries.contains_key(key) {
                tracing::warn!("Duplicate QA key {:?} ignored (question {:?})", key, entry.question);
                continue;
            }
            self.keys.push(key.clone());
            self.entries.insert(key.clone(), Arc::clone(&entry));
            inserted = true;
        }

        if inserted {
            self.questions += 1;
        }
    }

    pub fn lookup_keys(&self) -> &[String] {
        &self.keys
    }

    pub fn entry(&self, key: &str) -> Option<&QuestionEntry> {
        self.entries.get(key).map(Arc::as_ref)
    }

    /// First `n` lookup keys, used as suggestions
    pub fn sample_keys(&self, n: usize) -> &[String] {
        &self.keys[..n.min(self.keys.len())]
    }

    /// Number of distinct questions
    pub fn question_count(&self) -> usize {
        self.questions
    }

    /// Number of lookup keys, aliases included
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Answer;

    const SAMPLE: &str = r#"{
        "学校简介": "欢迎来到本校",
        "简称": {"text": "本校简称深技大", "aliases": ["全称", "校名"]},
        "校园地图": {"text": "见下图", "image": "images/map.png"}
    }"#;

    #[test]
    fn test_aliases_expand_in_file_order() {
        let store = QaStore::from_json_str(SAMPLE).unwrap();

        assert_eq!(store.lookup_keys(), ["学校简介", "简称", "全称", "校名", "校园地图"]);
        assert_eq!(store.question_count(), 3);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_alias_resolves_to_same_entry() {
        let store = QaStore::from_json_str(SAMPLE).unwrap();

        let canonical = store.entry("简称").unwrap();
        let alias = store.entry("全称").unwrap();
        assert!(std::ptr::eq(canonical, alias));
        assert_eq!(alias.question, "简称");
    }

    #[test]
    fn test_image_entry_keeps_relative_path() {
        let store = QaStore::from_json_str(SAMPLE).unwrap();
        let entry = store.entry("校园地图").unwrap();

        assert_eq!(entry.answer.image(), Some(std::path::Path::new("images/map.png")));
    }

    #[test]
    fn test_alias_collision_keeps_first_entry() {
        let store = QaStore::from_json_str(r#"{
            "学费": "每年5000元",
            "收费": {"text": "详见招生简章", "aliases": ["学费"]}
        }"#).unwrap();

        assert_eq!(store.lookup_keys(), ["学费", "收费"]);
        assert_eq!(store.entry("学费").unwrap().answer, Answer::PlainText("每年5000元".to_string()));
    }

    #[test]
    fn test_malformed_value_is_skipped() {
        let store = QaStore::from_json_str(r#"{"a": 1, "b": "ok", "c": {"image": "x.png"}}"#).unwrap();

        assert_eq!(store.lookup_keys(), ["b"]);
    }

    #[test]
    fn test_non_object_top_level_is_an_error() {
        assert!(QaStore::from_json_str("[1, 2]").is_err());
        assert!(QaStore::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_sample_keys_is_bounded() {
        let store = QaStore::from_json_str(SAMPLE).unwrap();

        assert_eq!(store.sample_keys(3), ["学校简介", "简称", "全称"]);
        assert_eq!(store.sample_keys(10).len(), 5);
        assert!(QaStore::new().sample_keys(3).is_empty());
    }
}
