use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::{CommandError, ValidationError};
use crate::domain::traits::ConfigStore;

static GROUP_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid group id pattern"));

/// Result of a whitelist mutation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistOutcome {
    Added,
    Removed,
    /// Add of a group that is already listed; nothing changed
    AlreadyPresent,
    /// Remove of a group that is not listed; nothing changed
    NotPresent,
}

impl WhitelistOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, WhitelistOutcome::Added | WhitelistOutcome::Removed)
    }
}

/// Group allow-list, saved through its `ConfigStore` on every change
pub struct WhitelistStore {
    groups: Vec<String>,
    persistence: Arc<dyn ConfigStore>,
}

impl WhitelistStore {
    /// Build from already loaded ids. Invalid and duplicate ids are dropped.
    pub fn new(groups: Vec<String>, persistence: Arc<dyn ConfigStore>) -> Self {
        let mut store = Self {
            groups: Vec::with_capacity(groups.len()),
            persistence,
        };
        for group in groups {
            if validate_group_id(&group).is_err() {
                tracing::warn!("Ignoring invalid whitelist entry {:?}", group);
            } else if !store.groups.contains(&group) {
                store.groups.push(group);
            }
        }
        store
    }

    /// Build from whatever the store has persisted
    pub fn load(persistence: Arc<dyn ConfigStore>) -> Result<Self, CommandError> {
        let groups = persistence.load_whitelist()?;
        Ok(Self::new(groups, persistence))
    }

    pub fn is_allowed(&self, group_id: &str) -> bool {
        self.groups.iter().any(|g| g == group_id)
    }

    pub fn list(&self) -> &[String] {
        &self.groups
    }

    pub fn add(&mut self, group_id: &str) -> Result<WhitelistOutcome, CommandError> {
        validate_group_id(group_id)?;
        if self.is_allowed(group_id) {
            tracing::warn!("Group {} is already whitelisted", group_id);
            return Ok(WhitelistOutcome::AlreadyPresent);
        }

        self.groups.push(group_id.to_string());
        if let Err(e) = self.persistence.save_whitelist(&self.groups) {
            self.groups.pop();
            return Err(e.into());
        }

        tracing::info!("Group {} added to whitelist", group_id);
        Ok(WhitelistOutcome::Added)
    }

    pub fn remove(&mut self, group_id: &str) -> Result<WhitelistOutcome, CommandError> {
        validate_group_id(group_id)?;
        let Some(index) = self.groups.iter().position(|g| g == group_id) else {
            tracing::warn!("Group {} is not whitelisted", group_id);
            return Ok(WhitelistOutcome::NotPresent);
        };

        let removed = self.groups.remove(index);
        if let Err(e) = self.persistence.save_whitelist(&self.groups) {
            self.groups.insert(index, removed);
            return Err(e.into());
        }

        tracing::info!("Group {} removed from whitelist", group_id);
        Ok(WhitelistOutcome::Removed)
    }
}

/// Group ids are non-empty runs of ASCII digits
pub fn validate_group_id(group_id: &str) -> Result<(), ValidationError> {
    if GROUP_ID.is_match(group_id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidGroupId(group_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryConfigStore;

    fn store_with(groups: &[&str]) -> (WhitelistStore, Arc<MemoryConfigStore>) {
        let persistence = Arc::new(MemoryConfigStore::new(groups.iter().map(|g| g.to_string()).collect()));
        let store = WhitelistStore::load(persistence.clone()).unwrap();
        (store, persistence)
    }

    #[test]
    fn test_add_twice_lists_once() {
        let (mut store, persistence) = store_with(&[]);

        assert_eq!(store.add("12345678").unwrap(), WhitelistOutcome::Added);
        assert_eq!(store.add("12345678").unwrap(), WhitelistOutcome::AlreadyPresent);

        assert_eq!(store.list(), ["12345678"]);
        assert_eq!(persistence.whitelist(), vec!["12345678".to_string()]);
        assert_eq!(persistence.save_count(), 1);
    }

    #[test]
    fn test_remove_absent_group_is_a_warning() {
        let (mut store, persistence) = store_with(&["111"]);

        assert_eq!(store.remove("222").unwrap(), WhitelistOutcome::NotPresent);
        assert_eq!(store.list(), ["111"]);
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_remove_member() {
        let (mut store, persistence) = store_with(&["111", "222"]);

        assert_eq!(store.remove("111").unwrap(), WhitelistOutcome::Removed);
        assert!(!store.is_allowed("111"));
        assert!(store.is_allowed("222"));
        assert_eq!(persistence.whitelist(), vec!["222".to_string()]);
    }

    #[test]
    fn test_non_digit_ids_are_rejected() {
        let (mut store, persistence) = store_with(&["111"]);

        for bad in ["", "12a4", "-123", "１２３", "12 34"] {
            let err = store.add(bad).unwrap_err();
            assert!(matches!(err, CommandError::Validation(ValidationError::InvalidGroupId(_))), "{:?}", bad);
            assert!(store.remove(bad).is_err());
        }
        assert_eq!(store.list(), ["111"]);
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let persistence = Arc::new(MemoryConfigStore::new(vec!["111".to_string()]).failing_saves());
        let mut store = WhitelistStore::load(persistence.clone()).unwrap();

        assert!(matches!(store.add("222"), Err(CommandError::Storage(_))));
        assert!(!store.is_allowed("222"));

        assert!(matches!(store.remove("111"), Err(CommandError::Storage(_))));
        assert!(store.is_allowed("111"));
    }

    #[test]
    fn test_new_drops_invalid_and_duplicate_entries() {
        let persistence = Arc::new(MemoryConfigStore::default());
        let store = WhitelistStore::new(
            vec!["1".to_string(), "x".to_string(), "1".to_string(), "2".to_string()],
            persistence,
        );
        assert_eq!(store.list(), ["1", "2"]);
    }

    #[test]
    fn test_outcome_changed() {
        assert!(WhitelistOutcome::Added.changed());
        assert!(WhitelistOutcome::Removed.changed());
        assert!(!WhitelistOutcome::AlreadyPresent.changed());
        assert!(!WhitelistOutcome::NotPresent.changed());
    }
}
