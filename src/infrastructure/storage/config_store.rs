//! Whitelist persistence backends

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::application::errors::StorageError;
use crate::domain::traits::ConfigStore;
use crate::infrastructure::config::Config;

/// Persists the whitelist into the YAML config file it was loaded from.
///
/// Saving rewrites only the `whitelist` key; every other setting is taken
/// from the file as it is on disk, so runtime overrides never leak into it.
pub struct YamlConfigStore {
    path: PathBuf,
    config: Mutex<Config>,
}

impl YamlConfigStore {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config: Mutex::new(config),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load_whitelist(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.config.lock().unwrap_or_else(PoisonError::into_inner).whitelist.clone())
    }

    fn save_whitelist(&self, groups: &[String]) -> Result<(), StorageError> {
        let mut config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = if self.path.is_file() {
            Config::load(&self.path)?
        } else {
            config.clone()
        };
        updated.whitelist = groups.to_vec();
        updated.save(&self.path)?;

        *config = updated;
        tracing::debug!("Saved whitelist ({} groups) to {}", groups.len(), self.path.display());
        Ok(())
    }
}

/// In-memory store for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    groups: Mutex<Vec<String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryConfigStore {
    pub fn new(groups: Vec<String>) -> Self {
        Self {
            groups: Mutex::new(groups),
            ..Self::default()
        }
    }

    /// Make every save fail with an IO error
    pub fn failing_saves(self) -> Self {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub fn whitelist(&self) -> Vec<String> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_whitelist(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.whitelist())
    }

    fn save_whitelist(&self, groups: &[String]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "config store is read-only",
            )));
        }
        *self.groups.lock().unwrap_or_else(PoisonError::into_inner) = groups.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
