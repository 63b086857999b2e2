//! QA data file loading

use std::io::ErrorKind;
use std::path::Path;

use crate::application::errors::StorageError;
use crate::domain::entities::QaStore;

/// Load the QA table from `path`.
///
/// Never fails: a missing file is created empty, an unreadable or malformed
/// file is logged and yields an empty table.
pub fn load_or_create(path: impl AsRef<Path>) -> QaStore {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(content) => match QaStore::from_json_str(&content) {
            Ok(store) => {
                tracing::info!("Loaded {} questions ({} lookup keys) from {}",
                    store.question_count(), store.len(), path.display());
                store
            }
            Err(e) => {
                tracing::error!("QA file {} is not valid, starting with an empty table: {}", path.display(), e);
                QaStore::new()
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            match create_empty(path) {
                Ok(()) => tracing::info!("Created empty QA file {}", path.display()),
                Err(e) => tracing::warn!("Could not create QA file {}: {}", path.display(), e),
            }
            QaStore::new()
        }
        Err(e) => {
            tracing::error!("Failed to read QA file {}: {}", path.display(), e);
            QaStore::new()
        }
    }
}

fn create_empty(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, "{}\n")?;
    Ok(())
}
