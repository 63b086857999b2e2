use crate::application::errors::StorageError;

/// ConfigStore trait - persistence for the mutable part of the configuration
pub trait ConfigStore: Send + Sync {
    /// Read the persisted whitelist
    fn load_whitelist(&self) -> Result<Vec<String>, StorageError>;

    /// Replace the persisted whitelist
    fn save_whitelist(&self, groups: &[String]) -> Result<(), StorageError>;
}
