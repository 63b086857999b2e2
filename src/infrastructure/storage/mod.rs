//! Storage - QA data file loading and config persistence

pub mod config_store;
pub mod qa_file;

pub use config_store::{MemoryConfigStore, YamlConfigStore};
pub use qa_file::load_or_create;
