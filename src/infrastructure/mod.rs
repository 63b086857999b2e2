//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: QA data file and config persistence
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod adapters;
