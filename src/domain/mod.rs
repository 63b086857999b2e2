//! Domain layer - Core business objects
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, QA table, Response)
//! - Traits: Abstractions for infrastructure (Bot, ConfigStore)

pub mod entities;
pub mod traits;
