//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: QA lookup, whitelist management, response delivery
//! - Matching: Fuzzy scoring of questions
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and command routing

pub mod errors;
pub mod matching;
pub mod services;
pub mod messaging;
