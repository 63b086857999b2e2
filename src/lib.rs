//! campus-qa-bot: answers questions from a curated QA table by fuzzy matching,
//! only in whitelisted groups.

pub mod domain;
pub mod application;
pub mod infrastructure;
