//! Message handling - Parsing and command routing

pub mod parser;
pub mod router;

pub use parser::MessageParser;
pub use router::{CommandRouter, HELP_COMMAND, QUESTION_COMMAND, WHITELIST_COMMAND};
