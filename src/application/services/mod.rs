//! Application services - Business logic orchestration

pub mod message_service;
pub mod qa_service;
pub mod responder;
pub mod whitelist_service;

pub use message_service::MessageService;
pub use qa_service::QaService;
pub use responder::Responder;
pub use whitelist_service::{WhitelistOutcome, WhitelistStore};
