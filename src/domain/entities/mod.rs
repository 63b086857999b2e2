//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod answer;
pub mod qa_store;
pub mod response;

pub use user::User;
pub use message::{ChatContext, Content, Message};
pub use command::{Command, CommandRegistry, Permission};
pub use answer::{Answer, QuestionEntry};
pub use qa_store::QaStore;
pub use response::Response;
