use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::CommandRouter;
use crate::domain::entities::{Content, Message, Response};
use crate::domain::traits::Bot;

/// Service for processing messages and delivering the answers
pub struct MessageService<B: Bot> {
    bot: B,
    router: Arc<CommandRouter>,
}

impl<B: Bot> MessageService<B> {
    pub fn new(bot: B, router: Arc<CommandRouter>) -> Self {
        Self { bot, router }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// Route an incoming message and send whatever it produced
    pub async fn process(&self, message: &Message) -> Result<Option<String>, BotError> {
        tracing::debug!("Processing message {} in chat {}", message.id, message.chat_id);

        let ctx = message.context();
        let response = match &message.content {
            Content::Command { name, args } => self.router.dispatch(name, args, &ctx),
            Content::Text(text) => self.router.handle_text(text, &ctx),
            Content::Empty => Response::Silent,
        };

        self.respond(&message.chat_id, &response).await
    }

    /// Send a response; silent responses send nothing
    pub async fn respond(&self, chat_id: &str, response: &Response) -> Result<Option<String>, BotError> {
        match response {
            Response::Silent => Ok(None),
            Response::Text(text) => self.bot.send_message(chat_id, text).await.map(Some),
            Response::Composite { text, image } => {
                self.bot.send_image(chat_id, text, image).await.map(Some)
            }
        }
    }
}
