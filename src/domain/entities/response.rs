use std::path::PathBuf;

/// What the bot sends back for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing is sent at all
    Silent,
    Text(String),
    /// Caption followed by an image attachment
    Composite { text: String, image: PathBuf },
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Response::Text(text.into())
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Response::Silent)
    }

    /// Text part of the response, the caption for composites
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Response::Silent => None,
            Response::Text(text) => Some(text),
            Response::Composite { text, .. } => Some(text),
        }
    }
}
