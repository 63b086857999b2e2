use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A canned answer, either bare text or text with an optional picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    PlainText(String),
    Rich { text: String, image: Option<PathBuf> },
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::PlainText(text) => text,
            Answer::Rich { text, .. } => text,
        }
    }

    /// Image path as written in the data file, not yet resolved
    pub fn image(&self) -> Option<&Path> {
        match self {
            Answer::PlainText(_) => None,
            Answer::Rich { image, .. } => image.as_deref(),
        }
    }
}

/// One question of the QA table with its canonical text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEntry {
    pub question: String,
    pub answer: Answer,
    pub aliases: Vec<String>,
}

impl QuestionEntry {
    pub fn plain(question: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: Answer::PlainText(text.into()),
            aliases: Vec::new(),
        }
    }

    pub fn rich(question: impl Into<String>, text: impl Into<String>, image: Option<PathBuf>) -> Self {
        Self {
            question: question.into(),
            answer: Answer::Rich { text: text.into(), image },
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub(crate) fn from_raw(question: String, raw: RawAnswer) -> Self {
        match raw {
            RawAnswer::Text(text) => Self::plain(question, text),
            RawAnswer::Rich { text, image, aliases } => {
                let image = image
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from);
                Self::rich(question, text, image).with_aliases(aliases)
            }
        }
    }
}

/// On-disk shape of a QA value
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAnswer {
    Text(String),
    Rich {
        text: String,
        #[serde(default)]
        image: Option<String>,
        #[serde(default)]
        aliases: Vec<String>,
    },
}
