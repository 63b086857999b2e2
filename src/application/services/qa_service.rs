use crate::application::matching::{self, DEFAULT_CUTOFF};
use crate::domain::entities::{QaStore, Response};
use crate::infrastructure::config::QaConfig;

use super::responder::{Responder, EMPTY_QUESTION_HINT};

/// Answers free-text questions from the QA table
pub struct QaService {
    store: QaStore,
    responder: Responder,
    cutoff: u8,
    sample_count: usize,
}

impl QaService {
    pub fn new(store: QaStore, config: &QaConfig) -> Self {
        Self {
            store,
            responder: Responder::new(&config.image_dir).with_contact(config.contact.clone()),
            cutoff: config.cutoff,
            sample_count: config.sample_count,
        }
    }

    pub fn with_responder(store: QaStore, responder: Responder) -> Self {
        Self {
            store,
            responder,
            cutoff: DEFAULT_CUTOFF,
            sample_count: 3,
        }
    }

    pub fn with_cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn answer(&self, question: &str) -> Response {
        let question = question.trim();
        if question.is_empty() {
            return Response::text(EMPTY_QUESTION_HINT);
        }

        let found = matching::best_match(question, self.store.lookup_keys(), self.cutoff)
            .and_then(|m| self.store.entry(&m.key).map(|entry| (m, entry)));

        match found {
            Some((m, entry)) => {
                tracing::debug!("Matched {:?} -> {:?} (score {})", question, m.key, m.score);
                self.responder.render_match(entry)
            }
            None => {
                tracing::debug!("No match for {:?}", question);
                self.responder.render_fallback(self.store.sample_keys(self.sample_count))
            }
        }
    }
}
