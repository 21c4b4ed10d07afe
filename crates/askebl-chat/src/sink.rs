//! Destinations for confirmed suggestions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use askebl_core::types::SuggestedQuestion;
use askebl_storage::{Database, SuggestionRepository};

use crate::error::ChatError;

/// Accepts questions the user agreed to forward for FAQ curation.
#[async_trait]
pub trait SuggestionSink: Send + Sync {
    async fn submit(&self, suggestion: &SuggestedQuestion) -> Result<(), ChatError>;
}

/// Keeps suggestions in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    submitted: Mutex<Vec<SuggestedQuestion>>,
    reject: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that fails every submission.
    pub fn rejecting() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    /// Suggestions received so far, oldest first.
    pub fn submitted(&self) -> Vec<SuggestedQuestion> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SuggestionSink for MemorySink {
    async fn submit(&self, suggestion: &SuggestedQuestion) -> Result<(), ChatError> {
        if self.reject {
            return Err(ChatError::Persistence("sink is rejecting writes".to_string()));
        }
        self.submitted
            .lock()
            .map_err(|e| ChatError::Persistence(format!("sink lock poisoned: {}", e)))?
            .push(suggestion.clone());
        Ok(())
    }
}

/// Writes suggestions to the `suggested_faqs` table.
pub struct StoredSuggestions {
    repo: SuggestionRepository,
}

impl StoredSuggestions {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: SuggestionRepository::new(db),
        }
    }
}

#[async_trait]
impl SuggestionSink for StoredSuggestions {
    async fn submit(&self, suggestion: &SuggestedQuestion) -> Result<(), ChatError> {
        let id = self
            .repo
            .save(suggestion)
            .map_err(|e| ChatError::Persistence(e.to_string()))?;
        info!(id = %id, session_id = %suggestion.session_id, "Suggestion stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askebl_core::types::{SessionId, Timestamp};

    fn suggestion(text: &str) -> SuggestedQuestion {
        SuggestedQuestion {
            question: text.to_string(),
            session_id: SessionId("session_1_abc".to_string()),
            submitted_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        sink.submit(&suggestion("first")).await.unwrap();
        sink.submit(&suggestion("second")).await.unwrap();
        let got = sink.submitted();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].question, "first");
    }

    #[tokio::test]
    async fn test_rejecting_sink() {
        let sink = MemorySink::rejecting();
        let err = sink.submit(&suggestion("q")).await.unwrap_err();
        assert!(matches!(err, ChatError::Persistence(_)));
        assert!(sink.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_stored_suggestions_round_trip() {
        let db = Arc::new(Database::in_memory().unwrap());
        let sink = StoredSuggestions::new(Arc::clone(&db));
        sink.submit(&suggestion("Do you offer gold loans?")).await.unwrap();

        let rows = SuggestionRepository::new(db).list_recent(10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "Do you offer gold loans?");
        assert_eq!(rows[0].session_id.as_str(), "session_1_abc");
    }
}
