//! A single user's conversation.

use std::sync::Arc;

use tracing::{info, warn};

use askebl_core::types::{KnowledgeEntry, SessionId};

use crate::engine::ConversationEngine;
use crate::error::ChatError;
use crate::sink::SuggestionSink;
use crate::types::{ConversationState, Message, PendingMode};

/// Owns one conversation's state and forwards confirmed suggestions to a sink.
///
/// Sessions share an engine but never state, so a session needs no locking;
/// callers process one message at a time through `&mut self`.
pub struct ChatSession<S: SuggestionSink> {
    engine: Arc<ConversationEngine>,
    state: ConversationState,
    sink: S,
}

impl<S: SuggestionSink> ChatSession<S> {
    pub fn new(engine: Arc<ConversationEngine>, sink: S) -> Self {
        let state = engine.new_state();
        info!(session_id = %state.session_id, "Chat session started");
        Self {
            engine,
            state,
            sink,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.state.session_id
    }

    pub fn history(&self) -> &[Message] {
        self.state.history()
    }

    pub fn pending(&self) -> &PendingMode {
        &self.state.pending
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one user message and return the bot's reply.
    ///
    /// A suggestion that fails to persist does not fail the turn: the user
    /// gets an apology instead of the thank-you and the conversation is back
    /// to idle. Nothing is retried.
    pub async fn send(&mut self, text: &str) -> Result<Message, ChatError> {
        let turn = self.engine.begin_turn(&mut self.state, text)?;

        let mut reply = turn.reply;
        if let Some(suggestion) = &turn.suggestion {
            if let Err(e) = self.sink.submit(suggestion).await {
                warn!(
                    session_id = %self.state.session_id,
                    error = %e,
                    "Failed to submit suggestion"
                );
                reply = ConversationEngine::suggestion_failed_reply();
            }
        }

        Ok(self.engine.finish_turn(&mut self.state, reply))
    }

    /// Quick questions offered above the chat.
    /// Every FAQ the engine matches against.
    pub fn faqs(&self) -> &[KnowledgeEntry] {
        &self.engine.knowledge().faqs
    }

    pub fn popular_questions(&self) -> Vec<&KnowledgeEntry> {
        self.engine
            .knowledge()
            .popular_questions
            .iter()
            .take(self.engine.config().popular_question_limit)
            .collect()
    }

    /// Ask the quick question at `index` (zero-based), abandoning any
    /// pending selection or suggestion first.
    pub async fn ask_popular(&mut self, index: usize) -> Result<Message, ChatError> {
        let question = self
            .popular_questions()
            .get(index)
            .map(|entry| entry.question.clone())
            .ok_or(ChatError::UnknownPopularQuestion(index))?;

        self.engine.cancel_pending(&mut self.state);
        self.send(&question).await
    }

    /// Start over with only the greeting. The session id is kept.
    pub fn reset(&mut self) {
        self.state.reset(&self.engine.config().greeting);
        info!(session_id = %self.state.session_id, "Chat session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::sink::MemorySink;
    use crate::types::{ChoiceKind, Sender};
    use askebl_core::config::ChatConfig;

    fn engine() -> Arc<ConversationEngine> {
        let popular = (1..=12)
            .map(|i| KnowledgeEntry::new(format!("Popular question number {i}"), format!("Answer {i}")))
            .collect();
        let kb = KnowledgeBase::builtin().with_entries(Vec::new(), popular);
        Arc::new(ConversationEngine::new(kb, ChatConfig::default()))
    }

    #[tokio::test]
    async fn test_send_records_history() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        let reply = session.send("What are your card services?").await.unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(session.history().len(), 3);
        assert_eq!(
            session.pending(),
            &PendingMode::AwaitingSelection {
                kind: ChoiceKind::Card
            }
        );
    }

    #[tokio::test]
    async fn test_empty_send_is_rejected() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        assert!(matches!(
            session.send("  ").await,
            Err(ChatError::EmptyMessage)
        ));
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_suggestion_reaches_sink() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        session.send("xyzzy plugh").await.unwrap();
        let reply = session.send("Yes").await.unwrap();

        assert!(reply.text.starts_with("Thank you!"));
        let submitted = session.sink().submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].question, "xyzzy plugh");
        assert_eq!(&submitted[0].session_id, session.session_id());
    }

    #[tokio::test]
    async fn test_failed_suggestion_still_returns_idle() {
        let mut session = ChatSession::new(engine(), MemorySink::rejecting());
        session.send("xyzzy plugh").await.unwrap();
        let reply = session.send("y").await.unwrap();

        assert!(reply.text.contains("error submitting your suggestion"));
        assert!(session.pending().is_idle());
        assert_eq!(session.history().last().map(|m| m.text.clone()), Some(reply.text));
    }

    #[tokio::test]
    async fn test_popular_questions_limited() {
        let session = ChatSession::new(engine(), MemorySink::new());
        assert_eq!(session.popular_questions().len(), 9);
    }

    #[tokio::test]
    async fn test_faqs_lists_knowledge_faqs() {
        let session = ChatSession::new(engine(), MemorySink::new());
        assert!(session.faqs().is_empty());

        let kb = KnowledgeBase::builtin().with_entries(
            vec![KnowledgeEntry::new("What are the banking hours?", "10am to 4pm")],
            Vec::new(),
        );
        let engine = Arc::new(ConversationEngine::new(kb, ChatConfig::default()));
        let session = ChatSession::new(engine, MemorySink::new());
        assert_eq!(session.faqs().len(), 1);
        assert_eq!(session.faqs()[0].answer, "10am to 4pm");
    }

    #[tokio::test]
    async fn test_ask_popular_cancels_pending() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        session.send("xyzzy plugh").await.unwrap();
        assert!(!session.pending().is_idle());

        let reply = session.ask_popular(2).await.unwrap();
        assert_eq!(reply.text, "Answer 3");
        assert!(session.pending().is_idle());
        assert!(session.sink().submitted().is_empty());
    }

    #[tokio::test]
    async fn test_ask_popular_out_of_range() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        assert!(matches!(
            session.ask_popular(9).await,
            Err(ChatError::UnknownPopularQuestion(9))
        ));
    }

    #[tokio::test]
    async fn test_reset_keeps_session_id() {
        let mut session = ChatSession::new(engine(), MemorySink::new());
        let id = session.session_id().clone();
        session.send("show me loans").await.unwrap();

        session.reset();

        assert_eq!(session.session_id(), &id);
        assert_eq!(session.history().len(), 1);
        assert!(session.pending().is_idle());
    }
}
