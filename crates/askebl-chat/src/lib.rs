//! Conversational banking assistant.
//!
//! Rule-based FAQ matching, guided catalog flows (cards, accounts, loans,
//! ATM and branch locations), and the suggestion flow for unanswered
//! questions, driven by an explicit dialogue state machine.

pub mod engine;
pub mod error;
pub mod intent;
pub mod knowledge;
pub mod matcher;
pub mod session;
pub mod sink;
pub mod types;

pub use askebl_core::config::ChatConfig;
pub use engine::ConversationEngine;
pub use error::ChatError;
pub use intent::IntentClassifier;
pub use knowledge::{Catalog, KnowledgeBase};
pub use matcher::{FaqMatcher, ScoredMatch};
pub use session::ChatSession;
pub use sink::{MemorySink, StoredSuggestions, SuggestionSink};
pub use types::{
    Affordance, ChoiceKind, ConversationState, Message, PendingMode, Reply, Sender, Step, Turn,
    TurnOutcome,
};
