//! Conversation types: dialogue state, messages, and turn results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use askebl_core::types::{SessionId, SuggestedQuestion, Timestamp};

// =============================================================================
// Dialogue state
// =============================================================================

/// A guided flow that asks the user to pick from a fixed catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Card,
    Account,
    Loan,
    AtmLocation,
    BranchLocation,
}

impl ChoiceKind {
    /// All kinds, in intent-classification priority order.
    pub const ALL: [ChoiceKind; 5] = [
        ChoiceKind::Card,
        ChoiceKind::Account,
        ChoiceKind::Loan,
        ChoiceKind::AtmLocation,
        ChoiceKind::BranchLocation,
    ];
}

impl std::fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChoiceKind::Card => "card",
            ChoiceKind::Account => "account",
            ChoiceKind::Loan => "loan",
            ChoiceKind::AtmLocation => "atm_location",
            ChoiceKind::BranchLocation => "branch_location",
        };
        f.write_str(s)
    }
}

/// The single sub-dialogue the engine is waiting to resolve.
///
/// Being one enum, at most one pending mode can ever be active; entering a
/// new one replaces the previous.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PendingMode {
    #[default]
    Idle,
    AwaitingSelection { kind: ChoiceKind },
    /// `question` is the unanswered utterance, kept verbatim.
    AwaitingSuggestionConfirmation { question: String },
}

impl PendingMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, PendingMode::Idle)
    }
}

/// Per-session conversation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: SessionId,
    pub pending: PendingMode,
    history: Vec<Message>,
}

impl ConversationState {
    /// Start a conversation whose history opens with the greeting.
    pub fn new(session_id: SessionId, greeting: &str) -> Self {
        Self {
            session_id,
            pending: PendingMode::Idle,
            history: vec![Message::bot(Reply::text(greeting))],
        }
    }

    /// Messages so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append a message. History is append-only between resets.
    pub fn record(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Clear history and any pending mode, keeping the session identity.
    pub fn reset(&mut self, greeting: &str) {
        self.pending = PendingMode::Idle;
        self.history.clear();
        self.history.push(Message::bot(Reply::text(greeting)));
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// Interactive element the UI may render under a bot message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Affordance {
    /// Selectable options, one button each.
    Options { options: Vec<String> },
    /// Yes / No buttons for the suggestion prompt.
    YesNo { original_question: String },
}

/// A chat message. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordance: Option<Affordance>,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            sender: Sender::User,
            timestamp: Timestamp::now(),
            affordance: None,
        }
    }

    pub fn bot(reply: Reply) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: reply.text,
            sender: Sender::Bot,
            timestamp: Timestamp::now(),
            affordance: reply.affordance,
        }
    }
}

// =============================================================================
// Turn results
// =============================================================================

/// Bot output before it becomes a [`Message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub affordance: Option<Affordance>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            affordance: None,
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            affordance: Some(Affordance::Options { options }),
        }
    }

    pub fn yes_no(text: impl Into<String>, original_question: &str) -> Self {
        Self {
            text: text.into(),
            affordance: Some(Affordance::YesNo {
                original_question: original_question.to_string(),
            }),
        }
    }
}

/// Result of the pure transition function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub reply: Reply,
    pub next: PendingMode,
    /// Question text to forward, set only when the user confirmed a suggestion.
    pub suggestion: Option<String>,
}

/// A turn whose user message is recorded but whose reply is not yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub reply: Reply,
    pub suggestion: Option<SuggestedQuestion>,
}

/// A completed turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: Message,
    pub suggestion: Option<SuggestedQuestion>,
}
