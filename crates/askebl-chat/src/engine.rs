//! Conversation engine: the dialogue state machine.
//!
//! Every turn is resolved in a fixed priority order:
//! 1. a pending catalog selection,
//! 2. a pending suggestion confirmation,
//! 3. otherwise free input: the lost-card shortcut, then intent
//!    classification, then keyword matching, and finally the offer to
//!    forward the question.
//!
//! [`ConversationEngine::step`] is pure. The turn methods wrap it with input
//! validation and history bookkeeping; persisting a confirmed suggestion is
//! left to the caller.

use tracing::{debug, info};

use askebl_core::config::ChatConfig;
use askebl_core::types::{SessionId, SuggestedQuestion, Timestamp};

use crate::error::ChatError;
use crate::intent::IntentClassifier;
use crate::knowledge::KnowledgeBase;
use crate::matcher::FaqMatcher;
use crate::types::{
    ChoiceKind, ConversationState, Message, PendingMode, Reply, Step, Turn, TurnOutcome,
};

const SUGGESTION_THANKS: &str = "Thank you! Your question has been submitted to our admin team. They will review it and may add it to our FAQ database soon. Is there anything else I can help you with?";
const SUGGESTION_FAILED: &str = "I'm sorry, there was an error submitting your suggestion. Please try again later. Is there anything else I can help you with?";
const SUGGESTION_DECLINED: &str = "No problem! Is there anything else I can help you with? You can ask about loans, accounts, credit cards, or any other banking services.";
const YES_NO_REPROMPT: &str = "Please respond with 'Yes' or 'No' only. Would you like me to suggest your question to our admin team to add to our FAQ database?";

fn no_match_text(utterance: &str) -> String {
    format!(
        "I couldn't find a specific answer to your question: \"{utterance}\"\n\n\
         Would you like me to suggest this question to our admin team so they can add it to our FAQ database? \
         This will help us serve you and other customers better.\n\n\
         Please respond with 'Yes' or 'No'."
    )
}

/// Stateless turn logic shared by every session.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    knowledge: KnowledgeBase,
    classifier: IntentClassifier,
    matcher: FaqMatcher,
    config: ChatConfig,
}

impl ConversationEngine {
    pub fn new(knowledge: KnowledgeBase, config: ChatConfig) -> Self {
        info!(
            faqs = knowledge.faqs.len(),
            popular_questions = knowledge.popular_questions.len(),
            threshold = config.match_threshold,
            "Conversation engine ready"
        );
        Self {
            knowledge,
            classifier: IntentClassifier::new(),
            matcher: FaqMatcher::new(config.match_threshold),
            config,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Fresh conversation state with a new session id and the greeting.
    pub fn new_state(&self) -> ConversationState {
        ConversationState::new(SessionId::new(), &self.config.greeting)
    }

    // =========================================================================
    // Transition function
    // =========================================================================

    /// Compute the reply and next mode for one utterance.
    pub fn step(&self, pending: &PendingMode, utterance: &str) -> Step {
        match pending {
            PendingMode::AwaitingSelection { kind } => self.step_selection(*kind, utterance),
            PendingMode::AwaitingSuggestionConfirmation { question } => {
                step_confirmation(question, utterance)
            }
            PendingMode::Idle => self.step_idle(utterance),
        }
    }

    fn step_selection(&self, kind: ChoiceKind, utterance: &str) -> Step {
        let catalog = self.knowledge.catalog(kind);
        match catalog.resolve(utterance) {
            Some(item) => Step {
                reply: Reply::text(&item.description),
                next: PendingMode::Idle,
                suggestion: None,
            },
            None => Step {
                reply: Reply::with_options(catalog.reprompt(), catalog.names()),
                next: PendingMode::AwaitingSelection { kind },
                suggestion: None,
            },
        }
    }

    fn step_idle(&self, utterance: &str) -> Step {
        if IntentClassifier::is_lost_card(utterance) {
            return Step {
                reply: Reply::text(&self.knowledge.lost_card_answer),
                next: PendingMode::Idle,
                suggestion: None,
            };
        }

        if let Some(kind) = self.classifier.classify(utterance) {
            let catalog = self.knowledge.catalog(kind);
            return Step {
                reply: Reply::with_options(&catalog.prompt, catalog.names()),
                next: PendingMode::AwaitingSelection { kind },
                suggestion: None,
            };
        }

        if let Some(hit) = self.matcher.best_match(utterance, self.knowledge.entries()) {
            debug!(score = hit.score, question = %hit.entry.question, "FAQ match");
            return Step {
                reply: Reply::text(&hit.entry.answer),
                next: PendingMode::Idle,
                suggestion: None,
            };
        }

        Step {
            reply: Reply::yes_no(no_match_text(utterance), utterance),
            next: PendingMode::AwaitingSuggestionConfirmation {
                question: utterance.to_string(),
            },
            suggestion: None,
        }
    }

    // =========================================================================
    // Turns
    // =========================================================================

    /// Reject input the engine must never see. Nothing is mutated on error.
    pub fn validate(&self, utterance: &str) -> Result<(), ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }
        if utterance.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if utterance.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }
        Ok(())
    }

    /// Record the user's message and advance the state.
    ///
    /// The reply is returned unrecorded so the caller can swap it out if the
    /// suggestion fails to persist; pass it to [`finish_turn`](Self::finish_turn).
    pub fn begin_turn(
        &self,
        state: &mut ConversationState,
        utterance: &str,
    ) -> Result<Turn, ChatError> {
        self.validate(utterance)?;
        state.record(Message::user(utterance));

        let step = self.step(&state.pending, utterance);
        debug!(
            session_id = %state.session_id,
            from = ?state.pending,
            to = ?step.next,
            "Conversation transition"
        );
        state.pending = step.next;

        let suggestion = step.suggestion.map(|question| {
            info!(session_id = %state.session_id, "Suggestion confirmed");
            SuggestedQuestion {
                question,
                session_id: state.session_id.clone(),
                submitted_at: Timestamp::now(),
            }
        });

        Ok(Turn {
            reply: step.reply,
            suggestion,
        })
    }

    /// Record the bot's reply.
    pub fn finish_turn(&self, state: &mut ConversationState, reply: Reply) -> Message {
        let message = Message::bot(reply);
        state.record(message.clone());
        message
    }

    /// Run a whole turn. Any confirmed suggestion is handed back unpersisted.
    pub fn respond(
        &self,
        state: &mut ConversationState,
        utterance: &str,
    ) -> Result<TurnOutcome, ChatError> {
        let turn = self.begin_turn(state, utterance)?;
        let reply = self.finish_turn(state, turn.reply);
        Ok(TurnOutcome {
            reply,
            suggestion: turn.suggestion,
        })
    }

    /// Reply used in place of the thank-you when the suggestion was not saved.
    pub fn suggestion_failed_reply() -> Reply {
        Reply::text(SUGGESTION_FAILED)
    }

    /// Drop any pending mode, e.g. before a quick question is submitted.
    pub fn cancel_pending(&self, state: &mut ConversationState) {
        if !state.pending.is_idle() {
            debug!(session_id = %state.session_id, from = ?state.pending, "Pending mode cancelled");
            state.pending = PendingMode::Idle;
        }
    }
}

fn step_confirmation(question: &str, utterance: &str) -> Step {
    match utterance.trim().to_lowercase().as_str() {
        "yes" | "y" => Step {
            reply: Reply::text(SUGGESTION_THANKS),
            next: PendingMode::Idle,
            suggestion: Some(question.to_string()),
        },
        "no" | "n" => Step {
            reply: Reply::text(SUGGESTION_DECLINED),
            next: PendingMode::Idle,
            suggestion: None,
        },
        _ => Step {
            reply: Reply::yes_no(YES_NO_REPROMPT, question),
            next: PendingMode::AwaitingSuggestionConfirmation {
                question: question.to_string(),
            },
            suggestion: None,
        },
    }
}
