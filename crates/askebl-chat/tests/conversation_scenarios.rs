//! End-to-end conversation scenarios against the seeded demo knowledge.
//!
//! Each test builds its own in-memory database, seeds it, and drives a
//! session through the public API only.

use std::sync::Arc;

use askebl_chat::{
    Affordance, ChatConfig, ChatSession, ChoiceKind, ConversationEngine, KnowledgeBase,
    MemorySink, PendingMode, StoredSuggestions,
};
use askebl_core::types::KnowledgeEntry;
use askebl_storage::{seed_demo_data, Database, SuggestionRepository};

// =============================================================================
// Helpers
// =============================================================================

fn seeded_db() -> Arc<Database> {
    let db = Arc::new(Database::in_memory().unwrap());
    seed_demo_data(&db).unwrap();
    db
}

fn seeded_engine(db: &Arc<Database>) -> Arc<ConversationEngine> {
    let kb = KnowledgeBase::builtin().with_store(db).unwrap();
    Arc::new(ConversationEngine::new(kb, ChatConfig::default()))
}

fn memory_session() -> ChatSession<MemorySink> {
    ChatSession::new(seeded_engine(&seeded_db()), MemorySink::new())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn card_question_opens_card_selection() {
    let mut session = memory_session();

    let reply = session.send("What are your card services?").await.unwrap();

    assert_eq!(
        reply.text,
        "I'd be happy to help you with information about our cards! Please select which type of card you'd like to know about:"
    );
    assert_eq!(
        session.pending(),
        &PendingMode::AwaitingSelection {
            kind: ChoiceKind::Card
        }
    );
}

#[tokio::test]
async fn card_selection_answers_and_returns_idle() {
    let mut session = memory_session();
    session.send("What are your card services?").await.unwrap();

    let reply = session.send("Debit Card").await.unwrap();

    assert!(reply.text.starts_with("EBL Debit Cards provide instant access"));
    assert!(session.pending().is_idle());
}

#[tokio::test]
async fn account_opening_question_hits_the_faq() {
    let mut session = memory_session();

    let reply = session.send("How do I open an account?").await.unwrap();

    assert!(reply.text.starts_with("You can open an account by visiting any EBL branch"));
    assert!(session.pending().is_idle());
}

#[tokio::test]
async fn unknown_question_offers_suggestion() {
    let mut session = memory_session();

    let reply = session.send("xyzzy plugh").await.unwrap();

    assert!(reply
        .text
        .starts_with("I couldn't find a specific answer to your question: \"xyzzy plugh\""));
    assert_eq!(
        session.pending(),
        &PendingMode::AwaitingSuggestionConfirmation {
            question: "xyzzy plugh".to_string()
        }
    );
}

#[tokio::test]
async fn confirming_suggestion_persists_it() {
    let db = seeded_db();
    let mut session = ChatSession::new(seeded_engine(&db), StoredSuggestions::new(Arc::clone(&db)));
    session.send("xyzzy plugh").await.unwrap();

    let reply = session.send("yes").await.unwrap();

    assert!(reply.text.starts_with("Thank you! Your question has been submitted"));
    assert!(session.pending().is_idle());

    let rows = SuggestionRepository::new(db).list_recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question, "xyzzy plugh");
    assert_eq!(&rows[0].session_id, session.session_id());
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn intent_wins_over_faq_in_same_turn() {
    let db = seeded_db();
    // An FAQ that would score highly for the same words.
    let kb = KnowledgeBase::builtin().with_store(&db).unwrap().with_entries(
        vec![KnowledgeEntry::new("What loans do you offer?", "Personal and home loans.")
            .with_keywords(["loans"])],
        Vec::new(),
    );
    let engine = Arc::new(ConversationEngine::new(kb, ChatConfig::default()));
    let mut session = ChatSession::new(engine, MemorySink::new());

    let reply = session.send("What loans do you offer?").await.unwrap();

    assert_ne!(reply.text, "Personal and home loans.");
    assert_eq!(
        session.pending(),
        &PendingMode::AwaitingSelection {
            kind: ChoiceKind::Loan
        }
    );
}

#[tokio::test]
async fn every_catalog_option_resolves() {
    let engine = seeded_engine(&seeded_db());
    for kind in ChoiceKind::ALL {
        let catalog = engine.knowledge().catalog(kind).clone();
        for item in &catalog.items {
            let pending = PendingMode::AwaitingSelection { kind };
            for utterance in [item.name.clone(), item.name.to_uppercase()] {
                let step = engine.step(&pending, &utterance);
                assert_eq!(step.next, PendingMode::Idle, "{kind}: {utterance}");
                assert_eq!(step.reply.text, item.description);
            }
        }
    }
}

#[tokio::test]
async fn repeated_bad_selection_is_idempotent() {
    let mut session = memory_session();
    session.send("Which accounts can I open?").await.unwrap();

    let first = session.send("a pony").await.unwrap();
    let second = session.send("a pony").await.unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.affordance, second.affordance);
    assert!(matches!(
        first.affordance,
        Some(Affordance::Options { ref options }) if options.len() == 6
    ));
    assert_eq!(
        session.pending(),
        &PendingMode::AwaitingSelection {
            kind: ChoiceKind::Account
        }
    );
}

#[tokio::test]
async fn only_yes_or_no_leaves_confirmation() {
    let mut session = memory_session();
    session.send("Do you sell gold bars?").await.unwrap();

    for answer in ["maybe", "yes please", "nope", "card"] {
        session.send(answer).await.unwrap();
        assert_eq!(
            session.pending(),
            &PendingMode::AwaitingSuggestionConfirmation {
                question: "Do you sell gold bars?".to_string()
            }
        );
    }

    session.send(" No ").await.unwrap();
    assert!(session.pending().is_idle());
    assert!(session.sink().submitted().is_empty());
}

#[tokio::test]
async fn suggestion_keeps_original_text() {
    let mut session = memory_session();
    let original = "  Can I pay my ELECTRICITY bill here??  ";
    session.send(original).await.unwrap();
    session.send("y").await.unwrap();

    let submitted = session.sink().submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].question, original);
}

#[tokio::test]
async fn popular_question_button_leaves_selection() {
    let mut session = memory_session();
    session.send("Tell me about your cards").await.unwrap();

    let reply = session.ask_popular(1).await.unwrap();

    assert!(reply.text.starts_with("The default daily ATM withdrawal limit"));
    assert!(session.pending().is_idle());
}

#[tokio::test]
async fn lost_card_shortcut_beats_card_intent() {
    let mut session = memory_session();

    let reply = session.send("My credit card was stolen").await.unwrap();

    assert!(reply.text.contains("16230"));
    assert!(session.pending().is_idle());
}

#[tokio::test]
async fn location_flows() {
    let mut session = memory_session();

    session.send("Where is the nearest ATM?").await.unwrap();
    assert_eq!(
        session.pending(),
        &PendingMode::AwaitingSelection {
            kind: ChoiceKind::AtmLocation
        }
    );
    let reply = session.send("gulshan").await.unwrap();
    assert!(reply.text.starts_with("EBL ATMs in Gulshan"));

    session.send("Find a branch near me").await.unwrap();
    let reply = session.send("I'm in Dhanmondi").await.unwrap();
    assert!(reply.text.starts_with("EBL Dhanmondi Branch"));
    assert!(session.pending().is_idle());
}
