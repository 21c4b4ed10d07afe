//! Demo knowledge used when the store starts empty.

use std::sync::Arc;

use tracing::info;

use askebl_core::error::AskEblError;
use askebl_core::types::KnowledgeEntry;

use crate::db::Database;
use crate::repository::{FaqRepository, PopularQuestionRepository};

/// Counts of rows inserted by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub faqs: usize,
    pub popular_questions: usize,
}

/// Insert the demo FAQ and popular-question sets.
///
/// Each table is only seeded while it is empty, so calling this on every
/// start-up is safe.
pub fn seed_demo_data(db: &Arc<Database>) -> Result<SeedReport, AskEblError> {
    let mut report = SeedReport::default();

    let faqs = FaqRepository::new(Arc::clone(db));
    if faqs.count()? == 0 {
        for entry in demo_faqs() {
            faqs.insert(&entry)?;
            report.faqs += 1;
        }
    }

    let popular = PopularQuestionRepository::new(Arc::clone(db));
    if popular.count()? == 0 {
        for (order, entry) in demo_popular_questions().into_iter().enumerate() {
            popular.insert(&entry, order as i64 + 1)?;
            report.popular_questions += 1;
        }
    }

    if report != SeedReport::default() {
        info!(
            faqs = report.faqs,
            popular_questions = report.popular_questions,
            "Seeded demo knowledge"
        );
    }
    Ok(report)
}

fn demo_faqs() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "How do I open an account?",
            "You can open an account by visiting any EBL branch with your NID, two passport-size photographs, and a nominee's photograph. You can also start the process online through EBL Skybanking.",
        )
        .with_keywords(["open", "new account", "opening"])
        .with_category("accounts"),
        KnowledgeEntry::new(
            "What are the banking hours?",
            "EBL branches are open Sunday to Thursday, 10:00 AM to 4:00 PM. Selected branches offer extended hours until 6:00 PM.",
        )
        .with_keywords(["hours", "timing", "open", "close"])
        .with_category("general"),
        KnowledgeEntry::new(
            "How can I reset my internet banking password?",
            "Open EBL Skybanking, tap 'Forgot Password', and verify with your registered mobile number. A one-time password will be sent to set a new password.",
        )
        .with_keywords(["password", "reset", "forgot", "skybanking", "login"])
        .with_category("digital"),
        KnowledgeEntry::new(
            "How do I transfer money to another bank?",
            "Use EBL Skybanking or internet banking and choose BEFTN, NPSB, or RTGS depending on the amount and urgency. NPSB transfers are instant up to the daily limit.",
        )
        .with_keywords(["transfer", "send money", "beftn", "npsb", "rtgs"])
        .with_category("payments"),
        KnowledgeEntry::new(
            "What is the minimum balance to keep in savings?",
            "The minimum balance for a regular savings account is BDT 1,000. Student accounts have no minimum balance requirement.",
        )
        .with_keywords(["minimum", "balance", "savings"])
        .with_category("accounts"),
        KnowledgeEntry::new(
            "How can I check my account balance?",
            "You can check your balance through EBL Skybanking, internet banking, any EBL ATM, or by calling the 24/7 contact centre at 16230.",
        )
        .with_keywords(["balance", "check", "statement"])
        .with_category("accounts"),
        KnowledgeEntry::new(
            "What documents are needed for a mortgage?",
            "You need your NID, salary certificate or business documents, six months of bank statements, and the property documents. A relationship manager will guide you through the rest.",
        )
        .with_keywords(["documents", "mortgage", "property", "papers"])
        .with_category("loans"),
    ]
}

fn demo_popular_questions() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "How do I activate SMS alerts?",
            "SMS alerts can be activated from EBL Skybanking under Settings > Alerts, or by submitting a request at any branch.",
        )
        .with_keywords(["sms", "alert", "notification"]),
        KnowledgeEntry::new(
            "What is the daily ATM withdrawal limit?",
            "The default daily ATM withdrawal limit is BDT 100,000 across up to 10 transactions. Limits vary by card type.",
        )
        .with_keywords(["withdrawal", "limit", "cash"]),
        KnowledgeEntry::new(
            "How do I contact customer service?",
            "Call our 24/7 contact centre at 16230 (or +88 09666777325 from abroad), or email info@ebl-bd.com.",
        )
        .with_keywords(["contact", "customer service", "helpline", "call"]),
        KnowledgeEntry::new(
            "What are the current fixed deposit rates?",
            "Fixed deposit rates currently range from 6.5% to 8.5% per annum depending on tenure. Ask a branch for the latest rate sheet.",
        )
        .with_keywords(["fixed deposit", "fd", "interest", "rate"]),
        KnowledgeEntry::new(
            "How do I update my mobile number?",
            "Visit your branch with your NID to update your registered mobile number. The change takes effect within one working day.",
        )
        .with_keywords(["mobile", "phone", "update", "change"]),
    ]
}
