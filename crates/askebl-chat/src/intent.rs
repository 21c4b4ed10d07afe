//! Intent classification for the guided flows.
//!
//! An utterance is routed to a catalog flow when it contains one of a fixed
//! set of phrases. Sets are checked in priority order and the first hit wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ChoiceKind;

// =============================================================================
// Keyword sets
// =============================================================================

const CARD_KEYWORDS: &[&str] = &[
    "card",
    "cards",
    "credit card",
    "debit card",
    "corporate card",
    "prepaid card",
    "islamic card",
];

// No bare "account": FAQ questions such as "How do I open an account?" must
// still reach the matcher.
const ACCOUNT_KEYWORDS: &[&str] = &[
    "accounts",
    "account types",
    "type of account",
    "types of account",
    "kind of account",
    "savings account",
    "current account",
    "fixed deposit account",
    "student account",
    "islamic savings",
    "foreign currency account",
];

const LOAN_KEYWORDS: &[&str] = &[
    "loans",
    "loan types",
    "types of loan",
    "loan options",
    "loan products",
    "apply for a loan",
    "get a loan",
    "take a loan",
    "personal loan",
    "home loan",
    "car loan",
    "education loan",
];

// Location phrasing only, so "ATM withdrawal limit" stays a free-text question.
const ATM_KEYWORDS: &[&str] = &[
    "atm near",
    "nearest atm",
    "atm location",
    "atm locations",
    "atm booth",
    "find an atm",
    "find atm",
    "where is the atm",
    "atms",
];

const BRANCH_KEYWORDS: &[&str] = &[
    "branch near",
    "nearest branch",
    "branch location",
    "branch locations",
    "find a branch",
    "find branch",
    "branches",
    "branch address",
];

static LOST_CARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:lost|stolen|stole|missing|misplaced)\b.*\bcards?\b|\bcards?\b.*\b(?:lost|stolen|missing|misplaced)\b",
    )
    .expect("Invalid lost card regex")
});

// =============================================================================
// Classifier
// =============================================================================

/// Routes utterances to a [`ChoiceKind`] by keyword membership.
#[derive(Clone, Debug)]
pub struct IntentClassifier {
    sets: Vec<(ChoiceKind, &'static [&'static str])>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            sets: vec![
                (ChoiceKind::Card, CARD_KEYWORDS),
                (ChoiceKind::Account, ACCOUNT_KEYWORDS),
                (ChoiceKind::Loan, LOAN_KEYWORDS),
                (ChoiceKind::AtmLocation, ATM_KEYWORDS),
                (ChoiceKind::BranchLocation, BRANCH_KEYWORDS),
            ],
        }
    }

    /// First flow whose keyword set has a phrase contained in the utterance.
    pub fn classify(&self, utterance: &str) -> Option<ChoiceKind> {
        let input = utterance.to_lowercase();
        self.sets
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| input.contains(k)))
            .map(|(kind, _)| *kind)
    }

    /// Whether the utterance reports a lost or stolen card.
    pub fn is_lost_card(utterance: &str) -> bool {
        LOST_CARD.is_match(utterance)
    }
}
