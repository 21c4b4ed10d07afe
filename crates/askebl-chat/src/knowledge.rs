//! The knowledge base the engine answers from.
//!
//! Holds the two matchable entry sets (curated FAQs and popular questions)
//! plus the fixed catalogs the guided flows choose from. A knowledge base is
//! built once and shared read-only across sessions.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use askebl_core::error::AskEblError;
use askebl_core::types::{CatalogItem, KnowledgeEntry};
use askebl_storage::{Database, FaqRepository, PopularQuestionRepository};

use crate::types::ChoiceKind;

// =============================================================================
// Catalog
// =============================================================================

/// A small enumerated list of named offerings, each with one canonical answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Plural noun used in the re-prompt, e.g. "card types".
    pub label: String,
    /// Shown when the flow starts.
    pub prompt: String,
    pub items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
            items,
        }
    }

    /// Option names in display order.
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }

    /// Prompt repeated when a selection does not resolve.
    pub fn reprompt(&self) -> String {
        format!(
            "Please select one of the {} I mentioned: {}.",
            self.label,
            join_options(&self.names())
        )
    }

    /// Resolve a free-text selection to a catalog item.
    ///
    /// Tried in order, all case-insensitive:
    /// 1. the utterance equals an item name;
    /// 2. the utterance contains item names, in which case the longest wins
    ///    (so "Islamic Credit Card" is not read as "Credit Card");
    /// 3. the utterance is contained in an item name, first item wins.
    pub fn resolve(&self, utterance: &str) -> Option<&CatalogItem> {
        let input = utterance.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }

        if let Some(item) = self
            .items
            .iter()
            .find(|item| item.name.to_lowercase() == input)
        {
            return Some(item);
        }

        let mut longest: Option<&CatalogItem> = None;
        for item in &self.items {
            let name = item.name.to_lowercase();
            if input.contains(&name) && longest.map_or(true, |l| name.len() > l.name.len()) {
                longest = Some(item);
            }
        }
        if longest.is_some() {
            return longest;
        }

        self.items
            .iter()
            .find(|item| item.name.to_lowercase().contains(&input))
    }
}

/// "A, B, or C"
fn join_options(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

// =============================================================================
// Knowledge base
// =============================================================================

/// Everything the conversation engine can answer from.
///
/// Deserializes with every field optional; missing fields take the builtin
/// value, so an override file only needs the sections it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub faqs: Vec<KnowledgeEntry>,
    pub popular_questions: Vec<KnowledgeEntry>,
    pub cards: Catalog,
    pub accounts: Catalog,
    pub loans: Catalog,
    pub atm_locations: Catalog,
    pub branch_locations: Catalog,
    /// Fixed procedure returned for lost or stolen card reports.
    pub lost_card_answer: String,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// The bank's fixed catalogs with no FAQ entries attached.
    pub fn builtin() -> Self {
        Self {
            faqs: Vec::new(),
            popular_questions: Vec::new(),
            cards: builtin_cards(),
            accounts: builtin_accounts(),
            loans: builtin_loans(),
            atm_locations: builtin_atm_locations(),
            branch_locations: builtin_branch_locations(),
            lost_card_answer: LOST_CARD_ANSWER.to_string(),
        }
    }

    /// Replace both matchable entry sets.
    pub fn with_entries(mut self, faqs: Vec<KnowledgeEntry>, popular: Vec<KnowledgeEntry>) -> Self {
        self.faqs = faqs;
        self.popular_questions = popular;
        self
    }

    /// Load a knowledge base from a TOML file, filling gaps from the builtin set.
    pub fn load(path: &Path) -> Result<Self, AskEblError> {
        let content = std::fs::read_to_string(path)?;
        let kb: KnowledgeBase = toml::from_str(&content)
            .map_err(|e| AskEblError::Knowledge(format!("{}: {}", path.display(), e)))?;
        kb.validate()?;
        info!(
            faqs = kb.faqs.len(),
            popular_questions = kb.popular_questions.len(),
            "Knowledge base loaded from {}",
            path.display()
        );
        Ok(kb)
    }

    /// Attach the FAQ and active popular-question sets held in storage.
    pub fn with_store(self, db: &Arc<Database>) -> Result<Self, AskEblError> {
        let faqs = FaqRepository::new(Arc::clone(db)).list()?;
        let popular = PopularQuestionRepository::new(Arc::clone(db))
            .list_active()?
            .into_iter()
            .map(|p| p.entry)
            .collect();
        Ok(self.with_entries(faqs, popular))
    }

    /// Reject catalogs the guided flows could never resolve against.
    pub fn validate(&self) -> Result<(), AskEblError> {
        for kind in ChoiceKind::ALL {
            let catalog = self.catalog(kind);
            if catalog.items.is_empty() {
                return Err(AskEblError::Knowledge(format!("{kind} catalog is empty")));
            }
            if catalog.items.iter().any(|item| item.name.trim().is_empty()) {
                return Err(AskEblError::Knowledge(format!(
                    "{kind} catalog has an unnamed item"
                )));
            }
        }
        Ok(())
    }

    pub fn catalog(&self, kind: ChoiceKind) -> &Catalog {
        match kind {
            ChoiceKind::Card => &self.cards,
            ChoiceKind::Account => &self.accounts,
            ChoiceKind::Loan => &self.loans,
            ChoiceKind::AtmLocation => &self.atm_locations,
            ChoiceKind::BranchLocation => &self.branch_locations,
        }
    }

    /// Matchable entries: FAQs first, then popular questions.
    ///
    /// The matcher keeps the first of equally scored entries, so this order
    /// decides ties.
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.faqs.iter().chain(self.popular_questions.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty() && self.popular_questions.is_empty()
    }
}

// =============================================================================
// Builtin catalogs
// =============================================================================

const LOST_CARD_ANSWER: &str = "I'm sorry to hear that. Please block your card immediately by calling our 24/7 contact centre at 16230 or by using the card controls in EBL Skybanking. Once the card is blocked, visit any EBL branch with your NID to request a replacement card.";

fn builtin_cards() -> Catalog {
    Catalog::new(
        "card types",
        "I'd be happy to help you with information about our cards! Please select which type of card you'd like to know about:",
        vec![
            CatalogItem::new("Credit Card", "EBL Credit Cards offer worldwide acceptance with attractive rewards, cashback, and exclusive privileges. Features include EMI facilities, balance transfer options, and comprehensive insurance coverage. Annual fees vary by card type with competitive interest rates."),
            CatalogItem::new("Debit Card", "EBL Debit Cards provide instant access to your account funds with ATM withdrawals, online purchases, and POS transactions. Features include contactless payments, international usage, and real-time SMS alerts for all transactions."),
            CatalogItem::new("Corporate Card", "EBL Corporate Cards are designed for business expenses with centralized billing, expense tracking, and detailed monthly statements. Benefits include higher credit limits, business rewards, and comprehensive reporting for accounting purposes."),
            CatalogItem::new("Prepaid Card", "EBL Prepaid Cards offer secure payment solutions without requiring a bank account. Load money as needed, control spending, and enjoy the convenience of card payments with enhanced security features."),
            CatalogItem::new("Islamic Credit Card", "EBL Islamic Credit Cards are Shariah-compliant financial products offering ethical banking solutions. Features include profit-sharing instead of interest, halal reward programs, and compliance with Islamic financial principles."),
        ],
    )
}

fn builtin_accounts() -> Catalog {
    Catalog::new(
        "account types",
        "I'd be happy to help you with information about our accounts! Please select which type of account you'd like to know about:",
        vec![
            CatalogItem::new("Savings Account", "EBL Savings Account offers competitive interest rates with flexible deposit and withdrawal options. Features include free ATM transactions, online banking, mobile banking, and SMS alerts. Minimum balance requirements apply with attractive monthly profit rates."),
            CatalogItem::new("Current Account", "EBL Current Account is designed for frequent transactions with no transaction limits. Perfect for businesses and individuals with high transaction volumes. Features include checkbook facility, overdraft options, and dedicated relationship manager."),
            CatalogItem::new("Fixed Deposit Account", "EBL Fixed Deposit Account offers guaranteed returns with flexible tenure options from 1 month to 5 years. Higher interest rates than savings accounts, with premature encashment facility. Choose from monthly, quarterly, or maturity profit payments."),
            CatalogItem::new("Student Account", "EBL Student Account is specially designed for students with zero balance requirements and reduced charges. Features include free debit card, online banking, student loan facilities, and educational discounts at partner merchants."),
            CatalogItem::new("Islamic Savings Account", "EBL Islamic Savings Account is Shariah-compliant offering ethical banking solutions. Features include profit-sharing based on Islamic principles, halal investment options, and compliance with Shariah guidelines. No interest-based transactions."),
            CatalogItem::new("Foreign Currency Account", "EBL Foreign Currency Account allows you to maintain balances in major foreign currencies including USD, EUR, GBP. Features include competitive exchange rates, international wire transfers, and protection against currency fluctuations."),
        ],
    )
}

fn builtin_loans() -> Catalog {
    Catalog::new(
        "loan types",
        "I'd be happy to help you with information about our loans! Please select which type of loan you'd like to know about:",
        vec![
            CatalogItem::new("Personal Loan", "EBL Personal Loan helps you meet personal needs such as travel, weddings, or medical expenses. Interest rates range from 12% to 16% per annum with tenures up to 5 years and no security required for salaried applicants."),
            CatalogItem::new("Home Loan", "EBL Home Loan finances the purchase, construction, or renovation of your home. Interest rates range from 7.5% to 10% per annum with tenures up to 25 years and flexible repayment options."),
            CatalogItem::new("Car Loan", "EBL Car Loan finances new and reconditioned vehicles. Interest rates range from 10% to 14% per annum with tenures up to 6 years and quick processing."),
            CatalogItem::new("Education Loan", "EBL Education Loan covers tuition and living costs for higher studies at home and abroad. Interest rates range from 8% to 12% per annum with a grace period until the course is complete."),
        ],
    )
}

fn builtin_atm_locations() -> Catalog {
    Catalog::new(
        "areas",
        "I can help you find an EBL ATM! Which area would you like ATM locations for?",
        vec![
            CatalogItem::new("Gulshan", "EBL ATMs in Gulshan: Gulshan Avenue (Road 90), Gulshan 1 Circle, and Gulshan 2 DCC Market. All booths are open 24/7."),
            CatalogItem::new("Dhanmondi", "EBL ATMs in Dhanmondi: Satmasjid Road (Road 27), Dhanmondi 32, and Rapa Plaza. All booths are open 24/7."),
            CatalogItem::new("Motijheel", "EBL ATMs in Motijheel: Dilkusha Commercial Area, Shapla Chattar, and Motijheel C/A. All booths are open 24/7."),
            CatalogItem::new("Uttara", "EBL ATMs in Uttara: Sector 3 Jashimuddin Avenue, Sector 7, and House Building. All booths are open 24/7."),
            CatalogItem::new("Chattogram", "EBL ATMs in Chattogram: Agrabad C/A, GEC Circle, and Nasirabad. All booths are open 24/7."),
            CatalogItem::new("Sylhet", "EBL ATMs in Sylhet: Zindabazar, Amberkhana, and Upashahar. All booths are open 24/7."),
        ],
    )
}

fn builtin_branch_locations() -> Catalog {
    Catalog::new(
        "areas",
        "I can help you find an EBL branch! Which area would you like branch locations for?",
        vec![
            CatalogItem::new("Gulshan", "EBL Gulshan Branch: 100 Gulshan Avenue, Dhaka 1212. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
            CatalogItem::new("Dhanmondi", "EBL Dhanmondi Branch: House 58, Satmasjid Road, Dhaka 1209. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
            CatalogItem::new("Motijheel", "EBL Principal Branch: 100 Motijheel C/A, Dhaka 1000. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
            CatalogItem::new("Uttara", "EBL Uttara Branch: House 1, Road 7, Sector 3, Uttara, Dhaka 1230. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
            CatalogItem::new("Chattogram", "EBL Agrabad Branch: 37 Agrabad C/A, Chattogram 4100. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
            CatalogItem::new("Sylhet", "EBL Sylhet Branch: Zindabazar, Sylhet 3100. Open Sunday to Thursday, 10:00 AM to 4:00 PM."),
        ],
    )
}
