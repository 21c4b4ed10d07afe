//! Keyword scoring over knowledge entries.

use askebl_core::types::KnowledgeEntry;

/// Default minimum score an entry must exceed to count as a match.
pub const DEFAULT_THRESHOLD: u32 = 3;

const QUESTION_TOKEN_SCORE: u32 = 2;
const KEYWORD_PAIR_SCORE: u32 = 3;
const PHRASE_BONUS: u32 = 5;

/// The winning entry and its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMatch<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: u32,
}

/// Scores entries against a query and picks the best one above a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaqMatcher {
    pub threshold: u32,
}

impl Default for FaqMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FaqMatcher {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Score one entry:
    /// - +2 per query token found in the question,
    /// - +3 per (token, keyword) pair where either contains the other,
    /// - +5 when the whole query and the question contain one another.
    pub fn score(&self, query: &str, entry: &KnowledgeEntry) -> u32 {
        let query = query.trim().to_lowercase();
        let tokens = tokenize(&query);
        let question = entry.question.to_lowercase();

        let mut score = 0;
        for token in &tokens {
            if question.contains(token) {
                score += QUESTION_TOKEN_SCORE;
            }
        }

        if let Some(keywords) = &entry.keywords {
            for keyword in keywords {
                let keyword = keyword.to_lowercase();
                for token in &tokens {
                    if keyword.contains(token) || token.contains(keyword.as_str()) {
                        score += KEYWORD_PAIR_SCORE;
                    }
                }
            }
        }

        if question.contains(&query) || query.contains(&question) {
            score += PHRASE_BONUS;
        }

        score
    }

    /// Highest-scoring entry above the threshold. The first of equal scores wins.
    pub fn best_match<'a, I>(&self, query: &str, entries: I) -> Option<ScoredMatch<'a>>
    where
        I: IntoIterator<Item = &'a KnowledgeEntry>,
    {
        let mut best: Option<ScoredMatch<'a>> = None;
        for entry in entries {
            let score = self.score(query, entry);
            if score > self.threshold && best.map_or(true, |b| score > b.score) {
                best = Some(ScoredMatch { entry, score });
            }
        }
        best
    }
}

/// Lowercased whitespace tokens longer than two characters.
fn tokenize(query: &str) -> Vec<&str> {
    query
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_account() -> KnowledgeEntry {
        KnowledgeEntry::new("How do I open an account?", "Visit a branch.")
            .with_keywords(["open", "new account", "opening"])
    }

    #[test]
    fn test_tokenize_drops_short_words() {
        assert_eq!(tokenize("how do i open an account"), vec!["how", "open", "account"]);
    }

    #[test]
    fn test_exact_question_gets_phrase_bonus() {
        let m = FaqMatcher::default();
        // Three tokens in the question, "open" pairs with two keywords, plus the phrase.
        assert_eq!(m.score("How do I open an account?", &open_account()), 6 + 6 + 5);
    }

    #[test]
    fn test_score_components() {
        let m = FaqMatcher::default();
        let entry = KnowledgeEntry::new("What are the banking hours?", "10 to 4")
            .with_keywords(["hours", "timing"]);
        // "banking" and "hours" in question (+4), "hours" pairs with keyword "hours" (+3)
        assert_eq!(m.score("banking hours", &entry), 4 + 3 + PHRASE_BONUS);
        // "timing" only hits the keyword
        assert_eq!(m.score("timing", &entry), 3);
    }

    #[test]
    fn test_no_keywords_scores_question_only() {
        let m = FaqMatcher::default();
        let entry = KnowledgeEntry::new("Transfer money abroad", "Use SWIFT");
        assert_eq!(m.score("money abroad today", &entry), 4);
    }

    #[test]
    fn test_empty_keyword_pairs_with_every_token() {
        let m = FaqMatcher::default();
        let entry = KnowledgeEntry::new("Card fees", "Free").with_keywords([""]);
        // Every token contains the empty keyword.
        assert_eq!(m.score("abc xyz", &entry), 6);
    }

    #[test]
    fn test_empty_question_earns_phrase_bonus() {
        let m = FaqMatcher::default();
        let entry = KnowledgeEntry::new("", "a");
        assert_eq!(m.score("abc", &entry), 5);
        assert!(m.best_match("abc", [&entry]).is_some());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let m = FaqMatcher::default();
        let entry = KnowledgeEntry::new("q", "a").with_keywords(["timing"]);
        // Exactly 3 does not pass a threshold of 3.
        assert_eq!(m.score("timing", &entry), 3);
        assert!(m.best_match("timing", [&entry]).is_none());
        assert!(FaqMatcher::new(2).best_match("timing", [&entry]).is_some());
    }

    #[test]
    fn test_first_maximum_wins() {
        let m = FaqMatcher::default();
        let a = KnowledgeEntry::new("first", "A").with_keywords(["rates", "interest"]);
        let b = KnowledgeEntry::new("second", "B").with_keywords(["rates", "interest"]);
        let entries = vec![a, b];
        let hit = m.best_match("interest rates", &entries).unwrap();
        assert_eq!(hit.entry.answer, "A");
    }

    #[test]
    fn test_higher_score_later_wins() {
        let m = FaqMatcher::default();
        let entries = vec![
            KnowledgeEntry::new("first", "A").with_keywords(["rates", "interest"]),
            KnowledgeEntry::new("interest rates", "B").with_keywords(["rates"]),
        ];
        let hit = m.best_match("interest rates", &entries).unwrap();
        assert_eq!(hit.entry.answer, "B");
    }

    #[test]
    fn test_empty_entries_never_match() {
        let m = FaqMatcher::default();
        let entries: Vec<KnowledgeEntry> = Vec::new();
        assert!(m.best_match("anything at all", &entries).is_none());
    }

    #[test]
    fn test_nonsense_does_not_match() {
        let m = FaqMatcher::default();
        let entries = vec![open_account()];
        assert!(m.best_match("xyzzy plugh", &entries).is_none());
    }

    #[test]
    fn test_extra_keywords_never_lower_score() {
        let m = FaqMatcher::default();
        let base = open_account();
        let extended = open_account().with_keywords(["open", "new account", "opening", "kyc", "nid"]);
        for query in ["open account", "kyc documents", "how do i open an account?"] {
            assert!(m.score(query, &extended) >= m.score(query, &base));
        }
    }

    #[test]
    fn test_deterministic() {
        let m = FaqMatcher::default();
        let entries = vec![open_account()];
        let a = m.best_match("open a new account", &entries).map(|s| s.score);
        let b = m.best_match("open a new account", &entries).map(|s| s.score);
        assert_eq!(a, b);
    }
}
