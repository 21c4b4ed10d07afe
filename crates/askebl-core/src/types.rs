use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Opaque per-session token, generated once when a chat session starts.
///
/// Only used to tag suggested questions. Format: `session_<millis>_<9 chars>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = base36(Uuid::new_v4().as_u128()).chars().take(9).collect();
        Self(format!("session_{}_{}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

// =============================================================================
// Newtype Wrappers - Temporal
// =============================================================================

/// Unix timestamp in seconds since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Knowledge
// =============================================================================

/// A curated question/answer pair the assistant can match against.
///
/// FAQ rows and popular-question rows share this shape and are treated
/// uniformly by the matcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords: None,
            category: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A named offering (card type, account type, loan type, location listing)
/// with one canonical description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub description: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An unanswered question the user agreed to forward for FAQ curation.
///
/// `question` is always the user's original text, unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedQuestion {
    pub question: String,
    pub session_id: SessionId,
    pub submitted_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = SessionId::new();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(!parts[2].is_empty() && parts[2].len() <= 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_serializes_as_string() {
        let id = SessionId("session_1_abc".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"session_1_abc\"");
    }

    #[test]
    fn test_base36_digits() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let ts = Timestamp(1_700_000_000);
        assert_eq!(ts.to_datetime().to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_knowledge_entry_builder() {
        let entry = KnowledgeEntry::new("How do I open an account?", "Visit any branch.")
            .with_keywords(["open", "account"])
            .with_category("accounts");
        assert_eq!(entry.keywords.as_deref().map(|k| k.len()), Some(2));
        assert_eq!(entry.category.as_deref(), Some("accounts"));
    }

    #[test]
    fn test_knowledge_entry_optional_fields_default() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"question":"q","answer":"a"}"#).unwrap();
        assert!(entry.keywords.is_none());
        assert!(entry.category.is_none());
    }
}
