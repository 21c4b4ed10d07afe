//! Repository implementations for the SQLite knowledge store.
//!
//! FaqRepository and PopularQuestionRepository feed the conversation engine's
//! knowledge base; SuggestionRepository receives forwarded questions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use askebl_core::error::AskEblError;
use askebl_core::types::{KnowledgeEntry, SessionId, SuggestedQuestion, Timestamp};

use crate::db::Database;

/// Repository for curated FAQ entries.
pub struct FaqRepository {
    db: Arc<Database>,
}

impl FaqRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new FAQ entry, returning its generated ID.
    pub fn insert(&self, entry: &KnowledgeEntry) -> Result<Uuid, AskEblError> {
        let id = Uuid::new_v4();
        let keywords = encode_keywords(entry.keywords.as_deref())?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO faqs (id, question, answer, keywords, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id.to_string(),
                    entry.question,
                    entry.answer,
                    keywords,
                    entry.category,
                    Timestamp::now().0,
                ],
            )
            .map_err(|e| AskEblError::Storage(format!("Failed to save FAQ: {}", e)))?;
            Ok(id)
        })
    }

    /// All FAQ entries, oldest first.
    pub fn list(&self) -> Result<Vec<KnowledgeEntry>, AskEblError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT question, answer, keywords, category
                     FROM faqs
                     ORDER BY created_at ASC, rowid ASC",
                )
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                })
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let mut entries = Vec::new();
            for row in rows {
                let (question, answer, keywords, category) =
                    row.map_err(|e| AskEblError::Storage(e.to_string()))?;
                entries.push(KnowledgeEntry {
                    question,
                    answer,
                    keywords: decode_keywords(keywords)?,
                    category,
                });
            }
            Ok(entries)
        })
    }

    /// Count stored FAQ entries.
    pub fn count(&self) -> Result<u64, AskEblError> {
        count_rows(&self.db, "SELECT COUNT(*) FROM faqs")
    }
}

/// A popular question as stored, with its display position.
#[derive(Debug, Clone, PartialEq)]
pub struct PopularQuestion {
    pub id: Uuid,
    pub entry: KnowledgeEntry,
    pub display_order: i64,
}

/// Repository for the popular-questions list.
pub struct PopularQuestionRepository {
    db: Arc<Database>,
}

impl PopularQuestionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new active popular question at the given display position.
    pub fn insert(&self, entry: &KnowledgeEntry, display_order: i64) -> Result<Uuid, AskEblError> {
        let id = Uuid::new_v4();
        let keywords = encode_keywords(entry.keywords.as_deref())?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO popular_questions
                    (id, question, answer, keywords, category, display_order, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
                rusqlite::params![
                    id.to_string(),
                    entry.question,
                    entry.answer,
                    keywords,
                    entry.category,
                    display_order,
                ],
            )
            .map_err(|e| AskEblError::Storage(format!("Failed to save popular question: {}", e)))?;
            Ok(id)
        })
    }

    /// Activate or deactivate a popular question. Returns `false` if the ID is unknown.
    pub fn set_active(&self, id: Uuid, active: bool) -> Result<bool, AskEblError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE popular_questions SET is_active = ?1 WHERE id = ?2",
                    rusqlite::params![active as i32, id.to_string()],
                )
                .map_err(|e| AskEblError::Storage(e.to_string()))?;
            Ok(changed > 0)
        })
    }

    /// Active popular questions in display order.
    pub fn list_active(&self) -> Result<Vec<PopularQuestion>, AskEblError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, question, answer, keywords, category, display_order
                     FROM popular_questions
                     WHERE is_active = 1
                     ORDER BY display_order ASC, rowid ASC",
                )
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                })
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let mut questions = Vec::new();
            for row in rows {
                let (id, question, answer, keywords, category, display_order) =
                    row.map_err(|e| AskEblError::Storage(e.to_string()))?;
                questions.push(PopularQuestion {
                    id: parse_uuid(&id)?,
                    entry: KnowledgeEntry {
                        question,
                        answer,
                        keywords: decode_keywords(keywords)?,
                        category,
                    },
                    display_order,
                });
            }
            Ok(questions)
        })
    }

    /// Count stored popular questions, active or not.
    pub fn count(&self) -> Result<u64, AskEblError> {
        count_rows(&self.db, "SELECT COUNT(*) FROM popular_questions")
    }
}

/// A suggested question as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRow {
    pub id: Uuid,
    pub question: String,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
}

/// Repository for questions forwarded to the admin team.
pub struct SuggestionRepository {
    db: Arc<Database>,
}

impl SuggestionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist a suggested question exactly as submitted.
    pub fn save(&self, suggestion: &SuggestedQuestion) -> Result<Uuid, AskEblError> {
        let id = Uuid::new_v4();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO suggested_faqs (id, question, suggested_by_session, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    id.to_string(),
                    suggestion.question,
                    suggestion.session_id.as_str(),
                    suggestion.submitted_at.0,
                ],
            )
            .map_err(|e| AskEblError::Storage(format!("Failed to save suggestion: {}", e)))?;
            Ok(id)
        })
    }

    /// Most recent suggestions first.
    pub fn list_recent(&self, limit: u64) -> Result<Vec<SuggestionRow>, AskEblError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, question, suggested_by_session, created_at
                     FROM suggested_faqs
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?1",
                )
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(|e| AskEblError::Storage(e.to_string()))?;

            let mut suggestions = Vec::new();
            for row in rows {
                let (id, question, session_id, created_at) =
                    row.map_err(|e| AskEblError::Storage(e.to_string()))?;
                suggestions.push(SuggestionRow {
                    id: parse_uuid(&id)?,
                    question,
                    session_id: SessionId(session_id),
                    created_at: Timestamp(created_at).to_datetime(),
                });
            }
            Ok(suggestions)
        })
    }

    /// Count stored suggestions.
    pub fn count(&self) -> Result<u64, AskEblError> {
        count_rows(&self.db, "SELECT COUNT(*) FROM suggested_faqs")
    }
}

// -- Helpers --

fn count_rows(db: &Database, sql: &str) -> Result<u64, AskEblError> {
    db.with_conn(|conn| {
        let count: i64 = conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| AskEblError::Storage(e.to_string()))?;
        Ok(count as u64)
    })
}

fn encode_keywords(keywords: Option<&[String]>) -> Result<Option<String>, AskEblError> {
    keywords
        .map(|k| serde_json::to_string(k).map_err(AskEblError::from))
        .transpose()
}

fn decode_keywords(raw: Option<String>) -> Result<Option<Vec<String>>, AskEblError> {
    raw.map(|s| {
        serde_json::from_str::<Vec<String>>(&s)
            .map_err(|e| AskEblError::Storage(format!("Invalid keywords column: {}", e)))
    })
    .transpose()
}

fn parse_uuid(raw: &str) -> Result<Uuid, AskEblError> {
    Uuid::parse_str(raw).map_err(|e| AskEblError::Storage(format!("Invalid UUID: {}", e)))
}
