//! AskEBL storage crate - SQLite knowledge store.
//!
//! Provides a WAL-mode SQLite database with migrations and repositories for
//! FAQ entries, popular questions, and user-suggested questions.

pub mod db;
pub mod migrations;
pub mod repository;
pub mod seed;

pub use db::Database;
pub use repository::{
    FaqRepository, PopularQuestion, PopularQuestionRepository, SuggestionRepository,
    SuggestionRow,
};
pub use seed::{seed_demo_data, SeedReport};
