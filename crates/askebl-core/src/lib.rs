pub mod config;
pub mod error;
pub mod types;

pub use config::AskEblConfig;
pub use error::{AskEblError, Result};
pub use types::*;
