//! Error types for the conversation engine.

use askebl_core::error::AskEblError;

/// Errors from the chat engine.
///
/// An unresolved catalog selection and an empty knowledge base are not
/// errors: the first re-prompts, the second falls through to the suggestion
/// flow.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("no popular question at position {0}")]
    UnknownPopularQuestion(usize),
    #[error("suggestion could not be saved: {0}")]
    Persistence(String),
    #[error("knowledge base error: {0}")]
    Knowledge(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<AskEblError> for ChatError {
    fn from(err: AskEblError) -> Self {
        match err {
            AskEblError::Knowledge(msg) => ChatError::Knowledge(msg),
            AskEblError::Config(msg) => ChatError::Config(msg),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::Disabled.to_string(), "chat is disabled");
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ChatError::UnknownPopularQuestion(12).to_string(),
            "no popular question at position 12"
        );
        assert_eq!(
            ChatError::Persistence("disk full".to_string()).to_string(),
            "suggestion could not be saved: disk full"
        );
        assert_eq!(
            ChatError::Knowledge("empty catalog".to_string()).to_string(),
            "knowledge base error: empty catalog"
        );
    }

    #[test]
    fn test_from_storage_error() {
        let err: ChatError = AskEblError::Storage("connection lost".to_string()).into();
        assert!(matches!(err, ChatError::Storage(_)));
        assert!(err.to_string().contains("connection lost"));
    }

    #[test]
    fn test_from_knowledge_and_config_errors() {
        let err: ChatError = AskEblError::Knowledge("no cards".to_string()).into();
        assert!(matches!(err, ChatError::Knowledge(ref m) if m == "no cards"));

        let err: ChatError = AskEblError::Config("bad toml".to_string()).into();
        assert!(matches!(err, ChatError::Config(ref m) if m == "bad toml"));
        assert_eq!(err.to_string(), "configuration error: bad toml");
    }
}
