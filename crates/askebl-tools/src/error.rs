//! Error types for the calculators.

/// Errors from the banking calculators.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("unknown loan product: {0}")]
    UnknownLoanProduct(String),
}
