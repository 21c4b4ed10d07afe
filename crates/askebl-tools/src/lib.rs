//! Banking calculators offered next to the assistant: loan EMI and
//! foreign currency to BDT conversion.

pub mod currency;
pub mod emi;
pub mod error;

pub use currency::{Conversion, Currency, CurrencyConverter};
pub use emi::{EmiBreakdown, EmiCalculator, LoanProduct, MAX_TENURE_YEARS};
pub use error::ToolError;
