//! Foreign currency to BDT conversion at indicative rates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ToolError;

/// A supported currency and its BDT rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    /// BDT per one unit of this currency.
    pub rate: f64,
}

impl Currency {
    fn new(code: &str, name: &str, rate: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            rate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub amount: f64,
    pub code: String,
    pub rate: f64,
    /// Rounded to two decimals.
    pub bdt: f64,
}

/// Converts amounts into taka using a fixed rate table.
#[derive(Clone, Debug)]
pub struct CurrencyConverter {
    currencies: Vec<Currency>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::indicative()
    }
}

impl CurrencyConverter {
    /// Indicative rates published by the bank's counter.
    pub fn indicative() -> Self {
        Self::with_rates(vec![
            Currency::new("USD", "US Dollar", 110.0),
            Currency::new("EUR", "Euro", 120.5),
            Currency::new("GBP", "British Pound", 140.2),
            Currency::new("JPY", "Japanese Yen", 0.75),
            Currency::new("AUD", "Australian Dollar", 72.8),
            Currency::new("CAD", "Canadian Dollar", 81.5),
            Currency::new("CHF", "Swiss Franc", 122.3),
            Currency::new("CNY", "Chinese Yuan", 15.2),
            Currency::new("INR", "Indian Rupee", 1.32),
            Currency::new("SGD", "Singapore Dollar", 81.7),
            Currency::new("MYR", "Malaysian Ringgit", 24.8),
            Currency::new("THB", "Thai Baht", 3.1),
            Currency::new("SAR", "Saudi Riyal", 29.3),
            Currency::new("AED", "UAE Dirham", 30.0),
            Currency::new("PKR", "Pakistani Rupee", 0.39),
        ])
    }

    pub fn with_rates(currencies: Vec<Currency>) -> Self {
        Self { currencies }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Look up a currency by its code, ignoring case.
    pub fn currency(&self, code: &str) -> Option<&Currency> {
        let code = code.trim();
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn convert(&self, amount: f64, code: &str) -> Result<Conversion, ToolError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ToolError::InvalidInput(
                "amount must be a positive number".to_string(),
            ));
        }
        let currency = self
            .currency(code)
            .ok_or_else(|| ToolError::UnknownCurrency(code.to_string()))?;

        let bdt = (amount * currency.rate * 100.0).round() / 100.0;
        debug!(amount, code = %currency.code, bdt, "Currency converted");

        Ok(Conversion {
            amount,
            code: currency.code.clone(),
            rate: currency.rate,
            bdt,
        })
    }
}
