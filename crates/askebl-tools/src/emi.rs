//! Equated monthly installment (EMI) calculator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ToolError;

// =============================================================================
// Loan products
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProduct {
    Personal,
    Home,
    Car,
    Education,
}

impl LoanProduct {
    pub const ALL: [LoanProduct; 4] = [
        LoanProduct::Personal,
        LoanProduct::Home,
        LoanProduct::Car,
        LoanProduct::Education,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LoanProduct::Personal => "Personal Loan",
            LoanProduct::Home => "Home Loan",
            LoanProduct::Car => "Car Loan",
            LoanProduct::Education => "Education Loan",
        }
    }

    /// Advertised annual rate range, in percent.
    pub fn rate_range(self) -> (f64, f64) {
        match self {
            LoanProduct::Personal => (12.0, 16.0),
            LoanProduct::Home => (7.5, 10.0),
            LoanProduct::Car => (10.0, 14.0),
            LoanProduct::Education => (8.0, 12.0),
        }
    }

    /// Rate pre-filled when the product is chosen, in percent.
    pub fn default_rate(self) -> f64 {
        match self {
            LoanProduct::Personal => 14.0,
            LoanProduct::Home => 8.5,
            LoanProduct::Car => 12.0,
            LoanProduct::Education => 10.0,
        }
    }
}

impl fmt::Display for LoanProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.rate_range();
        write!(f, "{} ({}-{}%)", self.label(), low, high)
    }
}

impl FromStr for LoanProduct {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" | "personal loan" => Ok(LoanProduct::Personal),
            "home" | "home loan" => Ok(LoanProduct::Home),
            "car" | "car loan" => Ok(LoanProduct::Car),
            "education" | "education loan" => Ok(LoanProduct::Education),
            _ => Err(ToolError::UnknownLoanProduct(s.to_string())),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Result of an EMI calculation. Amounts are rounded to whole taka.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmiBreakdown {
    pub monthly_installment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
    pub months: u32,
}

/// Longest tenure any loan product is offered for.
pub const MAX_TENURE_YEARS: u32 = 30;

#[derive(Clone, Copy, Debug, Default)]
pub struct EmiCalculator;

impl EmiCalculator {
    /// Reducing-balance EMI: `P·r·(1+r)^n / ((1+r)^n − 1)` with monthly rate
    /// `r` and `n` monthly installments.
    pub fn calculate(
        principal: f64,
        annual_rate_percent: f64,
        tenure_years: u32,
    ) -> Result<EmiBreakdown, ToolError> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(ToolError::InvalidInput(
                "principal must be a positive amount".to_string(),
            ));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent <= 0.0 {
            return Err(ToolError::InvalidInput(
                "interest rate must be a positive percentage".to_string(),
            ));
        }
        if tenure_years == 0 {
            return Err(ToolError::InvalidInput(
                "tenure must be at least one year".to_string(),
            ));
        }
        if tenure_years > MAX_TENURE_YEARS {
            return Err(ToolError::InvalidInput(format!(
                "tenure cannot exceed {MAX_TENURE_YEARS} years"
            )));
        }

        let r = annual_rate_percent / 100.0 / 12.0;
        let months = tenure_years * 12;
        let exponent = i32::try_from(months)
            .map_err(|_| ToolError::InvalidInput("tenure is too long".to_string()))?;
        let growth = (1.0 + r).powi(exponent);
        let emi = principal * r * growth / (growth - 1.0);
        let total = emi * f64::from(months);

        debug!(principal, annual_rate_percent, tenure_years, emi, "EMI calculated");

        Ok(EmiBreakdown {
            monthly_installment: emi.round(),
            total_payable: total.round(),
            total_interest: (total - principal).round(),
            months,
        })
    }

    /// EMI at the product's default rate.
    pub fn for_product(
        product: LoanProduct,
        principal: f64,
        tenure_years: u32,
    ) -> Result<EmiBreakdown, ToolError> {
        Self::calculate(principal, product.default_rate(), tenure_years)
    }
}
