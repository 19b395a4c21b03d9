//! Currency parsing for free-form contract values ("$250,000", "250,000.00").
//!
//! Amounts stay in exact decimal form end to end, so a value such as
//! `199999.99999999999999` never rounds across the Section 3 threshold.

use std::str::FromStr;

pub use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("empty amount")]
    Empty,
    #[error("not a number: {0:?}")]
    NotNumeric(String),
    #[error("negative amount: {0:?}")]
    Negative(String),
}

/// Parse a dollar amount, ignoring `$`, `,` and any whitespace.
pub fn parse_currency(raw: &str) -> Result<BigDecimal, CurrencyError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(CurrencyError::Empty);
    }
    let value = BigDecimal::from_str(&cleaned)
        .map_err(|_| CurrencyError::NotNumeric(raw.to_string()))?;
    if value < BigDecimal::from(0) {
        return Err(CurrencyError::Negative(raw.to_string()));
    }
    Ok(value)
}
