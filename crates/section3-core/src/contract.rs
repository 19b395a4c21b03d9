//! Contract records as imported from a client's contract register.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Natural key of a contract: a contract number is unique within one client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractKey {
    pub client_name: String,
    pub contract_number: String,
}

impl ContractKey {
    pub fn new(client_name: impl Into<String>, contract_number: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            contract_number: contract_number.into(),
        }
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_name, self.contract_number)
    }
}

/// Whether `section3_applicable` came from the input row or from the threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicabilitySource {
    Explicit,
    Derived,
}

impl ApplicabilitySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Derived => "derived",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "explicit" => Some(Self::Explicit),
            "derived" => Some(Self::Derived),
            _ => None,
        }
    }
}

/// Section 3 coordinator on the contractor side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PointOfContact {
    /// Build a contact from optional parts; `None` when every part is absent.
    pub fn from_parts(
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Option<Self> {
        if name.is_none() && email.is_none() && phone.is_none() {
            return None;
        }
        Some(Self { name, email, phone })
    }
}

/// A single contract row, validated and ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub client_name: String,
    pub contract_number: String,
    pub vendor_name: String,
    /// Contract value in US dollars, exact as written in the input.
    pub contract_value: BigDecimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Funding program (CDBG, HOME, ...). Free text.
    pub funding_source: String,
    pub section3_applicable: bool,
    pub applicability_source: ApplicabilitySource,
    pub title: Option<String>,
    pub scope_of_work: Option<String>,
    pub section3_poc: Option<PointOfContact>,
}

impl ContractRecord {
    pub fn key(&self) -> ContractKey {
        ContractKey::new(&self.client_name, &self.contract_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poc_requires_at_least_one_part() {
        assert!(PointOfContact::from_parts(None, None, None).is_none());
        let poc = PointOfContact::from_parts(None, Some("s3@acme.test".into()), None).unwrap();
        assert_eq!(poc.email.as_deref(), Some("s3@acme.test"));
        assert!(poc.name.is_none());
    }

    #[test]
    fn key_display() {
        let key = ContractKey::new("Metro Housing Authority", "MHA-2024-001");
        assert_eq!(key.to_string(), "Metro Housing Authority/MHA-2024-001");
    }

    #[test]
    fn applicability_source_serializes_snake_case() {
        let json = serde_json::to_string(&ApplicabilitySource::Derived).unwrap();
        assert_eq!(json, "\"derived\"");
    }
}
