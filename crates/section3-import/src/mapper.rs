//! Row validation and mapping to [`ContractRecord`].

use chrono::NaiveDate;
use section3_core::policy::determine_applicability;
use section3_core::{ContractRecord, CurrencyError, PointOfContact, parse_currency};
use thiserror::Error;

use crate::ParsedRow;

/// Column names of the import file.
pub mod columns {
    pub const CLIENT_NAME: &str = "client_name";
    pub const CONTRACT_NUMBER: &str = "contract_number";
    pub const VENDOR_NAME: &str = "vendor_name";
    pub const CONTRACT_VALUE: &str = "contract_value";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const FUNDING_SOURCE: &str = "funding_source";
    pub const SECTION3_APPLICABLE: &str = "section3_applicable";
    pub const TITLE: &str = "title";
    pub const SCOPE_OF_WORK: &str = "scope_of_work";
    pub const SECTION3_POC: &str = "section3_poc";
    pub const SECTION3_POC_EMAIL: &str = "section3_poc_email";
    pub const SECTION3_POC_PHONE: &str = "section3_poc_phone";
}

pub const REQUIRED_FIELDS: [&str; 5] = [
    columns::CLIENT_NAME,
    columns::CONTRACT_NUMBER,
    columns::VENDOR_NAME,
    columns::CONTRACT_VALUE,
    columns::FUNDING_SOURCE,
];

/// A row that cannot become a contract. Displays as `Row N: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Row {line}: missing required field {}", .fields.join(", "))]
    MissingFields {
        line: usize,
        fields: Vec<&'static str>,
    },

    #[error("Row {line}: invalid contract_value {raw:?} ({source})")]
    InvalidValue {
        line: usize,
        raw: String,
        source: CurrencyError,
    },

    #[error("Row {line}: invalid {field} {raw:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        line: usize,
        field: &'static str,
        raw: String,
    },

    #[error("Row {line}: invalid section3_applicable {raw:?} (expected true or false)")]
    InvalidFlag { line: usize, raw: String },
}

/// Validate one parsed row and build the contract, applicability included.
pub fn map_row(row: &ParsedRow) -> Result<ContractRecord, RowError> {
    let line = row.line;

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| row.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(RowError::MissingFields {
            line,
            fields: missing,
        });
    }
    let required = |field: &str| row.get(field).unwrap_or_default().to_string();

    let raw_value = required(columns::CONTRACT_VALUE);
    let contract_value = parse_currency(&raw_value).map_err(|source| RowError::InvalidValue {
        line,
        raw: raw_value.clone(),
        source,
    })?;

    let start_date = parse_date(row, columns::START_DATE)?;
    let end_date = parse_date(row, columns::END_DATE)?;
    let explicit = parse_flag(row)?;
    let (section3_applicable, applicability_source) =
        determine_applicability(&contract_value, explicit);

    let optional = |field: &str| row.get(field).map(str::to_string);
    Ok(ContractRecord {
        client_name: required(columns::CLIENT_NAME),
        contract_number: required(columns::CONTRACT_NUMBER),
        vendor_name: required(columns::VENDOR_NAME),
        contract_value,
        start_date,
        end_date,
        funding_source: required(columns::FUNDING_SOURCE),
        section3_applicable,
        applicability_source,
        title: optional(columns::TITLE),
        scope_of_work: optional(columns::SCOPE_OF_WORK),
        section3_poc: PointOfContact::from_parts(
            optional(columns::SECTION3_POC),
            optional(columns::SECTION3_POC_EMAIL),
            optional(columns::SECTION3_POC_PHONE),
        ),
    })
}

/// Only the ISO `YYYY-MM-DD` form is accepted.
fn parse_date(row: &ParsedRow, field: &'static str) -> Result<Option<NaiveDate>, RowError> {
    let Some(raw) = row.get(field) else {
        return Ok(None);
    };
    let invalid = || RowError::InvalidDate {
        line: row.line,
        field,
        raw: raw.to_string(),
    };
    if raw.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

fn parse_flag(row: &ParsedRow) -> Result<Option<bool>, RowError> {
    let Some(raw) = row.get(columns::SECTION3_APPLICABLE) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(RowError::InvalidFlag {
            line: row.line,
            raw: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use section3_core::{ApplicabilitySource, BigDecimal};

    fn row(line: usize, pairs: &[(&str, &str)]) -> ParsedRow {
        ParsedRow {
            line,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("client_name", "Metro Housing Authority"),
            ("contract_number", "MHA-2024-001"),
            ("vendor_name", "Acme Builders"),
            ("contract_value", "$250,000"),
            ("start_date", "2024-03-01"),
            ("end_date", "2025-02-28"),
            ("funding_source", "CDBG"),
        ]
    }

    fn with(overrides: &[(&'static str, &'static str)]) -> ParsedRow {
        let mut pairs = base();
        for &(k, v) in overrides {
            match pairs.iter_mut().find(|(key, _)| *key == k) {
                Some(pair) => pair.1 = v,
                None => pairs.push((k, v)),
            }
        }
        row(2, &pairs)
    }

    #[test]
    fn maps_full_row() {
        let record = map_row(&with(&[
            ("title", "Roof replacement"),
            ("section3_poc", "Dana Reyes"),
            ("section3_poc_phone", "555-0100"),
        ]))
        .unwrap();
        assert_eq!(record.client_name, "Metro Housing Authority");
        assert_eq!(record.contract_value, BigDecimal::from(250_000));
        assert_eq!(record.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(record.title.as_deref(), Some("Roof replacement"));
        assert!(record.scope_of_work.is_none());
        let poc = record.section3_poc.unwrap();
        assert_eq!(poc.name.as_deref(), Some("Dana Reyes"));
        assert!(poc.email.is_none());
        assert!(record.section3_applicable);
        assert_eq!(record.applicability_source, ApplicabilitySource::Derived);
    }

    #[test]
    fn missing_vendor_reported_with_row_and_field() {
        let err = map_row(&with(&[("vendor_name", "")])).unwrap_err();
        assert_eq!(err.to_string(), "Row 2: missing required field vendor_name");
    }

    #[test]
    fn all_missing_fields_listed_once() {
        let err = map_row(&row(7, &[("client_name", "X")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Row 7: missing required field contract_number, vendor_name, contract_value, funding_source"
        );
    }

    #[test]
    fn bad_currency_is_row_error() {
        let err = map_row(&with(&[("contract_value", "TBD")])).unwrap_err();
        assert!(matches!(err, RowError::InvalidValue { line: 2, .. }));
        assert!(err.to_string().starts_with("Row 2: invalid contract_value \"TBD\""));
    }

    #[test]
    fn only_iso_dates_accepted() {
        let err = map_row(&with(&[("start_date", "03/01/2024")])).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidDate {
                line: 2,
                field: "start_date",
                raw: "03/01/2024".into()
            }
        );
        assert!(map_row(&with(&[("end_date", "2024-3-1")])).is_err());

        let record = map_row(&with(&[("start_date", ""), ("end_date", "")])).unwrap();
        assert!(record.start_date.is_none());
        assert!(record.end_date.is_none());
    }

    #[test]
    fn explicit_flag_is_case_insensitive() {
        let record = map_row(&with(&[("section3_applicable", "FALSE")])).unwrap();
        assert!(!record.section3_applicable);
        assert_eq!(record.applicability_source, ApplicabilitySource::Explicit);

        let record = map_row(&with(&[
            ("contract_value", "1000"),
            ("section3_applicable", "True"),
        ]))
        .unwrap();
        assert!(record.section3_applicable);
    }

    #[test]
    fn unrecognised_flag_rejected() {
        let err = map_row(&with(&[("section3_applicable", "yes")])).unwrap_err();
        assert!(matches!(err, RowError::InvalidFlag { .. }));
    }

    #[test]
    fn below_threshold_not_applicable() {
        let record = map_row(&with(&[("contract_value", "199,999.99")])).unwrap();
        assert!(!record.section3_applicable);

        let record = map_row(&with(&[("contract_value", "199999.99999999999999")])).unwrap();
        assert!(!record.section3_applicable);
        assert_eq!(
            record.contract_value,
            "199999.99999999999999".parse::<BigDecimal>().unwrap()
        );
    }
}
