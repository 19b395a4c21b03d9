//! HUD reporting port and its simulated implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use section3_core::ContractRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// HUD system receiving the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HudSystem {
    /// Section 3 Performance Evaluation and Registry System.
    Spears,
    /// Integrated Disbursement and Information System.
    Idis,
}

impl HudSystem {
    fn code(self) -> &'static str {
        match self {
            Self::Spears => "SPEARS",
            Self::Idis => "IDIS",
        }
    }
}

impl fmt::Display for HudSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HudSystem {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spears" => Ok(Self::Spears),
            "idis" => Ok(Self::Idis),
            _ => Err(SyncError::UnknownSystem(s.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("unknown HUD system: {0:?}")]
    UnknownSystem(String),
    #[error("{system} unavailable: {reason}")]
    Unavailable { system: HudSystem, reason: String },
    #[error("no Section 3 applicable contracts to submit")]
    NothingToSubmit,
}

/// Acknowledgement returned by a HUD system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub system: HudSystem,
    pub confirmation_id: String,
    pub accepted: usize,
    /// Contracts left out because Section 3 does not apply to them.
    pub ignored: usize,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait HudReporting: Send + Sync {
    /// Submit the Section 3 applicable subset of `contracts`.
    async fn submit(
        &self,
        system: HudSystem,
        contracts: &[ContractRecord],
    ) -> Result<SubmissionReceipt, SyncError>;
}

#[derive(Default)]
struct Ledger {
    sequence: u64,
    receipts: Vec<SubmissionReceipt>,
}

/// Offline stand-in for the HUD systems.
///
/// Confirmation ids come from a per-instance counter (`SPEARS-000001`, ...),
/// so runs are reproducible. Every receipt is kept for inspection.
#[derive(Default)]
pub struct SimulatedHud {
    outage: Option<String>,
    ledger: Mutex<Ledger>,
}

impl SimulatedHud {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that fails every submission with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outage: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn receipts(&self) -> Vec<SubmissionReceipt> {
        self.ledger
            .lock()
            .map(|ledger| ledger.receipts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HudReporting for SimulatedHud {
    async fn submit(
        &self,
        system: HudSystem,
        contracts: &[ContractRecord],
    ) -> Result<SubmissionReceipt, SyncError> {
        if let Some(reason) = &self.outage {
            return Err(SyncError::Unavailable {
                system,
                reason: reason.clone(),
            });
        }
        let accepted = contracts.iter().filter(|c| c.section3_applicable).count();
        if accepted == 0 {
            return Err(SyncError::NothingToSubmit);
        }

        let mut ledger = self
            .ledger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        ledger.sequence += 1;
        let receipt = SubmissionReceipt {
            system,
            confirmation_id: format!("{}-{:06}", system.code(), ledger.sequence),
            accepted,
            ignored: contracts.len() - accepted,
            submitted_at: Utc::now(),
        };
        ledger.receipts.push(receipt.clone());
        info!(
            system = %system,
            confirmation = %receipt.confirmation_id,
            accepted,
            "simulated HUD submission"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use section3_core::{ApplicabilitySource, BigDecimal};

    fn contract(number: &str, applicable: bool) -> ContractRecord {
        ContractRecord {
            client_name: "Metro Housing Authority".into(),
            contract_number: number.into(),
            vendor_name: "Acme Builders".into(),
            contract_value: BigDecimal::from(if applicable { 500_000 } else { 20_000 }),
            start_date: None,
            end_date: None,
            funding_source: "CDBG".into(),
            section3_applicable: applicable,
            applicability_source: ApplicabilitySource::Derived,
            title: None,
            scope_of_work: None,
            section3_poc: None,
        }
    }

    #[test]
    fn system_names_parse() {
        assert_eq!("SPEARS".parse::<HudSystem>().unwrap(), HudSystem::Spears);
        assert_eq!(" idis ".parse::<HudSystem>().unwrap(), HudSystem::Idis);
        assert!(matches!(
            "drgr".parse::<HudSystem>(),
            Err(SyncError::UnknownSystem(_))
        ));
    }

    #[tokio::test]
    async fn submits_only_applicable_contracts() {
        let hud = SimulatedHud::new();
        let contracts = [contract("A", true), contract("B", false), contract("C", true)];
        let receipt = hud.submit(HudSystem::Spears, &contracts).await.unwrap();
        assert_eq!(receipt.accepted, 2);
        assert_eq!(receipt.ignored, 1);
        assert_eq!(receipt.confirmation_id, "SPEARS-000001");

        let second = hud.submit(HudSystem::Idis, &contracts[..1]).await.unwrap();
        assert_eq!(second.confirmation_id, "IDIS-000002");
        assert_eq!(hud.receipts().len(), 2);
    }

    #[tokio::test]
    async fn nothing_applicable_is_an_error() {
        let hud = SimulatedHud::new();
        let err = hud
            .submit(HudSystem::Spears, &[contract("B", false)])
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NothingToSubmit));
        assert!(hud.receipts().is_empty());
    }

    #[tokio::test]
    async fn outage_reported() {
        let hud = SimulatedHud::unavailable("maintenance window");
        let err = hud
            .submit(HudSystem::Idis, &[contract("A", true)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "IDIS unavailable: maintenance window");
    }

    #[test]
    fn receipt_json_roundtrip() {
        let receipt = SubmissionReceipt {
            system: HudSystem::Spears,
            confirmation_id: "SPEARS-000042".into(),
            accepted: 3,
            ignored: 0,
            submitted_at: "2026-02-21T10:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"system\":\"spears\""));
        let parsed: SubmissionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, receipt);
    }
}
