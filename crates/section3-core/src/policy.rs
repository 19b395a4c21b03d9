//! Section 3 policy figures and the applicability rule.
//!
//! HUD's Section 3 final rule (24 CFR Part 75) applies to housing and
//! community development projects receiving more than the statutory
//! threshold of HUD assistance. Recipients meet the safe harbor when
//! Section 3 workers perform the labor-hour benchmark share of total hours
//! and Targeted Section 3 workers perform the targeted-worker share.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::ApplicabilitySource;

/// Contract value (whole USD) at or above which Section 3 applies.
pub const SECTION3_THRESHOLD_USD: u32 = 200_000;

/// [`SECTION3_THRESHOLD_USD`] as a decimal, for comparing contract values.
pub fn section3_threshold() -> BigDecimal {
    BigDecimal::from(SECTION3_THRESHOLD_USD)
}

/// Minimum share of total labor hours worked by Section 3 workers.
pub const LABOR_HOUR_BENCHMARK_PCT: f64 = 25.0;

/// Minimum share of total labor hours worked by Targeted Section 3 workers.
pub const TARGETED_WORKER_BENCHMARK_PCT: f64 = 5.0;

/// Benchmark percentages attached to tasks of an applicable contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub labor_hour_pct: f64,
    pub targeted_worker_pct: f64,
}

impl Benchmarks {
    /// The benchmarks currently in force.
    pub const fn current() -> Self {
        Self {
            labor_hour_pct: LABOR_HOUR_BENCHMARK_PCT,
            targeted_worker_pct: TARGETED_WORKER_BENCHMARK_PCT,
        }
    }
}

/// Threshold rule: applicable when the value meets [`SECTION3_THRESHOLD_USD`].
pub fn meets_threshold(contract_value: &BigDecimal) -> bool {
    *contract_value >= section3_threshold()
}

/// Decide applicability. An explicit flag from the input always wins.
pub fn determine_applicability(
    contract_value: &BigDecimal,
    explicit: Option<bool>,
) -> (bool, ApplicabilitySource) {
    match explicit {
        Some(flag) => (flag, ApplicabilitySource::Explicit),
        None => {
            let applicable = meets_threshold(contract_value);
            debug!(%contract_value, applicable, "derived section 3 applicability");
            (applicable, ApplicabilitySource::Derived)
        }
    }
}

/// Diagnostic view of how a contract was classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section3Summary {
    pub contract_value: BigDecimal,
    pub threshold: BigDecimal,
    pub applicable: bool,
    pub source: ApplicabilitySource,
    pub benchmarks: Option<Benchmarks>,
}

impl Section3Summary {
    pub fn new(contract_value: BigDecimal, applicable: bool, source: ApplicabilitySource) -> Self {
        Self {
            contract_value,
            threshold: section3_threshold(),
            applicable,
            source,
            benchmarks: applicable.then(Benchmarks::current),
        }
    }
}
