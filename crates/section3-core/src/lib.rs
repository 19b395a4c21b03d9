pub mod contract;
pub mod money;
pub mod policy;
pub mod schema;
pub mod task;

pub use contract::{ApplicabilitySource, ContractKey, ContractRecord, PointOfContact};
pub use money::{BigDecimal, CurrencyError, parse_currency};
pub use policy::{Benchmarks, Section3Summary, section3_threshold};
pub use schema::tables;
pub use task::{ComplianceTask, TaskStatus, UnknownStatus};
