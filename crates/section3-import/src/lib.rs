//! Contract import pipeline.
//!
//! Raw CSV text is parsed into rows, each row is validated and mapped to a
//! [`ContractRecord`](section3_core::ContractRecord), Section 3 applicability
//! is decided, the contract is persisted, and applicable contracts receive
//! their initial compliance tasks. Row problems are collected into the
//! [`ImportResult`] instead of aborting the batch.

mod export;
mod mapper;
mod parser;
mod pipeline;
mod result;
mod tasks;

pub use mapper::{REQUIRED_FIELDS, RowError, columns, map_row};
pub use parser::{ParseError, ParsedCsv, ParsedRow, QuoteMode, parse_rows};
pub use pipeline::{ImportOptions, import_contracts};
pub use result::{BatchFailure, ImportResult};
pub use tasks::{INITIAL_TASKS, TaskTemplate, generate_tasks};
