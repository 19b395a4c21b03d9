use section3_core::{ComplianceTask, ContractRecord, Section3Summary};
use serde::Serialize;

/// Why a whole import was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailure {
    EmptyInput,
    /// The store's tables do not exist yet; the caller should offer setup.
    SchemaMissing,
}

/// Outcome of one import run.
///
/// `errors` follows input row order. The `example_*` fields and
/// `section3_summary` describe the first Section 3 applicable contract that
/// was inserted, for previews.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResult {
    pub total_rows: usize,
    pub contracts_inserted: usize,
    pub contracts_skipped: usize,
    pub tasks_created: usize,
    pub errors: Vec<String>,
    pub example_contract: Option<ContractRecord>,
    pub example_tasks: Vec<ComplianceTask>,
    pub section3_summary: Option<Section3Summary>,
    pub failure: Option<BatchFailure>,
}

impl ImportResult {
    pub(crate) fn fatal(failure: BatchFailure, message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// True when the run completed without any row error.
    pub fn is_clean(&self) -> bool {
        self.failure.is_none() && self.errors.is_empty()
    }

    pub fn needs_setup(&self) -> bool {
        self.failure == Some(BatchFailure::SchemaMissing)
    }

    /// Short status label used in summaries.
    pub fn status(&self) -> &'static str {
        match self.failure {
            Some(BatchFailure::EmptyInput) => "empty_input",
            Some(BatchFailure::SchemaMissing) => "schema_missing",
            None if self.errors.is_empty() => "ok",
            None => "completed_with_errors",
        }
    }
}
