//! Import orchestration: parse → map → persist → tasks, one row at a time.

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use section3_core::{ComplianceTask, ContractRecord, Section3Summary};
use section3_store::{ComplianceStore, StoreError};
use tracing::{debug, info, warn};

use crate::{BatchFailure, ImportResult, ParseError, QuoteMode, generate_tasks, map_row, parse_rows};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub quote_mode: QuoteMode,
    /// Due dates of contracts without a start date count from this day.
    pub import_date: NaiveDate,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            quote_mode: QuoteMode::default(),
            import_date: Local::now().date_naive(),
        }
    }
}

/// Import every contract in `text` into `store`.
///
/// Only an empty file or a store without its tables fails the batch; both
/// leave the store untouched. Every other problem is recorded per row and the
/// remaining rows are still processed, in input order.
pub async fn import_contracts<S>(store: &S, text: &str, options: &ImportOptions) -> ImportResult
where
    S: ComplianceStore + ?Sized,
{
    let parsed = match parse_rows(text, options.quote_mode) {
        Ok(parsed) => parsed,
        Err(ParseError::Empty) => {
            warn!("import refused: empty input");
            return ImportResult::fatal(BatchFailure::EmptyInput, ParseError::Empty.to_string());
        }
    };

    match store.ensure_schema().await {
        Ok(()) => {}
        Err(e @ StoreError::SchemaMissing(_)) => {
            warn!(error = %e, "import refused: schema missing");
            return ImportResult::fatal(BatchFailure::SchemaMissing, e.to_string());
        }
        // Anything else surfaces again on the row that hits it.
        Err(e) => warn!(error = %e, "schema check failed, continuing"),
    }

    let mut result = ImportResult {
        total_rows: parsed.rows.len(),
        ..ImportResult::default()
    };
    info!(rows = result.total_rows, mode = ?options.quote_mode, "importing contracts");

    // Keys known to be persisted, either earlier in this file or before it.
    let mut persisted = HashSet::new();
    for row in &parsed.rows {
        let contract = match map_row(row) {
            Ok(contract) => contract,
            Err(e) => {
                warn!(line = row.line, error = %e, "row rejected");
                result.errors.push(e.to_string());
                continue;
            }
        };

        let key = contract.key();
        if persisted.contains(&key) {
            debug!(line = row.line, contract = %key, "duplicate within file");
            result.contracts_skipped += 1;
            continue;
        }
        match store.contract_exists(&key).await {
            Ok(true) => {
                debug!(line = row.line, contract = %key, "already imported");
                persisted.insert(key);
                result.contracts_skipped += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(line = row.line, error = %e, "duplicate check failed");
                result.errors.push(format!(
                    "Row {}: failed to check contract {}: {e}",
                    row.line, contract.contract_number
                ));
                continue;
            }
        }

        let contract_id = match store.insert_contract(&contract).await {
            Ok(id) => {
                persisted.insert(key);
                id
            }
            Err(StoreError::Duplicate(_)) => {
                persisted.insert(key);
                result.contracts_skipped += 1;
                continue;
            }
            Err(e) => {
                warn!(line = row.line, error = %e, "contract insert failed");
                result.errors.push(format!(
                    "Row {}: failed to insert contract {}: {e}",
                    row.line, contract.contract_number
                ));
                continue;
            }
        };
        result.contracts_inserted += 1;

        let mut tasks = generate_tasks(&contract, options.import_date);
        if !tasks.is_empty() {
            match store.insert_tasks(contract_id, &tasks).await {
                Ok(ids) => {
                    result.tasks_created += ids.len();
                    for (task, id) in tasks.iter_mut().zip(ids) {
                        task.id = Some(id);
                        task.contract_id = Some(contract_id);
                    }
                }
                Err(e) => {
                    warn!(line = row.line, error = %e, "task insert failed");
                    result.errors.push(format!(
                        "Row {}: contract {} imported but task creation failed: {e}",
                        row.line, contract.contract_number
                    ));
                }
            }
        }

        if contract.section3_applicable && result.example_contract.is_none() {
            record_example(&mut result, contract, tasks);
        }
    }

    info!(
        inserted = result.contracts_inserted,
        skipped = result.contracts_skipped,
        tasks = result.tasks_created,
        errors = result.errors.len(),
        "import finished"
    );
    result
}

fn record_example(
    result: &mut ImportResult,
    contract: ContractRecord,
    tasks: Vec<ComplianceTask>,
) {
    result.section3_summary = Some(Section3Summary::new(
        contract.contract_value.clone(),
        contract.section3_applicable,
        contract.applicability_source,
    ));
    result.example_tasks = tasks;
    result.example_contract = Some(contract);
}
