//! Terminal rendering for import results, contract tables, and tasks.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use section3_core::{ComplianceTask, ContractKey};
use section3_import::ImportResult;
use section3_sync::SubmissionReceipt;

const MAX_ERRORS: usize = 10;

pub fn print_import_summary(result: &ImportResult) {
    println!("Import {}", result.status());
    println!("  Rows processed:      {}", result.total_rows);
    println!("  Contracts inserted:  {}", result.contracts_inserted);
    println!("  Contracts skipped:   {}", result.contracts_skipped);
    println!("  Tasks created:       {}", result.tasks_created);
    println!("  Errors:              {}", result.errors.len());

    for error in result.errors.iter().take(MAX_ERRORS) {
        println!("    - {error}");
    }
    if result.errors.len() > MAX_ERRORS {
        println!("    ... and {} more", result.errors.len() - MAX_ERRORS);
    }

    if let (Some(contract), Some(summary)) = (&result.example_contract, &result.section3_summary) {
        println!();
        println!(
            "Example Section 3 contract: {} ({}), ${} vs ${} threshold [{}]",
            contract.contract_number,
            contract.vendor_name,
            summary.contract_value.with_scale(2),
            summary.threshold.with_scale(2),
            summary.source.as_str(),
        );
        if let Some(b) = summary.benchmarks {
            println!(
                "  Benchmarks: {}% labor hours, {}% targeted workers",
                b.labor_hour_pct, b.targeted_worker_pct
            );
        }
        for task in &result.example_tasks {
            println!("  {}  {}", task.due_date, task.title);
        }
    }
}

pub fn print_setup_instructions(db: Option<&Path>) {
    let target = db
        .map(|p| format!("--db {}", p.display()))
        .unwrap_or_else(|| "--db <file>".to_string());
    eprintln!();
    eprintln!("The database has no contracts/compliance_tasks tables yet.");
    eprintln!("Create them, then re-run the import:");
    eprintln!("  section3 {target} init");
}

pub fn print_batches(batches: &[RecordBatch]) -> anyhow::Result<()> {
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    if rows == 0 {
        println!("No contracts.");
        return Ok(());
    }
    println!("{}", pretty_format_batches(batches)?);
    println!("{rows} contract(s)");
    Ok(())
}

pub fn print_tasks(key: &ContractKey, tasks: &[ComplianceTask]) {
    if tasks.is_empty() {
        println!("No compliance tasks for {key}.");
        return;
    }
    println!("Compliance tasks for {key}:");
    for task in tasks {
        println!(
            "  #{:<5} {}  {:<12} {}",
            task.id.unwrap_or_default(),
            task.due_date,
            task.status.as_str(),
            task.title
        );
    }
}

pub fn print_receipt(receipt: &SubmissionReceipt) {
    println!(
        "{} accepted {} contract(s), ignored {} (confirmation {}, {})",
        receipt.system,
        receipt.accepted,
        receipt.ignored,
        receipt.confirmation_id,
        receipt.submitted_at.to_rfc3339(),
    );
}
