//! Initial compliance tasks for Section 3 applicable contracts.

use chrono::{Days, NaiveDate};
use section3_core::{Benchmarks, ComplianceTask, ContractRecord, TaskStatus};

/// A task every applicable contract starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub description: &'static str,
    /// Days after the contract start date.
    pub offset_days: u64,
}

pub const INITIAL_TASKS: [TaskTemplate; 3] = [
    TaskTemplate {
        title: "Schedule kickoff with contractor",
        description: "Review Section 3 obligations and reporting cadence with the contractor",
        offset_days: 7,
    },
    TaskTemplate {
        title: "Submit Section 3 Action Plan",
        description: "Collect the contractor's plan for hiring and contracting Section 3 workers and businesses",
        offset_days: 30,
    },
    TaskTemplate {
        title: "Collect first quarterly labor-hour report",
        description: "Gather total, Section 3, and Targeted Section 3 labor hours for the first quarter",
        offset_days: 90,
    },
];

/// Tasks for `contract`, due relative to its start date or to `fallback_start`
/// when it has none. Non-applicable contracts get no tasks.
pub fn generate_tasks(contract: &ContractRecord, fallback_start: NaiveDate) -> Vec<ComplianceTask> {
    if !contract.section3_applicable {
        return Vec::new();
    }
    let start = contract.start_date.unwrap_or(fallback_start);
    let benchmarks = Benchmarks::current();

    INITIAL_TASKS
        .iter()
        .map(|template| ComplianceTask {
            id: None,
            contract_id: None,
            client_name: contract.client_name.clone(),
            contract_number: contract.contract_number.clone(),
            title: template.title.to_string(),
            description: format!(
                "{}. Benchmarks: {}% of labor hours by Section 3 workers, {}% by Targeted Section 3 workers.",
                template.description, benchmarks.labor_hour_pct, benchmarks.targeted_worker_pct
            ),
            due_date: start
                .checked_add_days(Days::new(template.offset_days))
                .unwrap_or(NaiveDate::MAX),
            status: TaskStatus::Pending,
            labor_hour_benchmark_pct: benchmarks.labor_hour_pct,
            targeted_worker_benchmark_pct: benchmarks.targeted_worker_pct,
        })
        .collect()
}
