//! The persistence port every backend implements.

use async_trait::async_trait;
use section3_core::{ComplianceTask, ContractKey, ContractRecord, TaskStatus};

use crate::StoreError;

/// A contract as persisted, with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredContract {
    pub id: i64,
    pub record: ContractRecord,
}

/// Create/query/update access to the `contracts` and `compliance_tasks` tables.
///
/// Calls are awaited one at a time by the importer, so implementations need
/// not order concurrent writers.
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    /// Fail with [`StoreError::SchemaMissing`] when the tables do not exist.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    async fn contract_exists(&self, key: &ContractKey) -> Result<bool, StoreError>;

    /// Insert a contract and return its id. Never overwrites: an existing key
    /// yields [`StoreError::Duplicate`].
    async fn insert_contract(&self, contract: &ContractRecord) -> Result<i64, StoreError>;

    async fn get_contract(&self, key: &ContractKey) -> Result<Option<StoredContract>, StoreError>;

    /// All contracts, optionally restricted to one client, in insertion order.
    async fn list_contracts(&self, client: Option<&str>) -> Result<Vec<StoredContract>, StoreError>;

    /// Insert tasks for an existing contract and return their ids in order.
    async fn insert_tasks(
        &self,
        contract_id: i64,
        tasks: &[ComplianceTask],
    ) -> Result<Vec<i64>, StoreError>;

    /// Tasks of one contract ordered by due date.
    async fn tasks_for_contract(&self, key: &ContractKey) -> Result<Vec<ComplianceTask>, StoreError>;

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), StoreError>;
}
