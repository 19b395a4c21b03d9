//! In-process store for tests and dry runs.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use section3_core::schema::tables;
use section3_core::{ComplianceTask, ContractKey, ContractRecord, TaskStatus};

use crate::{ComplianceStore, StoreError, StoredContract};

#[derive(Default)]
struct Inner {
    initialized: bool,
    contracts: Vec<StoredContract>,
    tasks: Vec<ComplianceTask>,
    next_contract_id: i64,
    next_task_id: i64,
}

/// A [`ComplianceStore`] held entirely in memory.
///
/// [`new`](Self::new) starts with the tables in place;
/// [`uninitialized`](Self::uninitialized) starts without them so callers can
/// exercise the setup-required path.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::uninitialized();
        store.init_schema();
        store
    }

    pub fn uninitialized() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_contract_id: 1,
                next_task_id: 1,
                ..Inner::default()
            }),
        }
    }

    pub fn init_schema(&self) {
        self.lock().initialized = true;
    }

    pub fn contract_count(&self) -> usize {
        self.lock().contracts.len()
    }

    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ready(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let inner = self.lock();
        if !inner.initialized {
            return Err(StoreError::SchemaMissing(tables::CONTRACTS.into()));
        }
        Ok(inner)
    }
}

fn matches_key(record: &ContractRecord, key: &ContractKey) -> bool {
    record.client_name == key.client_name && record.contract_number == key.contract_number
}

#[async_trait]
impl ComplianceStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.ready().map(|_| ())
    }

    async fn contract_exists(&self, key: &ContractKey) -> Result<bool, StoreError> {
        let inner = self.ready()?;
        Ok(inner.contracts.iter().any(|c| matches_key(&c.record, key)))
    }

    async fn insert_contract(&self, contract: &ContractRecord) -> Result<i64, StoreError> {
        let mut inner = self.ready()?;
        let key = contract.key();
        if inner.contracts.iter().any(|c| matches_key(&c.record, &key)) {
            return Err(StoreError::Duplicate(key));
        }
        let id = inner.next_contract_id;
        inner.next_contract_id += 1;
        inner.contracts.push(StoredContract {
            id,
            record: contract.clone(),
        });
        Ok(id)
    }

    async fn get_contract(&self, key: &ContractKey) -> Result<Option<StoredContract>, StoreError> {
        let inner = self.ready()?;
        Ok(inner
            .contracts
            .iter()
            .find(|c| matches_key(&c.record, key))
            .cloned())
    }

    async fn list_contracts(&self, client: Option<&str>) -> Result<Vec<StoredContract>, StoreError> {
        let inner = self.ready()?;
        Ok(inner
            .contracts
            .iter()
            .filter(|c| client.is_none_or(|name| c.record.client_name == name))
            .cloned()
            .collect())
    }

    async fn insert_tasks(
        &self,
        contract_id: i64,
        tasks: &[ComplianceTask],
    ) -> Result<Vec<i64>, StoreError> {
        let mut inner = self.ready()?;
        if !inner.contracts.iter().any(|c| c.id == contract_id) {
            return Err(StoreError::UnknownContract(contract_id));
        }
        let mut ids = Vec::with_capacity(tasks.len());
        for task in tasks {
            let id = inner.next_task_id;
            inner.next_task_id += 1;
            inner.tasks.push(ComplianceTask {
                id: Some(id),
                contract_id: Some(contract_id),
                ..task.clone()
            });
            ids.push(id);
        }
        Ok(ids)
    }

    async fn tasks_for_contract(&self, key: &ContractKey) -> Result<Vec<ComplianceTask>, StoreError> {
        let inner = self.ready()?;
        let mut tasks: Vec<ComplianceTask> = inner
            .tasks
            .iter()
            .filter(|t| t.client_name == key.client_name && t.contract_number == key.contract_number)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), StoreError> {
        let mut inner = self.ready()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == Some(task_id))
            .ok_or(StoreError::UnknownTask(task_id))?;
        task.status = status;
        Ok(())
    }
}
