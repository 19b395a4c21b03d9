//! DuckDB storage layer for contracts and their compliance tasks.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::NaiveDate;
use duckdb::{Connection, params};
use section3_core::schema::tables;
use section3_core::{
    ApplicabilitySource, BigDecimal, ComplianceTask, ContractKey, ContractRecord, PointOfContact,
    TaskStatus,
};
use tracing::{debug, info};

use crate::{ComplianceStore, StoreError, StoredContract};

const CREATE_SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS contracts_id_seq START 1;
CREATE SEQUENCE IF NOT EXISTS compliance_tasks_id_seq START 1;
CREATE TABLE IF NOT EXISTS contracts (
    id BIGINT PRIMARY KEY DEFAULT nextval('contracts_id_seq'),
    client_name VARCHAR NOT NULL,
    contract_number VARCHAR NOT NULL,
    vendor_name VARCHAR NOT NULL,
    contract_value DECIMAL(38, 20) NOT NULL,
    start_date DATE,
    end_date DATE,
    funding_source VARCHAR NOT NULL,
    section3_applicable BOOLEAN NOT NULL,
    applicability_source VARCHAR NOT NULL,
    title VARCHAR,
    scope_of_work VARCHAR,
    section3_poc VARCHAR,
    section3_poc_email VARCHAR,
    section3_poc_phone VARCHAR,
    created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
    UNIQUE (client_name, contract_number)
);
CREATE TABLE IF NOT EXISTS compliance_tasks (
    id BIGINT PRIMARY KEY DEFAULT nextval('compliance_tasks_id_seq'),
    contract_id BIGINT NOT NULL,
    client_name VARCHAR NOT NULL,
    contract_number VARCHAR NOT NULL,
    title VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    due_date DATE NOT NULL,
    status VARCHAR NOT NULL,
    labor_hour_benchmark_pct DOUBLE NOT NULL,
    targeted_worker_benchmark_pct DOUBLE NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT current_timestamp
);
";

const SELECT_CONTRACTS: &str = "SELECT id, client_name, contract_number, vendor_name,
    CAST(contract_value AS VARCHAR),
    CAST(start_date AS VARCHAR), CAST(end_date AS VARCHAR), funding_source,
    section3_applicable, applicability_source, title, scope_of_work,
    section3_poc, section3_poc_email, section3_poc_phone
    FROM contracts";

/// DuckDB-backed [`ComplianceStore`].
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Opening never creates tables: a fresh database reports
/// [`StoreError::SchemaMissing`] until [`init_schema`](Self::init_schema) runs.
pub struct DuckStore {
    conn: Mutex<Connection>,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create the `contracts` and `compliance_tasks` tables. Idempotent.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.lock().execute_batch(CREATE_SCHEMA)?;
        info!("initialized contracts and compliance_tasks tables");
        Ok(())
    }

    /// Check whether both tables exist.
    pub fn has_tables(&self) -> bool {
        tables_present(&self.missing_table())
    }

    fn missing_table(&self) -> Result<Option<&'static str>, StoreError> {
        let conn = self.lock();
        for table in [tables::CONTRACTS, tables::COMPLIANCE_TASKS] {
            let count: i64 = conn.query_row(
                "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
                [table],
                |row| row.get(0),
            )?;
            if count == 0 {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }

    /// Compare the live column set with the Arrow schemas in `section3_core`.
    pub fn verify_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock();
        for (table, expected) in [
            (tables::CONTRACTS, tables::contracts_schema()),
            (tables::COMPLIANCE_TASKS, tables::compliance_tasks_schema()),
        ] {
            let actual = {
                let sql = format!("SELECT * FROM {table} LIMIT 0");
                let mut stmt = conn.prepare(&sql)?;
                let arrow = stmt.query_arrow([])?;
                arrow.get_schema()
            };
            for field in expected.fields() {
                if actual.field_with_name(field.name()).is_err() {
                    return Err(StoreError::SchemaMismatch {
                        table: table.to_string(),
                        column: field.name().clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // ── Counts ──

    /// Number of rows in the `contracts` table.
    pub fn contract_count(&self) -> Result<usize, StoreError> {
        self.count_table(tables::CONTRACTS)
    }

    /// Number of rows in the `compliance_tasks` table.
    pub fn task_count(&self) -> Result<usize, StoreError> {
        self.count_table(tables::COMPLIANCE_TASKS)
    }

    fn count_table(&self, table: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {table}");
        let batches = self.query_arrow(&sql)?;
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Tabular views ──

    /// Contract summary columns as Arrow batches, for display.
    pub fn contracts_batches(&self, client: Option<&str>) -> Result<Vec<RecordBatch>, StoreError> {
        let base = "SELECT id, client_name, contract_number, vendor_name,
            CAST(contract_value AS DECIMAL(38, 2)) AS contract_value, start_date, end_date, funding_source, section3_applicable
            FROM contracts";
        let conn = self.lock();
        let batches: Vec<RecordBatch> = match client {
            Some(name) => {
                let sql = format!("{base} WHERE client_name = ? ORDER BY id");
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_arrow([name])?.collect()
            }
            None => {
                let sql = format!("{base} ORDER BY id");
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_arrow([])?.collect()
            }
        };
        Ok(batches)
    }

    // ── Escape hatch ──

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    fn select_contracts(
        conn: &Connection,
        where_clause: &str,
        args: &[&dyn duckdb::ToSql],
    ) -> Result<Vec<StoredContract>, StoreError> {
        let sql = format!("{SELECT_CONTRACTS} {where_clause} ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(ContractRow {
                id: row.get(0)?,
                client_name: row.get(1)?,
                contract_number: row.get(2)?,
                vendor_name: row.get(3)?,
                contract_value: row.get(4)?,
                start_date: row.get(5)?,
                end_date: row.get(6)?,
                funding_source: row.get(7)?,
                section3_applicable: row.get(8)?,
                applicability_source: row.get(9)?,
                title: row.get(10)?,
                scope_of_work: row.get(11)?,
                poc_name: row.get(12)?,
                poc_email: row.get(13)?,
                poc_phone: row.get(14)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_stored()?);
        }
        Ok(out)
    }

    fn contract_id(conn: &Connection, key: &ContractKey) -> Result<Option<i64>, StoreError> {
        let mut stmt =
            conn.prepare("SELECT id FROM contracts WHERE client_name = ? AND contract_number = ?")?;
        let mut rows = stmt.query(params![key.client_name, key.contract_number])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

/// Raw column values of one `contracts` row.
struct ContractRow {
    id: i64,
    client_name: String,
    contract_number: String,
    vendor_name: String,
    contract_value: String,
    start_date: Option<String>,
    end_date: Option<String>,
    funding_source: String,
    section3_applicable: bool,
    applicability_source: String,
    title: Option<String>,
    scope_of_work: Option<String>,
    poc_name: Option<String>,
    poc_email: Option<String>,
    poc_phone: Option<String>,
}

impl ContractRow {
    fn into_stored(self) -> Result<StoredContract, StoreError> {
        let applicability_source = ApplicabilitySource::from_label(&self.applicability_source)
            .ok_or_else(|| {
                StoreError::Other(format!(
                    "unknown applicability_source {:?}",
                    self.applicability_source
                ))
            })?;
        let contract_value = BigDecimal::from_str(&self.contract_value).map_err(|e| {
            StoreError::Other(format!("bad contract_value {:?} from duckdb: {e}", self.contract_value))
        })?;
        Ok(StoredContract {
            id: self.id,
            record: ContractRecord {
                client_name: self.client_name,
                contract_number: self.contract_number,
                vendor_name: self.vendor_name,
                contract_value,
                start_date: parse_date(self.start_date)?,
                end_date: parse_date(self.end_date)?,
                funding_source: self.funding_source,
                section3_applicable: self.section3_applicable,
                applicability_source,
                title: self.title,
                scope_of_work: self.scope_of_work,
                section3_poc: PointOfContact::from_parts(self.poc_name, self.poc_email, self.poc_phone),
            },
        })
    }
}

fn tables_present(probe: &Result<Option<&'static str>, StoreError>) -> bool {
    matches!(probe, Ok(None))
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, StoreError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| StoreError::Other(format!("bad date {s:?} from duckdb: {e}")))
        })
        .transpose()
}

fn date_param(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

#[async_trait]
impl ComplianceStore for DuckStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        if let Some(table) = self.missing_table()? {
            return Err(StoreError::SchemaMissing(table.to_string()));
        }
        self.verify_schema()
    }

    async fn contract_exists(&self, key: &ContractKey) -> Result<bool, StoreError> {
        let conn = self.lock();
        Ok(Self::contract_id(&conn, key)?.is_some())
    }

    async fn insert_contract(&self, contract: &ContractRecord) -> Result<i64, StoreError> {
        let conn = self.lock();
        let key = contract.key();
        if Self::contract_id(&conn, &key)?.is_some() {
            return Err(StoreError::Duplicate(key));
        }
        let poc = contract.section3_poc.clone().unwrap_or_default();
        let id: i64 = conn.query_row(
            "INSERT INTO contracts (
                client_name, contract_number, vendor_name, contract_value,
                start_date, end_date, funding_source, section3_applicable,
                applicability_source, title, scope_of_work,
                section3_poc, section3_poc_email, section3_poc_phone
            ) VALUES (?, ?, ?, CAST(? AS DECIMAL(38, 20)), CAST(? AS DATE), CAST(? AS DATE),
                ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id",
            params![
                contract.client_name,
                contract.contract_number,
                contract.vendor_name,
                contract.contract_value.to_plain_string(),
                date_param(contract.start_date),
                date_param(contract.end_date),
                contract.funding_source,
                contract.section3_applicable,
                contract.applicability_source.as_str(),
                contract.title,
                contract.scope_of_work,
                poc.name,
                poc.email,
                poc.phone,
            ],
            |row| row.get(0),
        )?;
        debug!(id, contract = %key, "inserted contract");
        Ok(id)
    }

    async fn get_contract(&self, key: &ContractKey) -> Result<Option<StoredContract>, StoreError> {
        let conn = self.lock();
        let mut found = Self::select_contracts(
            &conn,
            "WHERE client_name = ? AND contract_number = ?",
            &[&key.client_name, &key.contract_number],
        )?;
        Ok(found.pop())
    }

    async fn list_contracts(&self, client: Option<&str>) -> Result<Vec<StoredContract>, StoreError> {
        let conn = self.lock();
        match client {
            Some(name) => Self::select_contracts(&conn, "WHERE client_name = ?", &[&name]),
            None => Self::select_contracts(&conn, "", &[]),
        }
    }

    async fn insert_tasks(
        &self,
        contract_id: i64,
        tasks: &[ComplianceTask],
    ) -> Result<Vec<i64>, StoreError> {
        let mut conn = self.lock();
        let exists: i64 = conn.query_row(
            "SELECT count(*) FROM contracts WHERE id = ?",
            [contract_id],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(StoreError::UnknownContract(contract_id));
        }

        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(tasks.len());
        for task in tasks {
            let id: i64 = tx.query_row(
                "INSERT INTO compliance_tasks (
                    contract_id, client_name, contract_number, title, description,
                    due_date, status, labor_hour_benchmark_pct, targeted_worker_benchmark_pct
                ) VALUES (?, ?, ?, ?, ?, CAST(? AS DATE), ?, ?, ?)
                RETURNING id",
                params![
                    contract_id,
                    task.client_name,
                    task.contract_number,
                    task.title,
                    task.description,
                    task.due_date.format("%Y-%m-%d").to_string(),
                    task.status.as_str(),
                    task.labor_hour_benchmark_pct,
                    task.targeted_worker_benchmark_pct,
                ],
                |row| row.get(0),
            )?;
            ids.push(id);
        }
        tx.commit()?;
        debug!(contract_id, count = ids.len(), "inserted compliance tasks");
        Ok(ids)
    }

    async fn tasks_for_contract(&self, key: &ContractKey) -> Result<Vec<ComplianceTask>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, contract_id, client_name, contract_number, title, description,
                CAST(due_date AS VARCHAR), status, labor_hour_benchmark_pct,
                targeted_worker_benchmark_pct
            FROM compliance_tasks
            WHERE client_name = ? AND contract_number = ?
            ORDER BY due_date, id",
        )?;
        let rows = stmt.query_map(params![key.client_name, key.contract_number], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, f64>(8)?,
                row.get::<_, f64>(9)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, contract_id, client_name, contract_number, title, description, due, status, lh, tw) =
                row?;
            let due_date = parse_date(Some(due))?.ok_or(StoreError::NoResults)?;
            let status = status
                .parse::<TaskStatus>()
                .map_err(|e| StoreError::Other(e.to_string()))?;
            tasks.push(ComplianceTask {
                id: Some(id),
                contract_id: Some(contract_id),
                client_name,
                contract_number,
                title,
                description,
                due_date,
                status,
                labor_hour_benchmark_pct: lh,
                targeted_worker_benchmark_pct: tw,
            });
        }
        Ok(tasks)
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<(), StoreError> {
        let conn = self.lock();
        let updated = conn.execute(
            "UPDATE compliance_tasks SET status = ? WHERE id = ?",
            params![status.as_str(), task_id],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownTask(task_id));
        }
        Ok(())
    }
}
