/// Arrow schema definitions for the two persisted tables.
pub mod tables {
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

    pub const CONTRACTS: &str = "contracts";
    pub const COMPLIANCE_TASKS: &str = "compliance_tasks";

    /// `contracts.contract_value` is stored as `DECIMAL(38, 20)`.
    pub const CONTRACT_VALUE_PRECISION: u8 = 38;
    pub const CONTRACT_VALUE_SCALE: i8 = 20;

    /// Schema for the `contracts` table, keyed by `(client_name, contract_number)`.
    pub fn contracts_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("client_name", DataType::Utf8, false),
            Field::new("contract_number", DataType::Utf8, false),
            Field::new("vendor_name", DataType::Utf8, false),
            Field::new(
                "contract_value",
                DataType::Decimal128(CONTRACT_VALUE_PRECISION, CONTRACT_VALUE_SCALE),
                false,
            ),
            Field::new("start_date", DataType::Date32, true),
            Field::new("end_date", DataType::Date32, true),
            Field::new("funding_source", DataType::Utf8, false),
            Field::new("section3_applicable", DataType::Boolean, false),
            Field::new("applicability_source", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, true),
            Field::new("scope_of_work", DataType::Utf8, true),
            Field::new("section3_poc", DataType::Utf8, true),
            Field::new("section3_poc_email", DataType::Utf8, true),
            Field::new("section3_poc_phone", DataType::Utf8, true),
            Field::new(
                "created_at",
                DataType::Timestamp(TimeUnit::Microsecond, None),
                false,
            ),
        ])
    }

    /// Schema for the `compliance_tasks` table. One contract owns many tasks.
    pub fn compliance_tasks_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("contract_id", DataType::Int64, false),
            Field::new("client_name", DataType::Utf8, false),
            Field::new("contract_number", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("description", DataType::Utf8, false),
            Field::new("due_date", DataType::Date32, false),
            Field::new("status", DataType::Utf8, false),
            Field::new("labor_hour_benchmark_pct", DataType::Float64, false),
            Field::new("targeted_worker_benchmark_pct", DataType::Float64, false),
            Field::new(
                "created_at",
                DataType::Timestamp(TimeUnit::Microsecond, None),
                false,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::tables;

    #[test]
    fn contracts_schema_has_natural_key() {
        let schema = tables::contracts_schema();
        assert_eq!(schema.fields().len(), 16);
        assert!(schema.field_with_name("client_name").is_ok());
        assert!(schema.field_with_name("contract_number").is_ok());
        assert!(schema.field_with_name("section3_applicable").is_ok());
    }

    #[test]
    fn tasks_schema_carries_benchmarks() {
        let schema = tables::compliance_tasks_schema();
        assert_eq!(schema.fields().len(), 11);
        assert!(schema.field_with_name("labor_hour_benchmark_pct").is_ok());
        assert!(schema.field_with_name("targeted_worker_benchmark_pct").is_ok());
    }
}
