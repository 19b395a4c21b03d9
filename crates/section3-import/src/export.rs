//! CSV rendering of an [`ImportResult`] for download.

use std::io::Write;

use crate::ImportResult;

impl ImportResult {
    /// Write a two-column `metric,value` summary: the counts first, then one
    /// `error` row per error in input order.
    pub fn write_summary_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["metric", "value"])?;
        let counts = [
            ("status", self.status().to_string()),
            ("total_rows", self.total_rows.to_string()),
            ("contracts_inserted", self.contracts_inserted.to_string()),
            ("contracts_skipped", self.contracts_skipped.to_string()),
            ("tasks_created", self.tasks_created.to_string()),
            ("errors", self.errors.len().to_string()),
        ];
        for (metric, value) in &counts {
            out.write_record([*metric, value.as_str()])?;
        }
        for error in &self.errors {
            out.write_record(["error", error.as_str()])?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BatchFailure, ImportResult};

    fn render(result: &ImportResult) -> String {
        let mut buf = Vec::new();
        result.write_summary_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn counts_then_errors() {
        let result = ImportResult {
            total_rows: 3,
            contracts_inserted: 1,
            contracts_skipped: 1,
            tasks_created: 3,
            errors: vec!["Row 4: missing required field vendor_name".into()],
            ..ImportResult::default()
        };
        let text = render(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines[1], "status,completed_with_errors");
        assert_eq!(lines[2], "total_rows,3");
        assert_eq!(lines[5], "tasks_created,3");
        assert_eq!(lines[6], "errors,1");
        assert_eq!(lines[7], "error,Row 4: missing required field vendor_name");
    }

    #[test]
    fn error_text_with_commas_is_quoted() {
        let result = ImportResult::fatal(
            BatchFailure::SchemaMissing,
            "Database tables not initialized: run setup, then retry",
        );
        let text = render(&result);
        assert!(text.contains("status,schema_missing"));
        assert!(text.contains("error,\"Database tables not initialized: run setup, then retry\""));
    }
}
