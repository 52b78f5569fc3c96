use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::batch::ResultRow;

pub const HEADER: [&str; 2] = ["File Name", "Period"];

/// Persists the collected rows once the batch has finished.
pub trait ReportWriter {
    fn write(&self, rows: &[ResultRow], path: &Path) -> Result<()>;
}

// ---------------------------------------------------------------------------
// xlsx
// ---------------------------------------------------------------------------

/// Single-sheet workbook: header row, then file name and period (or the
/// error marker) per row.
#[derive(Debug, Clone)]
pub struct XlsxReport {
    error_marker: String,
}

impl XlsxReport {
    pub fn new(error_marker: impl Into<String>) -> Self {
        Self {
            error_marker: error_marker.into(),
        }
    }
}

impl ReportWriter for XlsxReport {
    fn write(&self, rows: &[ResultRow], path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, title) in (0u16..).zip(HEADER) {
            sheet
                .write_string_with_format(0, col, title, &bold)
                .context("writing header")?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = u32::try_from(i + 1).context("too many rows for a worksheet")?;
            sheet
                .write_string(r, 0, row.file_name.as_str())
                .with_context(|| format!("writing row {r}"))?;
            let written = match row.period() {
                Some(period) => sheet.write_number(r, 1, period),
                None => sheet.write_string(r, 1, self.error_marker.as_str()),
            };
            written.with_context(|| format!("writing row {r}"))?;
        }

        workbook
            .save(path)
            .with_context(|| format!("saving {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    file_name: &'a str,
    period: Option<f64>,
    error: Option<String>,
}

/// Same rows as the workbook, with the failure cause spelled out.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl ReportWriter for JsonReport {
    fn write(&self, rows: &[ResultRow], path: &Path) -> Result<()> {
        let records: Vec<JsonRow<'_>> = rows
            .iter()
            .map(|row| JsonRow {
                file_name: &row.file_name,
                period: row.period(),
                error: row.outcome.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        let text = serde_json::to_string_pretty(&records).context("serialising report")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeriodError;
    use calamine::{open_workbook, Data, Reader, Xlsx};

    fn sample_rows() -> Vec<ResultRow> {
        vec![
            ResultRow {
                file_name: "a.csv".into(),
                outcome: Ok(5.0),
            },
            ResultRow {
                file_name: "b.csv".into(),
                outcome: Err(PeriodError::InsufficientData { got: 1 }),
            },
        ]
    }

    #[test]
    fn workbook_has_header_and_one_row_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("periods.xlsx");
        XlsxReport::new("Error").write(&sample_rows(), &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("File Name".into()));
        assert_eq!(rows[0][1], Data::String("Period".into()));
        assert_eq!(rows[1][0], Data::String("a.csv".into()));
        assert_eq!(rows[1][1], Data::Float(5.0));
        assert_eq!(rows[2][1], Data::String("Error".into()));
    }

    #[test]
    fn empty_batch_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("periods.xlsx");
        XlsxReport::new("Error").write(&[], &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.rows().count(), 1);
    }

    #[test]
    fn json_report_carries_the_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("periods.json");
        JsonReport.write(&sample_rows(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["period"], 5.0);
        assert!(value[0]["error"].is_null());
        assert!(value[1]["period"].is_null());
        assert_eq!(
            value[1]["error"],
            "insufficient data: need at least 2 points, got 1"
        );
    }
}
