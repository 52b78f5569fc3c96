use crate::error::{PeriodError, Result};

use super::model::{CleanSeries, RawTable};

/// Column positions resolved against a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub x: usize,
    pub y: usize,
}

/// Drop all-missing columns and trim header whitespace.
///
/// Missing markers were already folded into [`CellValue::Missing`] by the
/// loader, so a column of `#DIV/0!` cells is dropped here too.
///
/// [`CellValue::Missing`]: super::model::CellValue::Missing
pub fn clean_columns(mut table: RawTable) -> RawTable {
    table.columns.retain(|c| !c.is_all_missing());
    for column in &mut table.columns {
        let trimmed = column.name.trim();
        if trimmed.len() != column.name.len() {
            column.name = trimmed.to_string();
        }
    }
    table
}

/// Check both positions against the table's current column order.
pub fn resolve_columns(table: &RawTable, x_index: usize, y_index: usize) -> Result<ResolvedColumns> {
    let available = table.column_count();
    for index in [x_index, y_index] {
        if index >= available {
            return Err(PeriodError::ColumnIndex { index, available });
        }
    }
    Ok(ResolvedColumns {
        x: x_index,
        y: y_index,
    })
}

/// Reduce a loaded table to the numeric `(x, y)` pair at the given positions.
///
/// Positions refer to the table after empty columns are dropped. Rows where
/// either value is missing or not a finite number are skipped.
pub fn sanitize(table: RawTable, x_index: usize, y_index: usize) -> Result<CleanSeries> {
    let table = clean_columns(table);
    let cols = resolve_columns(&table, x_index, y_index)?;

    let x = &table.columns[cols.x];
    let y = &table.columns[cols.y];
    let series = CleanSeries::from_pairs(
        x.cells
            .iter()
            .zip(&y.cells)
            .filter_map(|(xv, yv)| Some((xv.as_f64()?, yv.as_f64()?))),
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn ints(values: &[i64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Integer(v)).collect()
    }

    fn table_with_empty_lead() -> RawTable {
        RawTable::new(vec![
            Column::new("id", ints(&[1, 2, 3])),
            Column::new("blank", vec![CellValue::Missing; 3]),
            Column::new(" a ", ints(&[7, 7, 7])),
            Column::new("b", ints(&[8, 8, 8])),
            Column::new("  time", ints(&[0, 1, 2])),
            Column::new("value\t", ints(&[5, 6, 7])),
        ])
    }

    #[test]
    fn empty_columns_are_dropped_before_resolution() {
        let series = sanitize(table_with_empty_lead(), 3, 4).unwrap();
        assert_eq!(series.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(series.y(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn header_names_are_trimmed() {
        let table = clean_columns(table_with_empty_lead());
        assert_eq!(table.column_names(), vec!["id", "a", "b", "time", "value"]);
    }

    #[test]
    fn out_of_range_index_is_a_column_error() {
        let err = sanitize(table_with_empty_lead(), 3, 5).unwrap_err();
        assert_eq!(
            err,
            PeriodError::ColumnIndex {
                index: 5,
                available: 5
            }
        );
    }

    #[test]
    fn rows_with_missing_or_text_values_are_dropped() {
        let table = RawTable::new(vec![
            Column::new("x", ints(&[0, 1, 2, 3])),
            Column::new(
                "y",
                vec![
                    CellValue::Float(1.5),
                    CellValue::Missing,
                    CellValue::Text("n/a?".into()),
                    CellValue::Text("2.5".into()),
                ],
            ),
        ]);
        let series = sanitize(table, 0, 1).unwrap();
        assert_eq!(series.x(), &[0.0, 3.0]);
        assert_eq!(series.y(), &[1.5, 2.5]);
    }

    #[test]
    fn zero_row_table_loses_every_column() {
        let table = RawTable::new(vec![Column::new("x", vec![]), Column::new("y", vec![])]);
        let err = sanitize(table, 0, 1).unwrap_err();
        assert!(matches!(err, PeriodError::ColumnIndex { available: 0, .. }));
    }
}
