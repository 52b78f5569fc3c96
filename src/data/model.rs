// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Empty cell or a recognised missing-value marker such as `#DIV/0!`.
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Coerce the cell to a finite `f64`.
    ///
    /// Text is parsed after trimming; anything non-numeric or non-finite
    /// yields `None` and is treated as missing by the sanitizer.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Missing => return None,
        };
        v.is_finite().then_some(v)
    }
}

// ---------------------------------------------------------------------------
// RawTable – the loaded file, column-major
// ---------------------------------------------------------------------------

/// One named column of a [`RawTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// True when no cell holds a value (vacuously true for zero rows).
    pub fn is_all_missing(&self) -> bool {
        self.cells.iter().all(CellValue::is_missing)
    }
}

/// Ordered named columns; every column has the same number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<Column>,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns
                .windows(2)
                .all(|w| w[0].cells.len() == w[1].cells.len()),
            "columns must have equal row counts"
        );
        Self { columns }
    }

    /// Number of rows (0 for a table with no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// CleanSeries – the numeric (x, y) pair handed to the estimator
// ---------------------------------------------------------------------------

/// Paired numeric samples with no missing entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl CleanSeries {
    /// Build a series from `(x, y)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = pairs.into_iter().unzip();
        Self { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Text(" 2.5 ".into()).as_f64(), Some(2.5));
        assert_eq!(CellValue::Text("abc".into()).as_f64(), None);
        assert_eq!(CellValue::Float(f64::INFINITY).as_f64(), None);
        assert_eq!(CellValue::Missing.as_f64(), None);
    }

    #[test]
    fn empty_column_counts_as_all_missing() {
        assert!(Column::new("a", vec![]).is_all_missing());
        assert!(!Column::new("a", vec![CellValue::Missing, CellValue::Integer(1)]).is_all_missing());
    }

    #[test]
    fn series_keeps_pairs_aligned() {
        let s = CleanSeries::from_pairs(vec![(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(s.x(), &[0.0, 1.0]);
        assert_eq!(s.y(), &[1.0, 2.0]);
        assert_eq!(s.len(), 2);
    }
}
