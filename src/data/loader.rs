use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::Encoding;
use thiserror::Error;

use super::model::{CellValue, Column, RawTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    /// The bytes are not valid in the requested encoding.
    #[error("file is not valid {encoding}")]
    Decode { encoding: String },

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing CSV: {0}")]
    Parse(String),

    /// No header row.
    #[error("no columns to parse from file")]
    Empty,
}

impl LoadError {
    /// Whether a retry with a different encoding could succeed.
    pub fn is_decode(&self) -> bool {
        matches!(self, LoadError::Decode { .. })
    }
}

// ---------------------------------------------------------------------------
// Loader seam
// ---------------------------------------------------------------------------

/// Turns a file into a [`RawTable`] using the given text encoding label.
pub trait TableLoader {
    fn load(&self, path: &Path, encoding: &str) -> Result<RawTable, LoadError>;
}

// ---------------------------------------------------------------------------
// Missing-value predicate
// ---------------------------------------------------------------------------

/// Tokens read as missing, in addition to the empty string.
///
/// `#DIV/0!` is what spreadsheets export for a division by zero; the rest
/// are the usual dataframe NA spellings.
const MISSING_TOKENS: &[&str] = &[
    "#DIV/0!", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_token(raw: &str) -> bool {
    raw.is_empty() || MISSING_TOKENS.contains(&raw)
}

/// Type a raw CSV field.
fn parse_cell(raw: &str) -> CellValue {
    if is_missing_token(raw) {
        return CellValue::Missing;
    }
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(raw.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Delimited text with a header row.
///
/// The whole file is decoded up front so an encoding mismatch surfaces as
/// [`LoadError::Decode`] before any parsing happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableLoader;

impl CsvTableLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse already-decoded text.
    pub fn parse_text(&self, text: &str) -> Result<RawTable, LoadError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::Parse(format!("reading headers: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

        for (row_no, result) in reader.records().enumerate() {
            let record = result.map_err(|e| LoadError::Parse(format!("row {row_no}: {e}")))?;
            if record.len() > headers.len() {
                return Err(LoadError::Parse(format!(
                    "row {row_no}: expected {} fields, saw {}",
                    headers.len(),
                    record.len()
                )));
            }
            for (col_idx, column) in cells.iter_mut().enumerate() {
                let value = record.get(col_idx).map_or(CellValue::Missing, parse_cell);
                column.push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Ok(RawTable::new(columns))
    }
}

impl TableLoader for CsvTableLoader {
    fn load(&self, path: &Path, encoding: &str) -> Result<RawTable, LoadError> {
        let bytes = std::fs::read(path)?;
        let text = decode(&bytes, encoding)?;
        self.parse_text(&text)
    }
}

/// Strictly decode `bytes`; malformed input is an error, never replaced.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, LoadError> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| LoadError::Decode {
            encoding: encoding.name().to_string(),
        })?;

    Ok(text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string())
}
