//! Batch orchestration: one result row per candidate file, whatever happens.
//!
//! ```text
//!  directory listing ──filter by extension──▶ candidate files
//!        │
//!        ▼  per file
//!   load (primary encoding, one fallback on decode mismatch)
//!        │
//!        ▼
//!   sanitize ──▶ estimate_period ──▶ ResultRow (period | error)
//! ```
//!
//! Files are processed sequentially in listing order. That order comes from
//! the platform's directory enumeration and is not guaranteed to be stable.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::Level;

use crate::config::AnalysisConfig;
use crate::data::loader::{LoadError, TableLoader};
use crate::data::model::RawTable;
use crate::data::sanitize::sanitize;
use crate::error::PeriodError;
use crate::spectral::estimate_period;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A diagnostic emitted while processing a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvent {
    pub level: Level,
    pub file: String,
    pub message: String,
}

/// Receives the runner's diagnostics.
pub trait EventSink {
    fn emit(&self, event: BatchEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: BatchEvent) {
        log::log!(event.level, "{}: {}", event.file, event.message);
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome for a single input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub file_name: String,
    pub outcome: Result<f64, PeriodError>,
}

impl ResultRow {
    pub fn period(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        let succeeded = rows.iter().filter(|r| r.is_success()).count();
        Self {
            succeeded,
            failed: rows.len() - succeeded,
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

pub struct BatchRunner<'a, L, S> {
    config: &'a AnalysisConfig,
    loader: L,
    sink: S,
}

impl<'a, L: TableLoader, S: EventSink> BatchRunner<'a, L, S> {
    pub fn new(config: &'a AnalysisConfig, loader: L, sink: S) -> Self {
        Self {
            config,
            loader,
            sink,
        }
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// List `dir` in enumeration order, keeping regular files and symlinks
    /// that resolve to one.
    pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("listing directory {}", dir.display()))?
        {
            let entry = entry.context("reading directory entry")?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Process every file in `dir` that carries the configured extension.
    pub fn run_dir(&self, dir: &Path) -> Result<Vec<ResultRow>> {
        let files = Self::list_dir(dir)?;
        Ok(self.run(&files))
    }

    /// Process the candidate files among `files`, in the given order.
    pub fn run(&self, files: &[PathBuf]) -> Vec<ResultRow> {
        files
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                self.config.matches_extension(&name).then_some((path, name))
            })
            .map(|(path, name)| self.process(path, name))
            .collect()
    }

    fn process(&self, path: &Path, file_name: String) -> ResultRow {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.analyse(path, &file_name)))
            .unwrap_or_else(|payload| Err(PeriodError::Unexpected(panic_message(&*payload))));

        match &outcome {
            Ok(period) => self.emit(Level::Debug, &file_name, format!("period = {period}")),
            Err(err) => {
                let message = match err {
                    PeriodError::ColumnIndex { .. } => format!("Column index error: {err}"),
                    PeriodError::Decode { .. } | PeriodError::Load(_) => {
                        format!("Failed to read file: {err}")
                    }
                    _ => format!("Error processing file: {err}"),
                };
                self.emit(Level::Error, &file_name, message);
            }
        }

        ResultRow { file_name, outcome }
    }

    fn analyse(&self, path: &Path, file_name: &str) -> Result<f64, PeriodError> {
        let table = self.load_with_fallback(path, file_name)?;
        self.emit(
            Level::Trace,
            file_name,
            format!(
                "loaded {} rows, columns {:?}",
                table.row_count(),
                table.column_names()
            ),
        );
        let series = sanitize(table, self.config.x_column, self.config.y_column)?;
        if series.is_empty() {
            self.emit(Level::Debug, file_name, "no usable rows after cleaning".to_string());
        }
        estimate_period(&series)
    }

    /// Load with the primary encoding, retrying once with the fallback
    /// only when the failure was a decode mismatch.
    fn load_with_fallback(&self, path: &Path, file_name: &str) -> Result<RawTable, PeriodError> {
        let primary = &self.config.encoding;
        let fallback = &self.config.fallback_encoding;

        match self.loader.load(path, primary) {
            Ok(table) => Ok(table),
            Err(err) if err.is_decode() => {
                self.emit(
                    Level::Warn,
                    file_name,
                    format!("Encoding error with {primary}. Trying {fallback}."),
                );
                self.loader.load(path, fallback).map_err(|err| match err {
                    LoadError::Decode { .. } => PeriodError::Decode {
                        primary: primary.clone(),
                        fallback: fallback.clone(),
                    },
                    other => other.into(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn emit(&self, level: Level, file: &str, message: String) {
        self.sink.emit(BatchEvent {
            level,
            file: file.to_string(),
            message,
        });
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while processing file".to_string()
    }
}
