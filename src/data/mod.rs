/// Data layer: table types, loading, and sanitizing.
///
/// Architecture:
/// ```text
///  .csv (shift_jis / utf-8)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → RawTable (missing cells marked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ sanitize  │  drop empty columns, trim headers, pick x/y → CleanSeries
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod sanitize;
