/// Data layer: table model, season loading, filtering, and export.
///
/// Architecture:
/// ```text
///  statcast_<year>.parquet  (or statcast_<year>_<MM>.parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  resolve season → project columns → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of Values, per-row season
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │  writer   │  parquet / csv out
///   └──────────┘   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
