/// Data layer: core types, loading, and metric domains.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, column index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  pick plotted columns → [min, max] per metric
///   └──────────┘
/// ```

pub mod loader;
pub mod metrics;
pub mod model;
