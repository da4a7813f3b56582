/// Data layer: core types, loading, normalization and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (all cells as text)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  canonical headers, material column → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  option lists + selections → visible row indices
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
