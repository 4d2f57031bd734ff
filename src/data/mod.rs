/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  Dataset.csv (or synthetic fallback)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse / synthesize → SalesDataset, cached per session
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SalesRecord>, category indices, date span
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply criteria → filtered records, source order
///   └──────────┘
/// ```
///
/// Aggregations over the filtered records live in [`crate::analysis`];
/// nothing here ever writes back to an earlier stage.

pub mod filter;
pub mod loader;
pub mod model;
