/// Data layer: core types, transforms, persistence and loading.
///
/// Architecture:
/// ```text
///   in-memory columns           persisted .csv
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  model   │ ◄──────────── │  loader  │  text cells → Dataset
///   └──────────┘               └──────────┘
///        │
///        ├──► transform   f64 → f64 per cell → `<name>_transformed`
///        │
///        ▼
///   ┌──────────┐
///   │  writer  │  Dataset → header + rows, no index column
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod transform;
pub mod writer;

pub use error::DataError;
pub use model::{Column, Dataset, Value};
pub use transform::Transform;
