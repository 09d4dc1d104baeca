//! Generation sources, their hourly potential output, and storage assets.

/// Hourly potential output calculator.
pub mod potential;
/// Generation technologies and merit order.
pub mod source;
/// Grid storage assets.
pub mod storage;

pub use potential::{DaylightWindow, potential_output};
pub use source::{Source, SourceMap};
pub use storage::{StorageAsset, StorageKind};
