//! Nested-container arrays with shape-aware element addressing.
//!
//! `nestcast-core` provides the foundational types (`NestedArray`, `Shape`,
//! `IndexPath`) and the error taxonomy shared by the broadcasting layer in
//! `nestcast-ops`. A rank-N array is stored as N levels of nested sequences
//! rather than as a flat strided buffer, and single elements are addressed
//! by a full index path, one coordinate per axis.

pub mod array;
pub mod types;

pub use array::NestedArray;
pub use types::{IndexPath, Shape};

pub type Result<T> = std::result::Result<T, CastError>;

/// The closed set of failures a broadcast operation can surface.
///
/// Every validation (rank equality, shape compatibility, tag legality) runs
/// eagerly before traversal, so these are raised up front; a failure after
/// traversal has started aborts the whole call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("rank mismatch: expected {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("index {index} out of range for axis {axis} of extent {dim}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        dim: usize,
    },

    #[error("incompatible extents {left} and {right} on axis {axis}")]
    IncompatibleShapes {
        axis: usize,
        left: usize,
        right: usize,
    },

    #[error("unrecognized alignment tag {tag:?} for axis {axis}")]
    InvalidPolicy { axis: usize, tag: String },
}
