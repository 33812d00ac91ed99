//! Elementwise binary arithmetic over nested arrays with NumPy-style
//! shape broadcasting.
//!
//! Two broadcasting policies are supported:
//!
//! - *implicit*: any axis of extent 1 stretches to match the other operand
//! - *explicit*: each output axis carries an [`AxisAlignment`] tag naming
//!   which operand supplies its index
//!
//! All validation (rank equality, shape compatibility, tag legality) runs
//! once, eagerly, before traversal begins. A failure after the traversal
//! has started aborts the whole call; partial output is never returned.

pub mod broadcast;
pub mod engine;
pub mod policy;

pub use broadcast::{aligned_shape, broadcast_shape, source_index_implicit, source_indices_explicit};
pub use engine::{
    broadcast_add_explicit, broadcast_add_implicit, broadcast_combine_explicit,
    broadcast_combine_explicit_tags, broadcast_combine_implicit, broadcast_mul_explicit,
    broadcast_mul_implicit,
};
#[cfg(feature = "parallel")]
pub use engine::{broadcast_combine_explicit_parallel, broadcast_combine_implicit_parallel};
pub use policy::{parse_alignment, AxisAlignment};
