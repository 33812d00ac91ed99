//! Shape resolution and per-axis index mapping for both policies.
//!
//! Rules (NumPy-style, implicit policy):
//! 1. Ranks must match.
//! 2. For each axis pair: extents must be equal, or one must be 1.
//! 3. The output extent is the max of the two.
//!
//! The explicit policy replaces rule 2 with a caller-supplied
//! [`AxisAlignment`] per axis. Either way, shape compatibility is settled
//! here, up front; the per-position index mapping below assumes it and is
//! never reached with an unvalidated pair.

use nestcast_core::{CastError, IndexPath, Result, Shape};

use crate::policy::AxisAlignment;

/// Compute the implicit-policy output shape of two operand shapes.
pub fn broadcast_shape(left: &Shape, right: &Shape) -> Result<Shape> {
    if left.ndim() != right.ndim() {
        return Err(CastError::RankMismatch {
            expected: left.ndim(),
            got: right.ndim(),
        });
    }
    let mut dims = Vec::with_capacity(left.ndim());
    for (axis, (&l, &r)) in left.dims().iter().zip(right.dims()).enumerate() {
        if l == r || l == 1 || r == 1 {
            dims.push(l.max(r));
        } else {
            return Err(CastError::IncompatibleShapes {
                axis,
                left: l,
                right: r,
            });
        }
    }
    Ok(Shape::new(dims))
}

/// Compute the explicit-policy output shape under per-axis alignments.
///
/// `Left` takes the left extent, `Right` the right extent, `Both` requires
/// the extents to agree.
pub fn aligned_shape(left: &Shape, right: &Shape, alignment: &[AxisAlignment]) -> Result<Shape> {
    if left.ndim() != right.ndim() {
        return Err(CastError::RankMismatch {
            expected: left.ndim(),
            got: right.ndim(),
        });
    }
    if alignment.len() != left.ndim() {
        return Err(CastError::RankMismatch {
            expected: left.ndim(),
            got: alignment.len(),
        });
    }
    let mut dims = Vec::with_capacity(left.ndim());
    for (axis, align) in alignment.iter().enumerate() {
        let (l, r) = (left.dims()[axis], right.dims()[axis]);
        match align {
            AxisAlignment::Left => dims.push(l),
            AxisAlignment::Right => dims.push(r),
            AxisAlignment::Both => {
                if l != r {
                    return Err(CastError::IncompatibleShapes {
                        axis,
                        left: l,
                        right: r,
                    });
                }
                dims.push(l);
            }
        }
    }
    Ok(Shape::new(dims))
}

/// Map an output-space path to one operand's path under the implicit
/// policy.
///
/// Per axis: `min(extent - 1, index)`. A stretched (extent-1) axis is
/// pinned to 0, a shared axis passes the index through. Only shape-correct
/// for operands that passed [`broadcast_shape`], which always runs first.
pub fn source_index_implicit(shape: &Shape, out_path: &[usize]) -> IndexPath {
    shape
        .dims()
        .iter()
        .zip(out_path)
        .map(|(&dim, &idx)| idx.min(dim - 1))
        .collect()
}

/// Map an output-space path to both operands' paths under explicit
/// alignments.
pub fn source_indices_explicit(
    alignment: &[AxisAlignment],
    out_path: &[usize],
) -> (IndexPath, IndexPath) {
    let mut left = IndexPath::with_capacity(out_path.len());
    let mut right = IndexPath::with_capacity(out_path.len());
    for (align, &idx) in alignment.iter().zip(out_path) {
        match align {
            AxisAlignment::Left => {
                left.push(idx);
                right.push(0);
            }
            AxisAlignment::Right => {
                left.push(0);
                right.push(idx);
            }
            AxisAlignment::Both => {
                left.push(idx);
                right.push(idx);
            }
        }
    }
    (left, right)
}
