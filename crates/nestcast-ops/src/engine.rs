//! Depth-first broadcast traversal over an output shape.
//!
//! The engine walks every position of the output shape in row-major order
//! (last axis fastest), maps each position to one source position per
//! operand, combines the two elements, and writes the result into a
//! pre-sized output. The engine never allocates the output itself; the
//! public entry points below do, then hand it over. Every output position
//! is written exactly once, so its initial contents are irrelevant.
//!
//! Shape and policy validation happens before the walk starts. Any failure
//! surfaced mid-walk (an internal invariant violation) aborts the whole
//! call and propagates to the caller.

use std::ops::{Add, Mul};

use nestcast_core::{IndexPath, NestedArray, Result, Shape};
use tracing::debug;

use crate::broadcast::{
    aligned_shape, broadcast_shape, source_index_implicit, source_indices_explicit,
};
use crate::policy::{parse_alignment, AxisAlignment};

/// How output positions map back onto the operands.
enum AxisMapping<'a> {
    /// Implicit policy: extent-1 axes stretch, everything else is shared.
    Stretch { left: &'a Shape, right: &'a Shape },
    /// Explicit policy: one alignment tag per output axis.
    Aligned(&'a [AxisAlignment]),
}

impl AxisMapping<'_> {
    fn source_paths(&self, out_path: &[usize]) -> (IndexPath, IndexPath) {
        match self {
            AxisMapping::Stretch { left, right } => (
                source_index_implicit(left, out_path),
                source_index_implicit(right, out_path),
            ),
            AxisMapping::Aligned(alignment) => source_indices_explicit(alignment, out_path),
        }
    }
}

/// One traversal over an output shape, borrowing both operands read-only.
struct Traversal<'a, T, F> {
    left: &'a NestedArray<T>,
    right: &'a NestedArray<T>,
    out_shape: &'a Shape,
    mapping: AxisMapping<'a>,
    op: F,
}

impl<T, F> Traversal<'_, T, F>
where
    F: Fn(&T, &T) -> T,
{
    fn run(&self, out: &mut NestedArray<T>) -> Result<()> {
        let mut path = IndexPath::new();
        self.visit(out, 0, 0, &mut path)
    }

    /// Visit every output position below `depth`.
    ///
    /// `out` is the output subtree whose root sits `base` axes deep in the
    /// full output array; `path` holds the full output path so far. The
    /// scratch path is pushed and popped on unwind, so recursion shares no
    /// mutable state across siblings.
    fn visit(
        &self,
        out: &mut NestedArray<T>,
        depth: usize,
        base: usize,
        path: &mut IndexPath,
    ) -> Result<()> {
        if depth == self.out_shape.ndim() {
            let (lpath, rpath) = self.mapping.source_paths(path);
            let value = (self.op)(self.left.get(&lpath)?, self.right.get(&rpath)?);
            return out.set(&path[base..], value);
        }
        for i in 0..self.out_shape.dims()[depth] {
            path.push(i);
            self.visit(out, depth + 1, base, path)?;
            path.pop();
        }
        Ok(())
    }

    /// Split the outermost axis across rayon workers.
    ///
    /// Each worker owns one disjoint output subtree and the operands are
    /// borrowed immutably, so no lock is needed. Validation has already
    /// completed on the calling thread.
    #[cfg(feature = "parallel")]
    fn run_parallel(&self, out: &mut NestedArray<T>) -> Result<()>
    where
        T: Send + Sync,
        F: Sync,
    {
        use rayon::prelude::*;

        if self.out_shape.ndim() == 0 {
            return self.run(out);
        }
        let children = match out {
            NestedArray::Node(children) => children,
            NestedArray::Leaf(_) => {
                return Err(nestcast_core::CastError::RankMismatch {
                    expected: self.out_shape.ndim(),
                    got: 0,
                })
            }
        };
        children
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(i, child)| {
                let mut path = IndexPath::new();
                path.push(i);
                self.visit(child, 1, 1, &mut path)
            })
    }
}

// ── Generic combine entry points ─────────────────────────────────────────

/// Elementwise combine under the implicit policy: any axis of extent 1
/// stretches to match the other operand.
///
/// Returns the populated result array together with its resolved shape.
pub fn broadcast_combine_implicit<T, F>(
    left: &NestedArray<T>,
    left_shape: &Shape,
    right: &NestedArray<T>,
    right_shape: &Shape,
    op: F,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default,
    F: Fn(&T, &T) -> T,
{
    debug_assert!(left.matches_shape(left_shape), "left operand is irregular");
    debug_assert!(right.matches_shape(right_shape), "right operand is irregular");
    let out_shape = broadcast_shape(left_shape, right_shape)?;
    debug!(%left_shape, %right_shape, %out_shape, "implicit broadcast");
    let mut out = NestedArray::filled(&out_shape, T::default());
    let traversal = Traversal {
        left,
        right,
        out_shape: &out_shape,
        mapping: AxisMapping::Stretch {
            left: left_shape,
            right: right_shape,
        },
        op,
    };
    traversal.run(&mut out)?;
    Ok((out, out_shape))
}

/// Elementwise combine under explicit per-axis alignments.
///
/// Operand shapes are derived from the arrays' structure; the alignment
/// sequence must carry one tag per axis.
pub fn broadcast_combine_explicit<T, F>(
    left: &NestedArray<T>,
    right: &NestedArray<T>,
    alignment: &[AxisAlignment],
    op: F,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default,
    F: Fn(&T, &T) -> T,
{
    let left_shape = left.shape();
    let right_shape = right.shape();
    debug_assert!(left.matches_shape(&left_shape), "left operand is irregular");
    debug_assert!(right.matches_shape(&right_shape), "right operand is irregular");
    let out_shape = aligned_shape(&left_shape, &right_shape, alignment)?;
    debug!(%left_shape, %right_shape, %out_shape, "explicit broadcast");
    let mut out = NestedArray::filled(&out_shape, T::default());
    let traversal = Traversal {
        left,
        right,
        out_shape: &out_shape,
        mapping: AxisMapping::Aligned(alignment),
        op,
    };
    traversal.run(&mut out)?;
    Ok((out, out_shape))
}

/// Explicit combine with externally supplied string tags.
///
/// Tag legality is settled by [`parse_alignment`] before any element is
/// computed; an unrecognized tag never reaches the traversal.
pub fn broadcast_combine_explicit_tags<T, F>(
    left: &NestedArray<T>,
    right: &NestedArray<T>,
    tags: &[&str],
    op: F,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default,
    F: Fn(&T, &T) -> T,
{
    let alignment = parse_alignment(tags)?;
    broadcast_combine_explicit(left, right, &alignment, op)
}

// ── Instantiated arithmetic entry points ─────────────────────────────────

/// Broadcasting addition under the implicit policy.
pub fn broadcast_add_implicit<T>(
    left: &NestedArray<T>,
    left_shape: &Shape,
    right: &NestedArray<T>,
    right_shape: &Shape,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Add<Output = T>,
{
    broadcast_combine_implicit(left, left_shape, right, right_shape, |a: &T, b: &T| {
        a.clone() + b.clone()
    })
}

/// Broadcasting addition under explicit per-axis alignments.
pub fn broadcast_add_explicit<T>(
    left: &NestedArray<T>,
    right: &NestedArray<T>,
    alignment: &[AxisAlignment],
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Add<Output = T>,
{
    broadcast_combine_explicit(left, right, alignment, |a: &T, b: &T| {
        a.clone() + b.clone()
    })
}

/// Broadcasting multiplication under the implicit policy.
pub fn broadcast_mul_implicit<T>(
    left: &NestedArray<T>,
    left_shape: &Shape,
    right: &NestedArray<T>,
    right_shape: &Shape,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Mul<Output = T>,
{
    broadcast_combine_implicit(left, left_shape, right, right_shape, |a: &T, b: &T| {
        a.clone() * b.clone()
    })
}

/// Broadcasting multiplication under explicit per-axis alignments.
pub fn broadcast_mul_explicit<T>(
    left: &NestedArray<T>,
    right: &NestedArray<T>,
    alignment: &[AxisAlignment],
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Mul<Output = T>,
{
    broadcast_combine_explicit(left, right, alignment, |a: &T, b: &T| {
        a.clone() * b.clone()
    })
}

// ── Parallel variants ────────────────────────────────────────────────────

/// Implicit-policy combine with the outermost axis split across rayon
/// workers. Output subtrees are disjoint, so results match the serial
/// variant exactly.
#[cfg(feature = "parallel")]
pub fn broadcast_combine_implicit_parallel<T, F>(
    left: &NestedArray<T>,
    left_shape: &Shape,
    right: &NestedArray<T>,
    right_shape: &Shape,
    op: F,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Send + Sync,
    F: Fn(&T, &T) -> T + Sync,
{
    let out_shape = broadcast_shape(left_shape, right_shape)?;
    let mut out = NestedArray::filled(&out_shape, T::default());
    let traversal = Traversal {
        left,
        right,
        out_shape: &out_shape,
        mapping: AxisMapping::Stretch {
            left: left_shape,
            right: right_shape,
        },
        op,
    };
    traversal.run_parallel(&mut out)?;
    Ok((out, out_shape))
}

/// Explicit-policy combine with the outermost axis split across rayon
/// workers.
#[cfg(feature = "parallel")]
pub fn broadcast_combine_explicit_parallel<T, F>(
    left: &NestedArray<T>,
    right: &NestedArray<T>,
    alignment: &[AxisAlignment],
    op: F,
) -> Result<(NestedArray<T>, Shape)>
where
    T: Clone + Default + Send + Sync,
    F: Fn(&T, &T) -> T + Sync,
{
    let left_shape = left.shape();
    let right_shape = right.shape();
    let out_shape = aligned_shape(&left_shape, &right_shape, alignment)?;
    let mut out = NestedArray::filled(&out_shape, T::default());
    let traversal = Traversal {
        left,
        right,
        out_shape: &out_shape,
        mapping: AxisMapping::Aligned(alignment),
        op,
    };
    traversal.run_parallel(&mut out)?;
    Ok((out, out_shape))
}
