//! Property tests for shape resolution under both broadcasting policies.
//!
//! These tests use proptest to generate random shapes and verify invariants
//! that must hold for any valid input.

use nestcast_core::Shape;
use nestcast_ops::{aligned_shape, broadcast_shape, AxisAlignment};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────────

/// Generate a random extent (1..=8 to keep tests fast).
fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

/// Generate a random shape with rank 0..=4.
fn arb_shape() -> impl Strategy<Value = Shape> {
    prop::collection::vec(dim(), 0..=4).prop_map(Shape::new)
}

/// Generate a same-rank pair of shapes.
fn same_rank_pair() -> impl Strategy<Value = (Shape, Shape)> {
    (0usize..=4).prop_flat_map(|rank| {
        (
            prop::collection::vec(dim(), rank),
            prop::collection::vec(dim(), rank),
        )
            .prop_map(|(a, b)| (Shape::new(a), Shape::new(b)))
    })
}

/// Generate a compatible pair: start from a target shape and mask some of
/// one operand's extents down to 1.
fn broadcastable_pair() -> impl Strategy<Value = (Shape, Shape)> {
    prop::collection::vec(dim(), 0..=4).prop_flat_map(|target| {
        let len = target.len();
        (
            prop::collection::vec(prop::bool::ANY, len),
            prop::collection::vec(prop::bool::ANY, len),
            Just(target),
        )
            .prop_map(|(left_mask, right_mask, t)| {
                // Keep at least one side full-extent per axis so the target
                // is still the resolved shape.
                let left: Vec<usize> = t
                    .iter()
                    .zip(&left_mask)
                    .map(|(&d, &keep)| if keep { d } else { 1 })
                    .collect();
                let right: Vec<usize> = t
                    .iter()
                    .zip(&right_mask)
                    .zip(&left)
                    .map(|((&d, &keep), &l)| if keep || l == 1 { d } else { 1 })
                    .collect();
                (Shape::new(left), Shape::new(right))
            })
    })
}

// ── Implicit policy ──────────────────────────────────────────────────────

proptest! {
    /// Resolution is commutative (up to which operand an error names).
    #[test]
    fn implicit_commutative((a, b) in same_rank_pair()) {
        prop_assert_eq!(broadcast_shape(&a, &b).ok(), broadcast_shape(&b, &a).ok());
    }

    /// A shape resolves with itself to itself.
    #[test]
    fn implicit_self_identity(a in arb_shape()) {
        prop_assert_eq!(broadcast_shape(&a, &a), Ok(a));
    }

    /// Masked pairs always resolve, back to the target they were cut from.
    #[test]
    fn implicit_masked_pairs_resolve((a, b) in broadcastable_pair()) {
        let out = broadcast_shape(&a, &b).unwrap();
        for (axis, &d) in out.dims().iter().enumerate() {
            prop_assert_eq!(d, a.dims()[axis].max(b.dims()[axis]));
        }
    }

    /// Every output extent is at least as large as both operand extents.
    #[test]
    fn implicit_result_covers_operands((a, b) in same_rank_pair()) {
        if let Ok(out) = broadcast_shape(&a, &b) {
            for axis in 0..out.ndim() {
                prop_assert!(out.dims()[axis] >= a.dims()[axis]);
                prop_assert!(out.dims()[axis] >= b.dims()[axis]);
            }
        }
    }

    /// Mismatched ranks never resolve.
    #[test]
    fn implicit_rank_mismatch_rejected(a in arb_shape(), b in arb_shape()) {
        prop_assume!(a.ndim() != b.ndim());
        prop_assert!(broadcast_shape(&a, &b).is_err());
    }
}

// ── Explicit policy ──────────────────────────────────────────────────────

proptest! {
    /// All-Both alignment succeeds exactly for equal shapes.
    #[test]
    fn explicit_all_both_is_shape_equality((a, b) in same_rank_pair()) {
        let alignment = vec![AxisAlignment::Both; a.ndim()];
        let result = aligned_shape(&a, &b, &alignment);
        if a == b {
            prop_assert_eq!(result, Ok(a));
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// All-Left alignment always yields the left shape.
    #[test]
    fn explicit_all_left_takes_left((a, b) in same_rank_pair()) {
        let alignment = vec![AxisAlignment::Left; a.ndim()];
        prop_assert_eq!(aligned_shape(&a, &b, &alignment), Ok(a));
    }

    /// All-Right alignment always yields the right shape.
    #[test]
    fn explicit_all_right_takes_right((a, b) in same_rank_pair()) {
        let alignment = vec![AxisAlignment::Right; a.ndim()];
        prop_assert_eq!(aligned_shape(&a, &b, &alignment), Ok(b));
    }

    /// An alignment sequence of the wrong length is a rank mismatch.
    #[test]
    fn explicit_wrong_length_rejected(a in arb_shape(), extra in 1usize..=3) {
        let alignment = vec![AxisAlignment::Both; a.ndim() + extra];
        prop_assert_eq!(
            aligned_shape(&a, &a, &alignment),
            Err(nestcast_core::CastError::RankMismatch {
                expected: a.ndim(),
                got: a.ndim() + extra,
            })
        );
    }
}
