//! Nested-container arrays and single-element addressing.
//!
//! A rank-0 array is a single element; a rank-k array is an ordered sequence
//! of rank-(k-1) arrays of equal shape. Regularity (nesting depth and
//! per-level lengths matching the declared shape) is a structural contract
//! on construction and is not revalidated on every access; `matches_shape`
//! exists for tests and debug assertions.

use crate::types::Shape;
use crate::{CastError, Result};

/// A rank-N array stored as nested sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NestedArray<T> {
    Leaf(T),
    Node(Vec<NestedArray<T>>),
}

impl<T> NestedArray<T> {
    /// Build an array of the given shape with every element set to `value`.
    pub fn filled(shape: &Shape, value: T) -> Self
    where
        T: Clone,
    {
        fn build<T: Clone>(dims: &[usize], value: &T) -> NestedArray<T> {
            match dims.split_first() {
                None => NestedArray::Leaf(value.clone()),
                Some((&d, rest)) => {
                    NestedArray::Node((0..d).map(|_| build(rest, value)).collect())
                }
            }
        }
        build(shape.dims(), &value)
    }

    /// Declared shape, derived from the leftmost spine.
    ///
    /// Only meaningful for regular arrays; siblings off the spine are not
    /// inspected.
    pub fn shape(&self) -> Shape {
        let mut dims = Vec::new();
        let mut cur = self;
        while let NestedArray::Node(children) = cur {
            dims.push(children.len());
            match children.first() {
                Some(child) => cur = child,
                None => break,
            }
        }
        Shape::new(dims)
    }

    /// Check that nesting depth and per-level lengths match `shape` exactly.
    pub fn matches_shape(&self, shape: &Shape) -> bool {
        fn check<T>(array: &NestedArray<T>, dims: &[usize]) -> bool {
            match (array, dims.split_first()) {
                (NestedArray::Leaf(_), None) => true,
                (NestedArray::Node(children), Some((&d, rest))) => {
                    children.len() == d && children.iter().all(|c| check(c, rest))
                }
                _ => false,
            }
        }
        check(self, shape.dims())
    }

    /// Read the element addressed by `path`.
    ///
    /// The path must name one index per axis. A path that runs past a leaf
    /// or stops short of one is a `RankMismatch`; an entry past the end of
    /// its level is `IndexOutOfRange`.
    pub fn get(&self, path: &[usize]) -> Result<&T> {
        let mut cur = self;
        for (axis, &index) in path.iter().enumerate() {
            match cur {
                NestedArray::Node(children) => {
                    cur = children.get(index).ok_or(CastError::IndexOutOfRange {
                        axis,
                        index,
                        dim: children.len(),
                    })?;
                }
                NestedArray::Leaf(_) => {
                    return Err(CastError::RankMismatch {
                        expected: axis,
                        got: path.len(),
                    })
                }
            }
        }
        match cur {
            NestedArray::Leaf(value) => Ok(value),
            NestedArray::Node(_) => Err(CastError::RankMismatch {
                expected: self.shape().ndim(),
                got: path.len(),
            }),
        }
    }

    /// Replace the element addressed by `path` in place.
    ///
    /// Exactly one position changes; no other position is touched. Fails
    /// with the same error kinds as [`get`](Self::get).
    pub fn set(&mut self, path: &[usize], value: T) -> Result<()> {
        let mut cur = self;
        for (axis, &index) in path.iter().enumerate() {
            match cur {
                NestedArray::Node(children) => {
                    let dim = children.len();
                    cur = children
                        .get_mut(index)
                        .ok_or(CastError::IndexOutOfRange { axis, index, dim })?;
                }
                NestedArray::Leaf(_) => {
                    return Err(CastError::RankMismatch {
                        expected: axis,
                        got: path.len(),
                    })
                }
            }
        }
        match cur {
            NestedArray::Leaf(slot) => {
                *slot = value;
                Ok(())
            }
            NestedArray::Node(_) => Err(CastError::RankMismatch {
                expected: path.len() + cur.shape().ndim(),
                got: path.len(),
            }),
        }
    }
}

impl<T> From<Vec<T>> for NestedArray<T> {
    fn from(values: Vec<T>) -> Self {
        NestedArray::Node(values.into_iter().map(NestedArray::Leaf).collect())
    }
}

impl<T> From<Vec<Vec<T>>> for NestedArray<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        NestedArray::Node(rows.into_iter().map(NestedArray::from).collect())
    }
}

impl<T> From<Vec<Vec<Vec<T>>>> for NestedArray<T> {
    fn from(blocks: Vec<Vec<Vec<T>>>) -> Self {
        NestedArray::Node(blocks.into_iter().map(NestedArray::from).collect())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for NestedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NestedArray::Leaf(value) => write!(f, "{value}"),
            NestedArray::Node(children) => {
                write!(f, "[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, "]")
            }
        }
    }
}
