//! Core type definitions: Shape, IndexPath.

use smallvec::SmallVec;

/// Array shape (one extent per axis, outermost first).
///
/// Invariant: every extent is positive. A rank-0 shape describes a single
/// scalar element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape(pub Vec<usize>);

/// One coordinate per axis, fully addressing a single element.
///
/// Kept inline for the ranks that occur in practice; spills to the heap
/// beyond rank 4.
pub type IndexPath = SmallVec<[usize; 4]>;

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self(dims.into())
    }

    /// Scalar (rank-0) shape.
    pub fn scalar() -> Self {
        Self(vec![])
    }

    /// Number of axes (rank).
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Extents, outermost axis first.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
