//! Per-axis alignment tags for the explicit broadcasting policy.

use nestcast_core::{CastError, Result};

/// How one output axis maps onto the two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisAlignment {
    /// The axis index comes from the left operand; the right operand is
    /// pinned to index 0 on this axis.
    Left,
    /// The axis index comes from the right operand; the left operand is
    /// pinned to index 0 on this axis.
    Right,
    /// Both operands share the axis index; their extents must agree.
    Both,
}

/// Parse externally supplied alignment tags, one per output axis.
///
/// Recognized tags are `"left"`, `"right"`, and `"both"`. Anything else is
/// an `InvalidPolicy` error, raised before any traversal begins.
pub fn parse_alignment(tags: &[&str]) -> Result<Vec<AxisAlignment>> {
    tags.iter()
        .enumerate()
        .map(|(axis, tag)| match *tag {
            "left" => Ok(AxisAlignment::Left),
            "right" => Ok(AxisAlignment::Right),
            "both" => Ok(AxisAlignment::Both),
            other => Err(CastError::InvalidPolicy {
                axis,
                tag: other.to_string(),
            }),
        })
        .collect()
}
