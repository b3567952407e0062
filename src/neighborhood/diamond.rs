use std::collections::HashSet;

use tracing::trace;

use crate::coord::Coordinate;
use crate::error::{NeighborhoodError, Result};
use crate::grid::Dimensions;

/// Reject negative thresholds, reporting the value.
#[inline]
pub fn validate_threshold(threshold: i64) -> Result<usize> {
    usize::try_from(threshold).map_err(|_| NeighborhoodError::InvalidDistanceThreshold(threshold))
}

/// One clamped row of a diamond: columns `min_col..=max_col` of `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowSpan {
    pub row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

/// Row sweep over the L1 ball of radius `n` around `center`, clamped to the grid.
///
/// Rows are clamped first, then each row's column budget `n - |dr|` is clamped,
/// so only in-bounds cells are ever visited. Saturating arithmetic keeps huge
/// radii from overflowing.
pub(crate) fn row_spans(
    center: Coordinate,
    n: usize,
    dims: Dimensions,
) -> impl Iterator<Item = RowSpan> {
    let min_row = center.row().saturating_sub(n);
    let max_row = center.row().saturating_add(n).min(dims.height() - 1);
    let last_col = dims.width() - 1;

    (min_row..=max_row).filter_map(move |row| {
        let remaining = n - row.abs_diff(center.row());
        let min_col = center.column().saturating_sub(remaining);
        let max_col = center.column().saturating_add(remaining).min(last_col);
        (min_col <= max_col).then_some(RowSpan {
            row,
            min_col,
            max_col,
        })
    })
}

/// All in-bounds cells within Manhattan distance `threshold` of `center`.
///
/// An in-bounds center is always part of its own neighborhood.
pub fn enumerate(
    center: Coordinate,
    threshold: i64,
    dims: Dimensions,
) -> Result<HashSet<Coordinate>> {
    let n = validate_threshold(threshold)?;
    let mut out = HashSet::new();
    for span in row_spans(center, n, dims) {
        out.extend((span.min_col..=span.max_col).map(|col| Coordinate::at(span.row, col)));
    }
    trace!(%center, n, cells = out.len(), "enumerated diamond");
    Ok(out)
}
