use std::collections::HashSet;

use crate::coord::Coordinate;
use crate::grid::Dimensions;

/// Whether a raw candidate lies in `[0,height) x [0,width)`.
/// Negative components are simply outside; nothing wraps.
#[inline]
pub fn is_within_bounds(row: i64, column: i64, dims: Dimensions) -> bool {
    row >= 0 && column >= 0 && (row as u64) < dims.height() as u64 && (column as u64) < dims.width() as u64
}

/// Candidate offset from a cell, or None if it falls off the grid.
#[cfg(test)]
pub(crate) fn checked_cell(row: i64, column: i64, dims: Dimensions) -> Option<Coordinate> {
    if !is_within_bounds(row, column, dims) {
        return None;
    }
    Some(Coordinate::at(row as usize, column as usize))
}

/// Subset of `coords` inside the grid.
pub fn filter_valid(coords: &HashSet<Coordinate>, dims: Dimensions) -> HashSet<Coordinate> {
    coords.iter().copied().filter(|&c| dims.contains(c)).collect()
}
