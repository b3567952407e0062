use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NeighborhoodError, Result};

/// A cell position. Row 0 is the bottom edge, column 0 the left edge.
///
/// Ordering is row-major, so sorted collections list cells bottom row first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    row: usize,
    column: usize,
}

impl Coordinate {
    /// Validating constructor for caller-supplied values.
    pub fn new(row: i64, column: i64) -> Result<Self> {
        if row < 0 || column < 0 {
            return Err(NeighborhoodError::InvalidCoordinate { row, column });
        }
        Ok(Self::at(row as usize, column as usize))
    }

    #[inline]
    pub const fn at(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Manhattan (L1) distance.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}
