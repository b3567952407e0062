use thiserror::Error;

pub type Result<T> = std::result::Result<T, NeighborhoodError>;

/// Input-validation failures. Every variant carries the offending value(s).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NeighborhoodError {
    #[error("invalid grid dimensions: height={height}, width={width} (both must be > 0)")]
    InvalidDimensions { height: i64, width: i64 },

    #[error(
        "grid data does not match dimensions {height}x{width}: {found_rows} rows, first bad row {bad_row:?}"
    )]
    DimensionMismatch {
        height: usize,
        width: usize,
        found_rows: usize,
        bad_row: Option<usize>,
    },

    #[error("position ({row},{column}) is out of bounds for grid {height}x{width}")]
    PositionOutOfBounds {
        row: i64,
        column: i64,
        height: usize,
        width: usize,
    },

    #[error("invalid distance threshold: {0} (must be >= 0)")]
    InvalidDistanceThreshold(i64),

    #[error("invalid coordinate: ({row},{column}) (both must be >= 0)")]
    InvalidCoordinate { row: i64, column: i64 },
}
