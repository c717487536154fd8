use crate::grid::FloatValue;
use thiserror::Error;

/// Error type for invalid operations on gridded fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GriddedFieldError {
    #[error("Size mismatch on axis {axis}: grid has {grid_len} points but data has {data_len}")]
    SizeMismatch {
        axis: usize,
        grid_len: usize,
        data_len: usize,
    },
    #[error("Dimension mismatch: Expected {expected} got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Axis {axis} is out of bounds for a field of dimension {dim}")]
    AxisOutOfBounds { axis: usize, dim: usize },
    #[error("Slice step cannot be zero")]
    ZeroSliceStep,
    #[error("Cannot interpolate along axis {axis}: grid holds labels, not numeric coordinates")]
    NonNumericGrid { axis: usize },
    #[error("At least {required} grid points are required, got {got}")]
    InsufficientPoints { required: usize, got: usize },
    #[error("Coordinates have {coords} points but data has {data} along the interpolation axis")]
    ShapeMismatch { coords: usize, data: usize },
    #[error("Coordinates must be strictly increasing, found {value} at index {index}")]
    NonMonotonicGrid { index: usize, value: FloatValue },
    #[error("Coordinate {value} at index {index} is not finite")]
    NonFiniteCoordinate { index: usize, value: FloatValue },
    #[error("Extrapolation is not allowed. Target={target}, {side} interpolation range={limit}")]
    ExtrapolationNotAllowed {
        target: FloatValue,
        side: String,
        limit: FloatValue,
    },
    #[error("Dimension '{0}' already exists")]
    DuplicateDimension(String),
    #[error("Unknown dimension '{0}'")]
    UnknownDimension(String),
    #[error("Coordinate for dimension '{dim}' has {got} values, expected {expected}")]
    CoordinateSizeMismatch {
        dim: String,
        expected: usize,
        got: usize,
    },
    #[error("Key '{0}' appears more than once in the mapping")]
    DuplicateKey(String),
    #[error("Unknown rescaling '{0}'. Expected one of: linear, log10, log")]
    UnknownRescaling(String),
    #[error("Invalid interpolation options: {0}")]
    InvalidOptions(String),
}

/// Convenience type for `Result<T, GriddedFieldError>`.
pub type GriddedFieldResult<T> = Result<T, GriddedFieldError>;
