use crate::components::DType;

pub type Result<T> = std::result::Result<T, ArrayError>;

#[derive(thiserror::Error, Debug)]
pub enum ArrayError {
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<i64>, reason: &'static str },
    #[error("Index {index} is out of bounds for axis {axis} with extent {extent}")]
    IndexOutOfBounds {
        index: isize,
        axis: usize,
        extent: usize,
    },
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("Too many indices: {given} given for array with {ndim} dimensions")]
    TooManyIndices { given: usize, ndim: usize },
    #[error("Rank mismatch: expected {expected} dimensions, got {got}")]
    RankMismatch { expected: usize, got: usize },
    #[error("Slice step on axis {axis} can not be zero")]
    InvalidStep { axis: usize },
    #[error("Element type mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error(transparent)]
    Codec(#[from] bincode::Error),
}

impl ArrayError {
    pub(crate) fn invalid_shape(shape: impl IntoIterator<Item = i64>, reason: &'static str) -> Self {
        ArrayError::InvalidShape {
            shape: shape.into_iter().collect(),
            reason,
        }
    }
}
