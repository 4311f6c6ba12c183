use thiserror::Error;

/// Errors raised while building a model or driving the tableau directly.
///
/// Infeasible and unbounded programs are not errors; they are reported
/// through [`SolutionStatus`](crate::SolutionStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),
    #[error("Lower bound {lower} is greater than upper bound {upper}")]
    InvalidBounds { lower: f64, upper: f64 },
    #[error("Bound must not be NaN")]
    NanBound,
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(usize),
    #[error("Pivot position ({row}, {col}) is outside the tableau")]
    PivotOutOfRange { row: usize, col: usize },
    #[error("Cannot pivot on zero entry at row {row}, column {col}")]
    ZeroPivot { row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, LpError>;
