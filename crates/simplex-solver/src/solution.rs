/// Outcome of a solve. Only an optimal outcome carries values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal(Solution),
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
}

/// Payload-free view of [`SolutionStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Optimal,
    Infeasible,
    Unbounded,
}

impl SolutionStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            SolutionStatus::Optimal(_) => StatusKind::Optimal,
            SolutionStatus::Infeasible => StatusKind::Infeasible,
            SolutionStatus::Unbounded => StatusKind::Unbounded,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolutionStatus::Optimal(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolutionStatus::Optimal(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Values read back from an optimal tableau.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Objective value, in the direction the caller asked for
    pub objective_value: f64,
    /// Value per column; `None` where the column was not uniquely resolved
    pub values: Vec<Option<f64>>,
    /// Original constraints the extracted point does not satisfy
    pub violations: Vec<ConstraintViolation>,
}

impl Solution {
    pub fn value(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }
}

/// Information about a violated constraint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintViolation {
    /// Constraint label, e.g. `constraint 2` or `bound x`
    pub constraint: String,
    /// The bound that was crossed
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl ConstraintViolation {
    pub(crate) fn check(label: String, lower: f64, upper: f64, actual: f64, tolerance: f64) -> Option<Self> {
        if actual > upper + tolerance {
            let amt = actual - upper;
            Some(Self {
                description: format!("{} exceeds maximum of {:.2} by {:.2}", label, upper, amt),
                constraint: label,
                required: upper,
                actual,
                violation_amount: amt,
            })
        } else if actual < lower - tolerance {
            let amt = lower - actual;
            Some(Self {
                description: format!("{} is below minimum of {:.2} by {:.2}", label, lower, amt),
                constraint: label,
                required: lower,
                actual,
                violation_amount: amt,
            })
        } else {
            None
        }
    }
}
