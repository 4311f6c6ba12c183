//! Rewriting of constraints and objectives into standard form.
//!
//! A standard constraint is a single `expr <= upper_bound` inequality and the
//! standard objective is always maximized. All functions here are pure: the
//! inputs are left untouched and new values are returned.

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::model::{Constraint, Objective, Sense, Variable};

/// `sum(coef * var) <= upper_bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardConstraint {
    pub coefficients: Vec<(Variable, f64)>,
    pub upper_bound: f64,
}

impl StandardConstraint {
    pub fn activity(&self, mut value_of: impl FnMut(&Variable) -> f64) -> f64 {
        self.coefficients
            .iter()
            .map(|(variable, coef)| coef * value_of(variable))
            .sum()
    }

    pub fn is_satisfied(&self, value_of: impl FnMut(&Variable) -> f64, tolerance: f64) -> bool {
        self.activity(value_of) <= self.upper_bound + tolerance
    }
}

/// Objective to be maximized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandardObjective {
    pub coefficients: Vec<(Variable, f64)>,
    /// Set when the source objective was a minimization and has been negated.
    pub negated: bool,
}

/// Everything the tableau builder consumes.
#[derive(Debug, Clone, Default)]
pub struct StandardForm {
    pub constraints: Vec<StandardConstraint>,
    pub objective: StandardObjective,
}

impl StandardForm {
    pub fn num_rows(&self) -> usize {
        self.constraints.len()
    }
}

/// Standard form of one constraint.
///
/// Yields one row for a one-sided constraint, two for a ranged constraint and
/// none when both bounds are infinite.
pub fn standardize_constraint(constraint: &Constraint) -> Vec<StandardConstraint> {
    let upper = || StandardConstraint {
        coefficients: constraint.coefficients().to_vec(),
        upper_bound: constraint.upper_bound(),
    };
    let lower = || StandardConstraint {
        coefficients: negate(constraint.coefficients()),
        upper_bound: -constraint.lower_bound(),
    };

    match (constraint.has_lower_bound(), constraint.has_upper_bound()) {
        (false, true) => vec![upper()],
        (true, false) => vec![lower()],
        (true, true) => vec![upper(), lower()],
        (false, false) => Vec::new(),
    }
}

/// Implicit `variable <= upper_bound` row, if the variable has a finite bound.
pub fn standardize_variable(variable: &Variable) -> Option<StandardConstraint> {
    variable.has_upper_bound().then(|| StandardConstraint {
        coefficients: vec![(variable.clone(), 1.0)],
        upper_bound: variable.upper_bound(),
    })
}

/// Standard (maximization) form of an objective. An unset direction is maximized.
pub fn standardize_objective(objective: &Objective) -> StandardObjective {
    match objective.sense() {
        Some(Sense::Minimize) => StandardObjective {
            coefficients: negate(objective.coefficients()),
            negated: true,
        },
        Some(Sense::Maximize) | None => StandardObjective {
            coefficients: objective.coefficients().to_vec(),
            negated: false,
        },
    }
}

/// Standardize a whole program.
///
/// Rows come from the constraints in order, followed by one bound row per
/// bounded variable in column order.
pub fn standardize(
    variables: &[Variable],
    constraints: &[Constraint],
    objective: Option<&Objective>,
    sink: &mut impl DiagnosticSink,
) -> StandardForm {
    let mut rows = Vec::new();
    for (index, constraint) in constraints.iter().enumerate() {
        if constraint.is_free() {
            sink.emit(Diagnostic::FreeConstraint { index });
            continue;
        }
        rows.extend(standardize_constraint(constraint));
    }
    rows.extend(variables.iter().filter_map(standardize_variable));

    let objective = match objective {
        Some(objective) => {
            if objective.sense().is_none() {
                sink.emit(Diagnostic::MissingSense);
            }
            standardize_objective(objective)
        }
        None => {
            sink.emit(Diagnostic::MissingObjective);
            StandardObjective::default()
        }
    };

    StandardForm {
        constraints: rows,
        objective,
    }
}

fn negate(coefficients: &[(Variable, f64)]) -> Vec<(Variable, f64)> {
    coefficients
        .iter()
        .map(|(variable, coef)| (variable.clone(), -coef))
        .collect()
}
