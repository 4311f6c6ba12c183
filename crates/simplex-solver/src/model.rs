use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::error::{LpError, Result};
use crate::solution::SolutionStatus;

/// A non-negative decision variable.
///
/// Variables are created through [`Model::add_variable`] and compared by name.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    name: String,
    upper_bound: f64,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper bound on the variable's value; `f64::INFINITY` when unbounded.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn has_upper_bound(&self) -> bool {
        self.upper_bound != f64::INFINITY
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Linear constraint `lower_bound <= sum(coef * var) <= upper_bound`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    lower_bound: f64,
    upper_bound: f64,
    coefficients: Vec<(Variable, f64)>,
}

impl Constraint {
    /// Create a constraint with no coefficients.
    ///
    /// Either bound may be infinite. Fails when `lower > upper`, when a bound
    /// is NaN, or when a bound is infinite on the wrong side.
    pub fn new(lower_bound: f64, upper_bound: f64) -> Result<Self> {
        if lower_bound.is_nan() || upper_bound.is_nan() {
            return Err(LpError::NanBound);
        }
        if lower_bound > upper_bound
            || lower_bound == f64::INFINITY
            || upper_bound == f64::NEG_INFINITY
        {
            return Err(LpError::InvalidBounds {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        Ok(Self {
            lower_bound,
            upper_bound,
            coefficients: Vec::new(),
        })
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn has_lower_bound(&self) -> bool {
        self.lower_bound != f64::NEG_INFINITY
    }

    pub fn has_upper_bound(&self) -> bool {
        self.upper_bound != f64::INFINITY
    }

    /// True when neither bound is finite, i.e. the constraint restricts nothing.
    pub fn is_free(&self) -> bool {
        !self.has_lower_bound() && !self.has_upper_bound()
    }

    /// Set the coefficient for `variable`, replacing any previous value.
    pub fn set_coefficient(&mut self, variable: &Variable, value: f64) {
        upsert(&mut self.coefficients, variable, value);
    }

    pub fn with_coefficient(mut self, variable: &Variable, value: f64) -> Self {
        self.set_coefficient(variable, value);
        self
    }

    /// Coefficient of `variable`, 0 when absent.
    pub fn coefficient(&self, variable: &Variable) -> f64 {
        lookup(&self.coefficients, variable)
    }

    pub fn coefficients(&self) -> &[(Variable, f64)] {
        &self.coefficients
    }

    /// Value of the linear expression at the point given by `value_of`.
    pub fn activity(&self, value_of: impl FnMut(&Variable) -> f64) -> f64 {
        activity(&self.coefficients, value_of)
    }

    pub fn is_satisfied(&self, value_of: impl FnMut(&Variable) -> f64, tolerance: f64) -> bool {
        let lhs = self.activity(value_of);
        lhs >= self.lower_bound - tolerance && lhs <= self.upper_bound + tolerance
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Linear objective. The direction stays unset until chosen.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    coefficients: Vec<(Variable, f64)>,
    sense: Option<Sense>,
}

impl Objective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maximize<'a>(terms: impl IntoIterator<Item = (&'a Variable, f64)>) -> Self {
        let mut objective = Self::from_terms(terms);
        objective.set_maximization();
        objective
    }

    pub fn minimize<'a>(terms: impl IntoIterator<Item = (&'a Variable, f64)>) -> Self {
        let mut objective = Self::from_terms(terms);
        objective.set_minimization();
        objective
    }

    fn from_terms<'a>(terms: impl IntoIterator<Item = (&'a Variable, f64)>) -> Self {
        let mut objective = Self::new();
        for (variable, value) in terms {
            objective.set_coefficient(variable, value);
        }
        objective
    }

    pub fn set_coefficient(&mut self, variable: &Variable, value: f64) {
        upsert(&mut self.coefficients, variable, value);
    }

    pub fn with_coefficient(mut self, variable: &Variable, value: f64) -> Self {
        self.set_coefficient(variable, value);
        self
    }

    pub fn coefficient(&self, variable: &Variable) -> f64 {
        lookup(&self.coefficients, variable)
    }

    pub fn coefficients(&self) -> &[(Variable, f64)] {
        &self.coefficients
    }

    pub fn set_maximization(&mut self) {
        self.sense = Some(Sense::Maximize);
    }

    pub fn set_minimization(&mut self) {
        self.sense = Some(Sense::Minimize);
    }

    pub fn sense(&self) -> Option<Sense> {
        self.sense
    }
}

/// Handle to a constraint attached to a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns the variables, constraints and objective of one linear program,
/// along with the values written back by the last solve.
#[derive(Debug, Default)]
pub struct Model {
    variables: Vec<Variable>,
    columns: HashMap<String, usize>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    diagnostics: Vec<Diagnostic>,
    solve_diagnostics: Vec<Diagnostic>,
    status: Option<SolutionStatus>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with implicit lower bound 0.
    ///
    /// Columns are assigned in insertion order and never change.
    pub fn add_variable(&mut self, name: impl Into<String>, upper_bound: f64) -> Result<Variable> {
        let name = name.into();
        if upper_bound.is_nan() {
            return Err(LpError::NanBound);
        }
        if upper_bound < 0.0 {
            return Err(LpError::InvalidBounds {
                lower: 0.0,
                upper: upper_bound,
            });
        }
        if self.columns.contains_key(&name) {
            return Err(LpError::DuplicateVariable(name));
        }

        let variable = Variable {
            name: name.clone(),
            upper_bound,
        };
        self.columns.insert(name, self.variables.len());
        self.variables.push(variable.clone());
        Ok(variable)
    }

    /// Variables in column order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.columns.get(name).map(|&col| &self.variables[col])
    }

    pub fn column(&self, variable: &Variable) -> Option<usize> {
        self.columns.get(variable.name()).copied()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Attach a constraint. Every variable it references must belong to this model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId> {
        for (variable, _) in constraint.coefficients() {
            self.ensure_registered(variable)?;
        }
        let id = ConstraintId(self.constraints.len());
        if constraint.is_free() {
            self.diagnostics.emit(Diagnostic::FreeConstraint { index: id.0 });
        }
        self.constraints.push(constraint);
        Ok(id)
    }

    /// Set a coefficient on an attached constraint.
    pub fn set_coefficient(&mut self, id: ConstraintId, variable: &Variable, value: f64) -> Result<()> {
        self.ensure_registered(variable)?;
        let constraint = self
            .constraints
            .get_mut(id.0)
            .ok_or(LpError::UnknownConstraint(id.0))?;
        constraint.set_coefficient(variable, value);
        Ok(())
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.0)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Make `objective` the active objective, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<()> {
        for (variable, _) in objective.coefficients() {
            self.ensure_registered(variable)?;
        }
        if self.objective.is_some() {
            self.diagnostics.emit(Diagnostic::ObjectiveReplaced);
        }
        self.objective = Some(objective);
        Ok(())
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Solve with a default [`Solver`](crate::Solver).
    pub fn solve(&mut self) -> SolutionStatus {
        crate::Solver::default().solve(self)
    }

    /// Outcome of the last solve, if any.
    pub fn status(&self) -> Option<&SolutionStatus> {
        self.status.as_ref()
    }

    /// Value of `variable` at the optimum. `None` unless the last solve was
    /// optimal and the variable's column was resolved.
    pub fn solution_value(&self, variable: &Variable) -> Option<f64> {
        let solution = self.status.as_ref()?.solution()?;
        solution.value(self.column(variable)?)
    }

    /// Objective value at the optimum, `None` unless the last solve was optimal.
    pub fn objective_value(&self) -> Option<f64> {
        self.status
            .as_ref()?
            .solution()
            .map(|solution| solution.objective_value)
    }

    /// Diagnostics raised while building the model, followed by those of the
    /// last solve. Each solve replaces its own part.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .iter()
            .chain(&self.solve_diagnostics)
            .copied()
            .collect()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut taken = std::mem::take(&mut self.diagnostics);
        taken.append(&mut self.solve_diagnostics);
        taken
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn record_status(&mut self, status: SolutionStatus) {
        self.status = Some(status);
    }

    pub(crate) fn replace_solve_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.solve_diagnostics = diagnostics;
    }

    fn ensure_registered(&self, variable: &Variable) -> Result<()> {
        if self.columns.contains_key(variable.name()) {
            Ok(())
        } else {
            Err(LpError::UnknownVariable(variable.name().to_string()))
        }
    }
}

fn upsert(coefficients: &mut Vec<(Variable, f64)>, variable: &Variable, value: f64) {
    match coefficients.iter_mut().find(|(v, _)| v == variable) {
        Some(entry) => entry.1 = value,
        None => coefficients.push((variable.clone(), value)),
    }
}

fn lookup(coefficients: &[(Variable, f64)], variable: &Variable) -> f64 {
    coefficients
        .iter()
        .find(|(v, _)| v == variable)
        .map_or(0.0, |&(_, coef)| coef)
}

fn activity(coefficients: &[(Variable, f64)], mut value_of: impl FnMut(&Variable) -> f64) -> f64 {
    coefficients
        .iter()
        .map(|(variable, coef)| coef * value_of(variable))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_follow_insertion_order() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();
        let y = model.add_variable("y", 10.0).unwrap();

        assert_eq!(model.column(&x), Some(0));
        assert_eq!(model.column(&y), Some(1));
        assert_eq!(model.variable("y").map(|v| v.upper_bound()), Some(10.0));
        assert!(!x.has_upper_bound());
        assert!(y.has_upper_bound());
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let mut model = Model::new();
        model.add_variable("x", f64::INFINITY).unwrap();
        let err = model.add_variable("x", 5.0).unwrap_err();

        assert_eq!(err, LpError::DuplicateVariable("x".to_string()));
        assert_eq!(model.num_variables(), 1);
    }

    #[test]
    fn test_negative_variable_bound_rejected() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_variable("x", -1.0),
            Err(LpError::InvalidBounds { .. })
        ));
        assert_eq!(model.add_variable("y", f64::NAN).unwrap_err(), LpError::NanBound);
    }

    #[test]
    fn test_constraint_bounds_checked() {
        assert!(matches!(
            Constraint::new(5.0, 3.0),
            Err(LpError::InvalidBounds { lower, upper }) if lower == 5.0 && upper == 3.0
        ));
        assert_eq!(Constraint::new(f64::NAN, 1.0).unwrap_err(), LpError::NanBound);
        assert!(Constraint::new(f64::INFINITY, f64::INFINITY).is_err());
        assert!(Constraint::new(3.0, 3.0).is_ok());
        assert!(Constraint::new(f64::NEG_INFINITY, f64::INFINITY).unwrap().is_free());
    }

    #[test]
    fn test_set_coefficient_replaces() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();
        let y = model.add_variable("y", f64::INFINITY).unwrap();

        let mut c = Constraint::new(f64::NEG_INFINITY, 4.0).unwrap().with_coefficient(&x, 1.0);
        c.set_coefficient(&x, 2.0);

        assert_eq!(c.coefficients().len(), 1);
        assert_eq!(c.coefficient(&x), 2.0);
        assert_eq!(c.coefficient(&y), 0.0);
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let mut other = Model::new();
        let z = other.add_variable("z", f64::INFINITY).unwrap();

        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();

        let c = Constraint::new(0.0, 1.0).unwrap().with_coefficient(&z, 1.0);
        assert_eq!(
            model.add_constraint(c).unwrap_err(),
            LpError::UnknownVariable("z".to_string())
        );

        let id = model
            .add_constraint(Constraint::new(0.0, 1.0).unwrap().with_coefficient(&x, 1.0))
            .unwrap();
        assert!(model.set_coefficient(id, &z, 2.0).is_err());
        model.set_coefficient(id, &x, 3.0).unwrap();
        assert_eq!(model.constraint(id).unwrap().coefficient(&x), 3.0);

        assert!(model.set_objective(Objective::maximize([(&z, 1.0)])).is_err());
        assert!(model.objective().is_none());
    }

    #[test]
    fn test_replacing_objective_warns() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();

        model.set_objective(Objective::maximize([(&x, 1.0)])).unwrap();
        assert!(model.diagnostics().is_empty());

        model.set_objective(Objective::minimize([(&x, 2.0)])).unwrap();
        assert_eq!(model.take_diagnostics(), vec![Diagnostic::ObjectiveReplaced]);
        assert!(model.diagnostics().is_empty());

        let objective = model.objective().unwrap();
        assert_eq!(objective.sense(), Some(Sense::Minimize));
        assert_eq!(objective.coefficient(&x), 2.0);
    }

    #[test]
    fn test_free_constraint_flagged_on_add() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();

        model
            .add_constraint(Constraint::new(f64::NEG_INFINITY, 3.0).unwrap().with_coefficient(&x, 1.0))
            .unwrap();
        assert!(model.diagnostics().is_empty());

        let id = model
            .add_constraint(Constraint::new(f64::NEG_INFINITY, f64::INFINITY).unwrap())
            .unwrap();
        assert_eq!(model.diagnostics(), vec![Diagnostic::FreeConstraint { index: id.index() }]);
        assert_eq!(model.num_constraints(), 2);
    }

    #[test]
    fn test_objective_sense_unset_by_default() {
        let objective = Objective::new();
        assert_eq!(objective.sense(), None);
    }

    #[test]
    fn test_constraint_activity() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();
        let y = model.add_variable("y", f64::INFINITY).unwrap();
        let c = Constraint::new(60.0, 80.0)
            .unwrap()
            .with_coefficient(&x, 1.0)
            .with_coefficient(&y, 1.0);

        let point = |v: &Variable| if v.name() == "x" { 50.0 } else { 30.0 };
        assert_eq!(c.activity(point), 80.0);
        assert!(c.is_satisfied(point, 1e-9));
        assert!(!c.is_satisfied(|_| 50.0, 1e-9));
    }

    #[test]
    fn test_variables_equal_by_name() {
        let mut a = Model::new();
        let mut b = Model::new();
        let x1 = a.add_variable("x", 1.0).unwrap();
        let x2 = b.add_variable("x", 2.0).unwrap();
        assert_eq!(x1, x2);
    }
}
