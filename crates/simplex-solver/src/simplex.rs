use crate::diagnostic::Diagnostic;
use crate::model::Model;
use crate::solution::{ConstraintViolation, Solution, SolutionStatus};
use crate::standard::{StandardForm, standardize};
use crate::tableau::Tableau;

/// Two-phase tableau simplex solver.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Tolerance used when checking the extracted point against the model
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve `model`, writing the outcome back onto it.
    ///
    /// Values from any earlier solve are cleared first, so after a
    /// non-optimal outcome every variable and the objective read as unset.
    pub fn solve(&self, model: &mut Model) -> SolutionStatus {
        model.clear_status();

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let form = standardize(
            model.variables(),
            model.constraints(),
            model.objective(),
            &mut diagnostics,
        );
        // free constraints were already flagged when attached
        diagnostics.retain(|d| !matches!(d, Diagnostic::FreeConstraint { .. }));
        model.replace_solve_diagnostics(diagnostics);

        let mut tableau = Tableau::build(model.variables(), &form);
        let status = match self.run(&mut tableau) {
            Outcome::Optimal => SolutionStatus::Optimal(self.extract_solution(&tableau, &form, model)),
            Outcome::Infeasible => SolutionStatus::Infeasible,
            Outcome::Unbounded => SolutionStatus::Unbounded,
        };

        model.record_status(status.clone());
        status
    }

    /// Drive the tableau to a terminal state.
    fn run(&self, tableau: &mut Tableau) -> Outcome {
        let mut phase = Phase::One;
        let mut pivots = 0usize;

        loop {
            let step = match phase {
                Phase::One => self.phase1_step(tableau),
                Phase::Two => self.phase2_step(tableau),
            };

            match step {
                Step::Pivot(row, col) => {
                    log::debug!("phase {:?} pivot at ({}, {})", phase, row, col);
                    // both rules only select nonzero entries
                    tableau.apply_pivot(row, col);
                    pivots += 1;
                }
                Step::Advance => {
                    log::debug!("feasible after {} pivots", pivots);
                    phase = Phase::Two;
                }
                Step::Finish(outcome) => {
                    log::debug!("{:?} after {} pivots", outcome, pivots);
                    return outcome;
                }
            }
        }
    }

    /// Feasibility rule: pivot on the row with the most negative right-hand
    /// side and the first column negative in that row.
    fn phase1_step(&self, tableau: &Tableau) -> Step {
        let mut min_rhs = 0.0;
        let mut pivot_row = None;

        for i in 0..tableau.num_constraints() {
            let rhs = tableau.rhs(i);
            if rhs < min_rhs {
                min_rhs = rhs;
                pivot_row = Some(i);
            }
        }

        let Some(row) = pivot_row else {
            return Step::Advance;
        };

        match (0..tableau.rhs_col()).find(|&j| tableau.get(row, j) < 0.0) {
            Some(col) => Step::Pivot(row, col),
            None => Step::Finish(Outcome::Infeasible),
        }
    }

    /// Optimality rule: first column with a negative objective entry, then
    /// the minimum-ratio row among rows positive in that column.
    fn phase2_step(&self, tableau: &Tableau) -> Step {
        let obj_row = tableau.objective_row();
        let Some(col) = (0..tableau.rhs_col()).find(|&j| tableau.get(obj_row, j) < 0.0) else {
            return Step::Finish(Outcome::Optimal);
        };

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..tableau.num_constraints() {
            let val = tableau.get(i, col);
            if val > 0.0 {
                let ratio = tableau.rhs(i) / val;
                if min_row.is_none() || ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        match min_row {
            Some(row) => Step::Pivot(row, col),
            None => Step::Finish(Outcome::Unbounded),
        }
    }

    fn extract_solution(&self, tableau: &Tableau, form: &StandardForm, model: &Model) -> Solution {
        let obj_row = tableau.objective_row();
        let mut objective_value = tableau.rhs(obj_row) / tableau.denominator();
        if form.objective.negated {
            objective_value = -objective_value;
        }

        let values: Vec<Option<f64>> = (0..tableau.num_vars())
            .map(|col| basic_value(tableau, col))
            .collect();

        let violations = self.find_violations(model, &values);
        for v in &violations {
            log::warn!("{}", v.description);
        }

        Solution {
            objective_value,
            values,
            violations,
        }
    }

    /// Find which constraints are violated by the extracted point.
    /// Unresolved variables count as 0.
    fn find_violations(&self, model: &Model, values: &[Option<f64>]) -> Vec<ConstraintViolation> {
        let value_of = |col: Option<usize>| col.and_then(|c| values.get(c).copied().flatten()).unwrap_or(0.0);
        let mut violations = Vec::new();

        for (i, c) in model.constraints().iter().enumerate() {
            let lhs = c.activity(|v| value_of(model.column(v)));
            violations.extend(ConstraintViolation::check(
                format!("constraint {}", i),
                c.lower_bound(),
                c.upper_bound(),
                lhs,
                self.tolerance,
            ));
        }

        for (col, v) in model.variables().iter().enumerate() {
            violations.extend(ConstraintViolation::check(
                format!("bound {}", v.name()),
                0.0,
                v.upper_bound(),
                value_of(Some(col)),
                self.tolerance,
            ));
        }

        // Sort by violation amount (worst first)
        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        violations
    }
}

/// Value of the variable in `col` if exactly one constraint row holds a
/// nonzero entry there. Columns with several nonzeros are left unresolved
/// even when the variable is basic in a degenerate tableau.
fn basic_value(tableau: &Tableau, col: usize) -> Option<f64> {
    let mut nonzero = (0..tableau.num_rows()).filter(|&i| tableau.get(i, col) != 0.0);
    let row = nonzero.next()?;
    if nonzero.next().is_some() || row == tableau.objective_row() {
        return None;
    }
    Some(tableau.rhs(row) / tableau.get(row, col))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Optimal,
    Infeasible,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Pivot(usize, usize),
    Advance,
    Finish(Outcome),
}
