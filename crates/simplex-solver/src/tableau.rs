use std::collections::HashMap;

use crate::error::{LpError, Result};
use crate::model::Variable;
use crate::standard::StandardForm;

/// Dense simplex tableau.
///
/// Shape is `(m + 1) x (n + m + 2)`: `n` decision columns, an `(m + 1)`
/// identity block (one column per row, the objective row included) and the
/// right-hand side. The last row is the objective row; its identity cell
/// holds the running normalization denominator used by [`Tableau::pivot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    n_vars: usize,
}

impl Tableau {
    /// Assemble the initial tableau. `variables` fixes the column order.
    pub fn build(variables: &[Variable], form: &StandardForm) -> Self {
        let n_vars = variables.len();
        let n_rows = form.num_rows();
        let total_cols = n_vars + n_rows + 2;
        let rhs_col = total_cols - 1;

        let columns: HashMap<&str, usize> = variables
            .iter()
            .enumerate()
            .map(|(j, v)| (v.name(), j))
            .collect();

        let mut data = vec![vec![0.0; total_cols]; n_rows + 1];

        for (i, constraint) in form.constraints.iter().enumerate() {
            for (variable, coef) in &constraint.coefficients {
                if let Some(&j) = columns.get(variable.name()) {
                    data[i][j] = *coef;
                }
            }
            data[i][rhs_col] = constraint.upper_bound;
        }

        // Objective row stores -c; optimal once every entry is >= 0
        let obj_row = n_rows;
        for (variable, coef) in &form.objective.coefficients {
            if let Some(&j) = columns.get(variable.name()) {
                data[obj_row][j] = -coef;
            }
        }

        for (i, row) in data.iter_mut().enumerate() {
            row[n_vars + i] = 1.0;
        }

        log::trace!(
            "built tableau with {} decision columns and {} constraint rows",
            n_vars,
            n_rows
        );

        Self { data, n_vars }
    }

    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    pub fn num_cols(&self) -> usize {
        self.data[0].len()
    }

    pub fn num_vars(&self) -> usize {
        self.n_vars
    }

    /// Number of standardized constraint rows (the objective row excluded).
    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    pub fn objective_row(&self) -> usize {
        self.data.len() - 1
    }

    pub fn rhs_col(&self) -> usize {
        self.num_cols() - 1
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_col()]
    }

    /// Current normalization denominator: the objective row's identity cell.
    pub fn denominator(&self) -> f64 {
        let obj_row = self.objective_row();
        self.data[obj_row][self.num_cols() - 2]
    }

    /// Scaled Gauss-Jordan pivot on `(row, col)`.
    ///
    /// The pivot row is multiplied by the sign `s` of the pivot entry. Every
    /// other row becomes `s * (p * row_i - a_ic * row_r) / d` where `p` is the
    /// (now positive) pivot entry and `d` the denominator before the pivot.
    /// Afterwards column `col` is zero outside `row` and `p` is the new
    /// denominator.
    ///
    /// Fails without touching the tableau when `(row, col)` is outside the
    /// tableau or the entry there is zero.
    pub fn pivot(&mut self, row: usize, col: usize) -> Result<()> {
        let entry = self
            .data
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(LpError::PivotOutOfRange { row, col })?;
        if *entry == 0.0 {
            return Err(LpError::ZeroPivot { row, col });
        }
        self.apply_pivot(row, col);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_rows(data: Vec<Vec<f64>>, n_vars: usize) -> Self {
        Self { data, n_vars }
    }

    /// [`Tableau::pivot`] without the checks.
    pub(crate) fn apply_pivot(&mut self, row: usize, col: usize) {
        let sign = self.data[row][col].signum();
        let denom = self.denominator();

        for x in self.data[row].iter_mut() {
            *x *= sign;
        }

        let pivot_row = self.data[row].clone();
        let p = pivot_row[col];

        for (i, current) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = current[col];
            for (x, &r) in current.iter_mut().zip(&pivot_row) {
                *x = sign * (p * *x - factor * r) / denom;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, Model, Objective};
    use crate::diagnostic::LogSink;
    use crate::standard::standardize;

    fn scenario_b() -> Tableau {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();
        let y = model.add_variable("y", f64::INFINITY).unwrap();
        let constraints = vec![
            Constraint::new(f64::NEG_INFINITY, 480.0).unwrap().with_coefficient(&x, 5.0).with_coefficient(&y, 15.0),
            Constraint::new(f64::NEG_INFINITY, 160.0).unwrap().with_coefficient(&x, 4.0).with_coefficient(&y, 4.0),
            Constraint::new(f64::NEG_INFINITY, 1190.0).unwrap().with_coefficient(&x, 35.0).with_coefficient(&y, 20.0),
        ];
        let objective = Objective::maximize([(&x, 13.0), (&y, 23.0)]);
        let form = standardize(model.variables(), &constraints, Some(&objective), &mut LogSink);
        Tableau::build(model.variables(), &form)
    }

    #[test]
    fn test_build_layout() {
        let t = scenario_b();

        assert_eq!(t.num_rows(), 4);
        assert_eq!(t.num_cols(), 2 + 3 + 2);
        assert_eq!(t.row(0), &[5.0, 15.0, 1.0, 0.0, 0.0, 0.0, 480.0]);
        assert_eq!(t.row(1), &[4.0, 4.0, 0.0, 1.0, 0.0, 0.0, 160.0]);
        assert_eq!(t.row(2), &[35.0, 20.0, 0.0, 0.0, 1.0, 0.0, 1190.0]);
        assert_eq!(t.row(3), &[-13.0, -23.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(t.denominator(), 1.0);
    }

    #[test]
    fn test_build_empty_program() {
        let t = Tableau::build(&[], &StandardForm::default());
        assert_eq!(t.num_rows(), 1);
        assert_eq!(t.row(0), &[1.0, 0.0]);
        assert_eq!(t.denominator(), 1.0);
    }

    #[test]
    fn test_pivot_clears_column() {
        let mut t = scenario_b();
        t.pivot(0, 1).unwrap();

        assert_eq!(t.get(0, 1), 15.0);
        for i in 1..t.num_rows() {
            assert_eq!(t.get(i, 1), 0.0, "row {}", i);
        }
        assert_eq!(t.denominator(), 15.0);
        // 4*(15) - 4*(5) = 40 in row 1, column 0
        assert_eq!(t.get(1, 0), 40.0);
        assert_eq!(t.rhs(1), 15.0 * 160.0 - 4.0 * 480.0);
    }

    #[test]
    fn test_pivot_with_negative_entry_flips_signs() {
        let mut model = Model::new();
        let x = model.add_variable("x", f64::INFINITY).unwrap();
        let constraints = vec![
            Constraint::new(2.0, f64::INFINITY).unwrap().with_coefficient(&x, 1.0),
            Constraint::new(f64::NEG_INFINITY, 5.0).unwrap().with_coefficient(&x, 1.0),
        ];
        let objective = Objective::maximize([(&x, 1.0)]);
        let form = standardize(model.variables(), &constraints, Some(&objective), &mut LogSink);
        let mut t = Tableau::build(model.variables(), &form);

        t.pivot(0, 0).unwrap();

        assert_eq!(t.row(0), &[1.0, -1.0, 0.0, 0.0, 2.0]);
        assert_eq!(t.row(1), &[0.0, -1.0, -1.0, 0.0, -3.0]);
        assert_eq!(t.row(2), &[0.0, 1.0, 0.0, -1.0, -2.0]);
        assert_eq!(t.denominator(), -1.0);
    }

    #[test]
    fn test_repeated_pivot_is_noop() {
        let mut t = scenario_b();
        t.pivot(1, 0).unwrap();
        let once = t.clone();
        t.pivot(1, 0).unwrap();

        for i in 0..t.num_rows() {
            for j in 0..t.num_cols() {
                assert!(
                    (t.get(i, j) - once.get(i, j)).abs() < 1e-9,
                    "({}, {}): {} vs {}",
                    i,
                    j,
                    t.get(i, j),
                    once.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_out_of_range_pivot_rejected() {
        let mut t = Tableau::build(&[], &StandardForm::default());
        let before = t.clone();
        assert_eq!(t.pivot(3, 0), Err(LpError::PivotOutOfRange { row: 3, col: 0 }));
        assert_eq!(t.pivot(0, 2), Err(LpError::PivotOutOfRange { row: 0, col: 2 }));
        assert_eq!(t, before);
    }

    #[test]
    fn test_zero_pivot_rejected() {
        let mut t = scenario_b();
        let before = t.clone();
        assert_eq!(t.pivot(0, 3), Err(LpError::ZeroPivot { row: 0, col: 3 }));
        assert_eq!(t, before);
    }
}
