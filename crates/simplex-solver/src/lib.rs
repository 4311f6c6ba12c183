//! Two-phase tableau simplex solver for linear programs.
//!
//! Build a [`Model`] from non-negative [`Variable`]s, bounded [`Constraint`]s
//! and an [`Objective`], then call [`Model::solve`]:
//!
//! ```
//! use simplex_solver::{Constraint, Model, Objective};
//!
//! let mut model = Model::new();
//! let x = model.add_variable("x", f64::INFINITY).unwrap();
//! let y = model.add_variable("y", f64::INFINITY).unwrap();
//!
//! model.add_constraint(
//!     Constraint::new(f64::NEG_INFINITY, 160.0).unwrap()
//!         .with_coefficient(&x, 4.0)
//!         .with_coefficient(&y, 4.0),
//! ).unwrap();
//! model.add_constraint(
//!     Constraint::new(f64::NEG_INFINITY, 480.0).unwrap()
//!         .with_coefficient(&x, 5.0)
//!         .with_coefficient(&y, 15.0),
//! ).unwrap();
//! model.set_objective(Objective::maximize([(&x, 13.0), (&y, 23.0)])).unwrap();
//!
//! assert!(model.solve().is_optimal());
//! assert_eq!(model.objective_value(), Some(800.0));
//! ```

mod diagnostic;
mod error;
mod model;
mod simplex;
mod solution;
pub mod standard;
pub mod tableau;

pub use diagnostic::{Diagnostic, DiagnosticSink, LogSink};
pub use error::{LpError, Result};
pub use model::{Constraint, ConstraintId, Model, Objective, Sense, Variable};
pub use simplex::Solver;
pub use solution::{ConstraintViolation, Solution, SolutionStatus, StatusKind};
