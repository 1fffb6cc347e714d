//! Linear programming solvers.
//!
//! - [`corner_point`] — Vertex enumeration for two-variable LPs, O(L² m)
//! - [`tableau`] — Big-M simplex tableau construction and pivoting
//! - [`simplex`] — Simplex driver with pivot trace
//! - [`duality`] — Primal → dual transformation and strong-duality check

pub mod corner_point;
pub mod duality;
pub mod simplex;
pub mod tableau;

pub use corner_point::{solve_corner_points, solve_graphical, CornerPointResult};
pub use duality::{solve_duality, DualProblem, DualityReport, LinearSolution, SignRestriction};
pub use simplex::{solve_simplex, SimplexConfig, SimplexIteration, SimplexOutcome};
pub use tableau::{ColumnKind, Tableau};
