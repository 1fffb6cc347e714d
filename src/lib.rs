//! # u-mathprog
//!
//! Mathematical programming solvers: linear programming (graphical,
//! Big-M simplex, duality), transportation problems, branch-and-bound
//! integer programming, 0/1 knapsack and TSP heuristics.
//!
//! ## Modules
//!
//! - [`error`] — Error type and solve status shared by all solvers
//! - [`matrix`] — Dense row-major matrix
//! - [`models`] — Linear program model types (objective, constraints, bounds)
//! - [`linear`] — Corner-point LP, simplex tableau engine, LP duality
//! - [`transportation`] — Northwest-Corner, Least-Cost, Vogel and MODI
//! - [`integer`] — Branch-and-bound with search-tree recording
//! - [`knapsack`] — 0/1 knapsack dynamic program
//! - [`tsp`] — Nearest-neighbor construction and 2-opt improvement

pub mod error;
pub mod integer;
pub mod knapsack;
pub mod linear;
pub mod matrix;
pub mod models;
pub mod transportation;
pub mod tsp;
