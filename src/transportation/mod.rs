//! Balanced transportation problems.
//!
//! - [`northwest`] — Northwest-Corner rule, O(m + n)
//! - [`least_cost`] — Matrix-minimum method
//! - [`vogel`] — Vogel's Approximation Method
//! - [`modi`] — u-v optimization with stepping-stone cycles
//! - [`solver`] — All three heuristics followed by MODI

pub mod least_cost;
pub mod modi;
pub mod northwest;
mod problem;
pub mod solver;
pub mod vogel;

pub use least_cost::least_cost;
pub use modi::{modi_optimize, Cell, ModiConfig, ModiResult, ModiStep, ModiTermination};
pub use northwest::northwest_corner;
pub use problem::{InitialMethod, InitialSolution, TransportationProblem, TRANSPORT_TOLERANCE};
pub use solver::{solve_transportation, OptimalTransport, TransportationSolution};
pub use vogel::vogel;
