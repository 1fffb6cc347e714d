//! Travelling salesman heuristics.
//!
//! - [`nearest_neighbor`] — Greedy construction from city 0, O(n²)
//! - [`two_opt`] — Segment-reversal improvement

mod instance;
pub mod nearest_neighbor;
pub mod two_opt;

pub use instance::{Tour, TourStep, TspInstance};
pub use nearest_neighbor::nearest_neighbor;
pub use two_opt::two_opt_improve;
