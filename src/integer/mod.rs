//! Integer programming.
//!
//! - [`branch_and_bound`] — LP-based branch-and-bound, breadth-first
//! - [`tree`] — Search-tree arena with parent links

pub mod branch_and_bound;
pub mod tree;

pub use branch_and_bound::{branch_and_bound, BranchAndBoundConfig, BranchAndBoundResult, IntegerProgram, NodeLog};
pub use tree::{BranchDecision, BranchDirection, BranchNode, NodeStatus, SearchTree};
