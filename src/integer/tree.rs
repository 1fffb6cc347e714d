//! Branch-and-bound search tree.
//!
//! Nodes live in a flat arena indexed by id; each child stores its parent's
//! id, so the tree is rebuilt by grouping on `parent`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::VariableBounds;

/// Processing state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Queued or awaiting a relaxation result.
    Processing,
    /// Fractional relaxation; the node was branched on.
    Bounded,
    /// Integer relaxation that became the incumbent.
    Optimal,
    /// Relaxation infeasible, or pruned because it cannot beat the incumbent.
    Infeasible,
}

/// Side of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchDirection {
    /// `x_j <= floor(value)`.
    Down,
    /// `x_j >= ceil(value)`.
    Up,
}

/// Bound added when a child node is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchDecision {
    /// 0-based variable index.
    pub variable: usize,
    /// Which side of the fractional value.
    pub direction: BranchDirection,
    /// `floor` for [`BranchDirection::Down`], `ceil` for [`BranchDirection::Up`].
    pub threshold: f64,
}

impl BranchDecision {
    /// Applies the decision to a copy of `bounds`.
    pub fn apply(&self, bounds: &[VariableBounds]) -> Vec<VariableBounds> {
        let mut bounds = bounds.to_vec();
        let b = &mut bounds[self.variable];
        match self.direction {
            BranchDirection::Down => b.upper = Some(b.upper.map_or(self.threshold, |u| u.min(self.threshold))),
            BranchDirection::Up => b.lower = b.lower.max(self.threshold),
        }
        bounds
    }
}

impl fmt::Display for BranchDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.direction {
            BranchDirection::Down => "<=",
            BranchDirection::Up => ">=",
        };
        write!(f, "x{} {} {}", self.variable + 1, op, self.threshold)
    }
}

/// A node of the search tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    /// Arena index.
    pub id: usize,
    /// Parent id (`None` for the root).
    pub parent: Option<usize>,
    /// Distance from the root.
    pub depth: usize,
    /// Per-variable bounds inherited from the parent plus `decision`.
    pub bounds: Vec<VariableBounds>,
    /// Relaxed solution, once solved.
    pub solution: Option<Vec<f64>>,
    /// Relaxation objective in the problem's own sense.
    pub objective_value: Option<f64>,
    /// Processing state.
    pub status: NodeStatus,
    /// Bound that created this node (`None` for the root).
    pub decision: Option<BranchDecision>,
}

/// Arena of [`BranchNode`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTree {
    nodes: Vec<BranchNode>,
}

impl SearchTree {
    /// Creates a tree holding only a root with the given bounds.
    pub fn with_root(bounds: Vec<VariableBounds>) -> Self {
        Self {
            nodes: vec![BranchNode {
                id: 0,
                parent: None,
                depth: 0,
                bounds,
                solution: None,
                objective_value: None,
                status: NodeStatus::Processing,
                decision: None,
            }],
        }
    }

    /// Adds a child of `parent` created by `decision`; returns its id.
    pub fn add_child(&mut self, parent: usize, decision: BranchDecision) -> usize {
        let id = self.nodes.len();
        let (depth, bounds) = {
            let p = &self.nodes[parent];
            (p.depth + 1, decision.apply(&p.bounds))
        };
        self.nodes.push(BranchNode {
            id,
            parent: Some(parent),
            depth,
            bounds,
            solution: None,
            objective_value: None,
            status: NodeStatus::Processing,
            decision: Some(decision),
        });
        id
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&BranchNode> {
        self.nodes.first()
    }

    /// Node by id.
    pub fn node(&self, id: usize) -> Option<&BranchNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: usize) -> Option<&mut BranchNode> {
        self.nodes.get_mut(id)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[BranchNode] {
        &self.nodes
    }

    /// Ids of the children of `id`, in creation order.
    pub fn children(&self, id: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.parent == Some(id))
            .map(|n| n.id)
            .collect()
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes with the given status.
    pub fn count(&self, status: NodeStatus) -> usize {
        self.nodes.iter().filter(|n| n.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_structure() {
        let mut tree = SearchTree::with_root(vec![VariableBounds::default(); 2]);
        let down = tree.add_child(
            0,
            BranchDecision {
                variable: 0,
                direction: BranchDirection::Down,
                threshold: 1.0,
            },
        );
        let up = tree.add_child(
            0,
            BranchDecision {
                variable: 0,
                direction: BranchDirection::Up,
                threshold: 2.0,
            },
        );
        let grandchild = tree.add_child(
            up,
            BranchDecision {
                variable: 1,
                direction: BranchDirection::Down,
                threshold: 2.0,
            },
        );

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.children(0), vec![down, up]);
        assert_eq!(tree.children(up), vec![grandchild]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.root().map(|n| n.parent), Some(None));

        let g = tree.node(grandchild).expect("exists");
        assert_eq!(g.bounds[0], VariableBounds::new(2.0, None));
        assert_eq!(g.bounds[1], VariableBounds::new(0.0, Some(2.0)));
        assert_eq!(tree.node(down).expect("exists").bounds[0].upper, Some(1.0));
        assert_eq!(tree.count(NodeStatus::Processing), 4);
    }

    #[test]
    fn test_down_keeps_tighter_upper() {
        let d = BranchDecision {
            variable: 0,
            direction: BranchDirection::Down,
            threshold: 5.0,
        };
        let bounds = d.apply(&[VariableBounds::new(0.0, Some(3.0))]);
        assert_eq!(bounds[0].upper, Some(3.0));
    }

    #[test]
    fn test_decision_display() {
        let d = BranchDecision {
            variable: 1,
            direction: BranchDirection::Up,
            threshold: 3.0,
        };
        assert_eq!(d.to_string(), "x2 >= 3");
    }
}
