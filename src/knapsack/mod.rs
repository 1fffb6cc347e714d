//! 0/1 knapsack by dynamic programming.
//!
//! # Algorithm
//!
//! `table[i][w]` is the best value using the first `i` items within
//! capacity `w`. Item `i - 1` is taken when it fits and strictly beats
//! leaving it out. The chosen items are recovered by walking back from
//! `(n, capacity)`.
//!
//! # Complexity
//!
//! O(n · capacity) time and space.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolveError, SolveResult};

/// An item with an integer weight and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Weight consumed from the capacity.
    pub weight: usize,
    /// Value gained when packed.
    pub value: u64,
}

impl Item {
    /// Creates an item.
    pub fn new(weight: usize, value: u64) -> Self {
        Self { weight, value }
    }
}

/// Knapsack capacity and candidate items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackInstance {
    /// Maximum total weight.
    pub capacity: usize,
    /// Items in input order.
    pub items: Vec<Item>,
}

impl KnapsackInstance {
    /// Creates an instance.
    pub fn new(capacity: usize, items: Vec<Item>) -> Self {
        Self { capacity, items }
    }

    /// Total weight of the items at `indices`.
    pub fn weight_of(&self, indices: &[usize]) -> usize {
        indices.iter().filter_map(|&i| self.items.get(i)).map(|it| it.weight).sum()
    }

    /// Total value of the items at `indices`.
    pub fn value_of(&self, indices: &[usize]) -> u64 {
        indices.iter().filter_map(|&i| self.items.get(i)).map(|it| it.value).sum()
    }
}

/// Result of [`solve_knapsack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackSolution {
    /// Best attainable value.
    pub max_value: u64,
    /// Indices of packed items, ascending.
    pub selected_items: Vec<usize>,
    /// `(items + 1) × (capacity + 1)` value table.
    pub dp_table: Vec<Vec<u64>>,
}

/// Solves the 0/1 knapsack problem.
///
/// A zero capacity or an empty item list yields value 0 and no selection.
///
/// # Errors
///
/// [`SolveError::InvalidInput`] if a partial value sum overflows `u64`.
///
/// # Examples
///
/// ```
/// use u_mathprog::knapsack::{solve_knapsack, Item, KnapsackInstance};
///
/// let instance = KnapsackInstance::new(
///     10,
///     vec![Item::new(5, 10), Item::new(4, 40), Item::new(6, 30), Item::new(3, 50)],
/// );
/// let solution = solve_knapsack(&instance).unwrap();
/// assert_eq!(solution.max_value, 90);
/// assert_eq!(solution.selected_items, vec![1, 3]);
/// ```
pub fn solve_knapsack(instance: &KnapsackInstance) -> SolveResult<KnapsackSolution> {
    let n = instance.items.len();
    let cap = instance.capacity;
    let width = cap
        .checked_add(1)
        .ok_or_else(|| SolveError::invalid("knapsack capacity too large for a DP table"))?;
    let mut table = vec![vec![0u64; width]; n + 1];
    let mut keep = vec![vec![false; width]; n + 1];

    for (i, item) in instance.items.iter().enumerate() {
        let (done, rest) = table.split_at_mut(i + 1);
        let prev = &done[i];
        let row = &mut rest[0];
        for w in 0..=cap {
            let exclude = prev[w];
            row[w] = exclude;
            if item.weight <= w {
                let include = prev[w - item.weight]
                    .checked_add(item.value)
                    .ok_or_else(|| SolveError::invalid("knapsack value overflows u64"))?;
                if include > exclude {
                    row[w] = include;
                    keep[i + 1][w] = true;
                }
            }
        }
    }

    // Zero-weight items can still be marked at w == 0, so the walk covers every row.
    let mut selected_items = Vec::new();
    let mut w = cap;
    for i in (1..=n).rev() {
        if keep[i][w] {
            selected_items.push(i - 1);
            w -= instance.items[i - 1].weight;
        }
    }
    selected_items.reverse();

    let max_value = table[n][cap];
    debug!(items = n, capacity = cap, max_value, selected = selected_items.len(), "knapsack solved");
    Ok(KnapsackSolution {
        max_value,
        selected_items,
        dp_table: table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> KnapsackInstance {
        KnapsackInstance::new(
            10,
            vec![Item::new(5, 10), Item::new(4, 40), Item::new(6, 30), Item::new(3, 50)],
        )
    }

    #[test]
    fn test_scenario() {
        let inst = scenario();
        let sol = solve_knapsack(&inst).expect("solve");
        assert_eq!(sol.max_value, 90);
        assert_eq!(sol.selected_items, vec![1, 3]);
        assert_eq!(inst.weight_of(&sol.selected_items), 7);
        assert_eq!(inst.value_of(&sol.selected_items), 90);
    }

    #[test]
    fn test_table_shape_and_rows() {
        let sol = solve_knapsack(&scenario()).expect("solve");
        assert_eq!(sol.dp_table.len(), 5);
        assert!(sol.dp_table.iter().all(|row| row.len() == 11));
        assert!(sol.dp_table[0].iter().all(|&v| v == 0));
        // First item only: value 10 from capacity 5 upward.
        assert_eq!(sol.dp_table[1][4], 0);
        assert_eq!(sol.dp_table[1][5], 10);
        // Items 0..2 within 9: 10 + 40.
        assert_eq!(sol.dp_table[2][9], 50);
    }

    #[test]
    fn test_zero_capacity() {
        let inst = KnapsackInstance::new(0, vec![Item::new(1, 5)]);
        let sol = solve_knapsack(&inst).expect("solve");
        assert_eq!(sol.max_value, 0);
        assert!(sol.selected_items.is_empty());
        assert_eq!(sol.dp_table, vec![vec![0], vec![0]]);
    }

    #[test]
    fn test_no_items() {
        let sol = solve_knapsack(&KnapsackInstance::new(5, vec![])).expect("solve");
        assert_eq!(sol.max_value, 0);
        assert!(sol.selected_items.is_empty());
        assert_eq!(sol.dp_table.len(), 1);
    }

    #[test]
    fn test_tie_prefers_exclusion() {
        // Equal values: the later item is only taken when strictly better.
        let inst = KnapsackInstance::new(3, vec![Item::new(3, 7), Item::new(3, 7)]);
        let sol = solve_knapsack(&inst).expect("solve");
        assert_eq!(sol.max_value, 7);
        assert_eq!(sol.selected_items, vec![0]);
    }

    #[test]
    fn test_zero_weight_item() {
        let inst = KnapsackInstance::new(2, vec![Item::new(0, 4), Item::new(2, 3)]);
        let sol = solve_knapsack(&inst).expect("solve");
        assert_eq!(sol.max_value, 7);
        assert_eq!(sol.selected_items, vec![0, 1]);
    }

    #[test]
    fn test_max_capacity_rejected() {
        let instance = KnapsackInstance::new(usize::MAX, vec![Item::new(1, 1)]);
        assert!(matches!(
            solve_knapsack(&instance),
            Err(SolveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_value_overflow() {
        let inst = KnapsackInstance::new(2, vec![Item::new(1, u64::MAX), Item::new(1, 1)]);
        assert!(solve_knapsack(&inst).is_err());
    }
}
