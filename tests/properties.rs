//! Property-based tests across the solver family.
//!
//! - Corner-point and simplex agree on two-variable LPs
//! - Transportation allocations stay balanced and MODI never raises cost
//! - Strong duality on bounded feasible LPs
//! - Knapsack DP matches exhaustive enumeration
//! - Branch-and-bound matches a brute-force grid and terminates on
//!   right-hand sides a few 1e-10 away from integers
//! - Nearest-neighbor tours are closed permutations

use proptest::collection::vec;
use proptest::prelude::*;

use u_mathprog::error::SolveStatus;
use u_mathprog::integer::{branch_and_bound, BranchAndBoundConfig, IntegerProgram};
use u_mathprog::knapsack::{solve_knapsack, Item, KnapsackInstance};
use u_mathprog::linear::{solve_duality, solve_graphical, solve_simplex, SimplexConfig};
use u_mathprog::models::{Constraint, LpProblem, Objective};
use u_mathprog::transportation::{
    least_cost, modi_optimize, northwest_corner, solve_transportation, vogel, ModiConfig,
    TransportationProblem,
};
use u_mathprog::tsp::{nearest_neighbor, two_opt_improve, TspInstance};

fn le_rows(rows: &[(u32, u32, u32)]) -> Vec<Constraint> {
    rows.iter()
        .map(|&(a, b, r)| Constraint::le(vec![a as f64, b as f64], r as f64))
        .collect()
}

fn transport_strategy() -> impl Strategy<Value = TransportationProblem> {
    (1usize..=4, 1usize..=4)
        .prop_flat_map(|(m, n)| (vec(0u32..30, m), vec(0u32..30, n), vec(vec(1u32..20, n), m)))
        .prop_map(|(supply, demand, costs)| {
            let mut supply: Vec<f64> = supply.into_iter().map(f64::from).collect();
            let mut demand: Vec<f64> = demand.into_iter().map(f64::from).collect();
            let diff = supply.iter().sum::<f64>() - demand.iter().sum::<f64>();
            if diff > 0.0 {
                if let Some(last) = demand.last_mut() {
                    *last += diff;
                }
            } else if let Some(last) = supply.last_mut() {
                *last -= diff;
            }
            let costs = costs
                .into_iter()
                .map(|row| row.into_iter().map(f64::from).collect())
                .collect();
            TransportationProblem::new(supply, demand, costs).expect("balanced by construction")
        })
}

mod linear_properties {
    use super::*;

    proptest! {
        #[test]
        fn corner_point_matches_simplex(
            c1 in 1u32..=10,
            c2 in 1u32..=10,
            rows in vec((1u32..=10, 1u32..=10, 1u32..=50), 1..=4),
            lower in proptest::option::of((0u32..=5, 0u32..=5, 0u32..=10)),
        ) {
            let mut constraints = le_rows(&rows);
            if let Some((a, b, r)) = lower {
                constraints.push(Constraint::ge(vec![a as f64, b as f64], r as f64));
            }
            let lp = LpProblem::new(Objective::maximize(vec![c1 as f64, c2 as f64]), constraints)
                .expect("valid");

            let graphical = solve_graphical(&lp).expect("solve");
            let simplex = solve_simplex(&lp, &SimplexConfig::default()).expect("solve");

            if graphical.status == SolveStatus::Optimal {
                prop_assert_eq!(simplex.status, SolveStatus::Optimal);
                prop_assert!(simplex.is_feasible());
                let a = graphical.objective_value.expect("value");
                let b = simplex.objective_value.expect("value");
                prop_assert!((a - b).abs() < 1e-3, "corner {} vs simplex {}", a, b);
            } else {
                prop_assert_eq!(graphical.status, SolveStatus::Infeasible);
                prop_assert!(!(simplex.status == SolveStatus::Optimal && simplex.is_feasible()));
            }
        }

        #[test]
        fn strong_duality_holds(
            n in 1usize..=3,
            m in 1usize..=3,
            seed in vec(1u32..=10, 9),
            c in vec(1u32..=10, 3),
            b in vec(1u32..=50, 3),
        ) {
            let constraints: Vec<Constraint> = (0..m)
                .map(|i| Constraint::le(
                    (0..n).map(|j| seed[i * 3 + j] as f64).collect(),
                    b[i] as f64,
                ))
                .collect();
            let objective = Objective::maximize(c[..n].iter().map(|&v| v as f64).collect());
            let lp = LpProblem::new(objective, constraints).expect("valid");

            let report = solve_duality(&lp, &SimplexConfig::default()).expect("solve");
            prop_assert_eq!(report.primal.status, SolveStatus::Optimal);
            prop_assert_eq!(report.dual.status, SolveStatus::Optimal);
            prop_assert!(report.objectives_match);
            let gap = report.duality_gap.expect("both optimal");
            prop_assert!(gap.abs() < 1e-3);
        }
    }
}

mod transportation_properties {
    use super::*;

    proptest! {
        #[test]
        fn initial_solutions_are_balanced(problem in transport_strategy()) {
            for s in [northwest_corner(&problem), least_cost(&problem), vogel(&problem)] {
                prop_assert!(problem.is_balanced_allocation(&s.allocation, 1e-4), "{:?}", s.method);
                prop_assert!((s.cost - problem.total_cost(&s.allocation)).abs() < 1e-9);
            }
        }

        #[test]
        fn modi_never_increases_cost(problem in transport_strategy()) {
            for start in [northwest_corner(&problem), least_cost(&problem), vogel(&problem)] {
                let result = modi_optimize(&problem, &start.allocation, &ModiConfig::default());
                let mut previous = start.cost;
                for step in &result.steps {
                    prop_assert!(step.cost_after <= previous + 1e-6);
                    previous = step.cost_after;
                }
                prop_assert!(problem.is_balanced_allocation(&result.allocation, 1e-4));
                prop_assert!(result.cost <= start.cost + 1e-6);
            }
        }

        #[test]
        fn optimum_not_above_any_initial(problem in transport_strategy()) {
            let solution = solve_transportation(&problem, &ModiConfig::default()).expect("solve");
            prop_assert!(problem.is_balanced_allocation(&solution.optimal.allocation, 1e-4));
            for initial in &solution.initial_solutions {
                prop_assert!(solution.optimal.cost <= initial.cost + 1e-6);
            }
        }
    }
}

mod combinatorial_properties {
    use super::*;

    proptest! {
        #[test]
        fn knapsack_matches_enumeration(
            capacity in 0usize..40,
            raw in vec((0usize..15, 0u64..100), 0..=12),
        ) {
            let items: Vec<Item> = raw.iter().map(|&(w, v)| Item::new(w, v)).collect();
            let instance = KnapsackInstance::new(capacity, items.clone());
            let solution = solve_knapsack(&instance).expect("solve");

            let mut best = 0u64;
            for mask in 0u32..(1 << items.len()) {
                let chosen: Vec<usize> = (0..items.len()).filter(|&i| mask & (1 << i) != 0).collect();
                if instance.weight_of(&chosen) <= capacity {
                    best = best.max(instance.value_of(&chosen));
                }
            }

            prop_assert_eq!(solution.max_value, best);
            prop_assert!(instance.weight_of(&solution.selected_items) <= capacity);
            prop_assert_eq!(instance.value_of(&solution.selected_items), solution.max_value);
            prop_assert!(solution.selected_items.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(solution.dp_table.len(), items.len() + 1);
        }

        #[test]
        fn branch_and_bound_matches_grid(
            c1 in 1u32..=10,
            c2 in 1u32..=10,
            rows in vec((1u32..=10, 1u32..=10, 1u32..=40), 1..=3),
        ) {
            let lp = LpProblem::new(Objective::maximize(vec![c1 as f64, c2 as f64]), le_rows(&rows))
                .expect("valid");
            let program = IntegerProgram::all_integer(lp.clone());
            let result = branch_and_bound(&program, &BranchAndBoundConfig::default()).expect("solve");

            prop_assert_eq!(result.status, SolveStatus::Optimal);
            let x = result.solution.expect("solution");
            prop_assert!(x.iter().all(|v| (v - v.round()).abs() < 1e-9));
            prop_assert!(lp.is_feasible(&x, 1e-9));

            let mut best = f64::NEG_INFINITY;
            for a in 0..=40u32 {
                for b in 0..=40u32 {
                    let point = [a as f64, b as f64];
                    if lp.is_feasible(&point, 1e-9) {
                        best = best.max(lp.objective().value(&point));
                    }
                }
            }
            let value = result.objective_value.expect("value");
            prop_assert!(value >= best - 1e-6, "b&b {} < grid {}", value, best);
        }

        #[test]
        fn branch_and_bound_terminates_on_near_integer_rhs(
            c1 in 1u32..=10,
            c2 in 1u32..=10,
            rows in vec((1u32..=10, 1u32..=10, 1u32..=40, -3i32..=3), 1..=3),
        ) {
            let constraints: Vec<Constraint> = rows
                .iter()
                .map(|&(a, b, r, k)| {
                    Constraint::le(vec![a as f64, b as f64], r as f64 + k as f64 * 1e-10)
                })
                .collect();
            let lp = LpProblem::new(Objective::maximize(vec![c1 as f64, c2 as f64]), constraints)
                .expect("valid");
            let program = IntegerProgram::all_integer(lp.clone());
            let config = BranchAndBoundConfig::default().with_max_nodes(20_000);
            let result = branch_and_bound(&program, &config).expect("solve");

            prop_assert_eq!(result.status, SolveStatus::Optimal);
            let x = result.solution.expect("solution");
            prop_assert!(x.iter().all(|v| (v - v.round()).abs() < 1e-9));
            prop_assert!(lp.is_feasible(&x, 1e-9));
        }

        #[test]
        fn nearest_neighbor_tour_is_closed_permutation(
            n in 1usize..=7,
            raw in vec(0u32..100, 49),
        ) {
            let distances: Vec<Vec<f64>> = (0..n)
                .map(|i| (0..n).map(|j| if i == j { 0.0 } else { raw[i * 7 + j] as f64 }).collect())
                .collect();
            let instance = TspInstance::from_distances(distances).expect("valid");
            let tour = nearest_neighbor(&instance);

            prop_assert_eq!(tour.path.len(), n + 1);
            prop_assert_eq!(tour.path[0], 0);
            prop_assert_eq!(tour.path[n], 0);
            let mut cities = tour.path[..n].to_vec();
            cities.sort_unstable();
            prop_assert_eq!(cities, (0..n).collect::<Vec<_>>());

            let sum: f64 = tour.steps.iter().map(|s| s.distance).sum();
            prop_assert!((tour.total_distance - sum).abs() < 1e-9);
            prop_assert!((tour.total_distance - instance.path_length(&tour.path)).abs() < 1e-9);

            let improved = two_opt_improve(&tour, &instance);
            prop_assert!(improved.total_distance <= tour.total_distance + 1e-9);
            prop_assert_eq!(improved.path.len(), n + 1);
        }
    }
}
