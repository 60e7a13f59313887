//! Dependency stages: cycle-tolerant topological layering
//!
//! Partitions the task collection into ordered stages so that a task appears
//! only after all of its prerequisites. Dependency entries are a hint, not a
//! hard constraint, so the engine never fails: self-references, unknown ids
//! and duplicates are normalized away before layering, and a dependency
//! cycle collapses everything still blocked into one terminal stage.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::task::Task;

/// Result of layering a task collection
#[derive(Debug)]
pub struct StagePlan<'a> {
    stages: Vec<Vec<&'a Task>>,
    cycle: bool,
}

impl<'a> StagePlan<'a> {
    /// The ordered stages. Stage `k` holds the tasks whose prerequisites are
    /// all satisfied by stages `0..k`.
    pub fn stages(&self) -> &[Vec<&'a Task>] {
        &self.stages
    }

    /// True if the terminal stage is a collapsed dependency cycle rather
    /// than a legitimately parallel group.
    pub fn has_cycle(&self) -> bool {
        self.cycle
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage index holding the task with the given id
    pub fn stage_of(&self, id: u64) -> Option<usize> {
        self.stages
            .iter()
            .position(|stage| stage.iter().any(|t| t.id == id))
    }
}

/// Layers tasks into ordered dependency stages.
///
/// Kahn's algorithm over a graph built in collection order: each round emits
/// every unassigned task with no unmet prerequisite, in collection order (the
/// only tie-break). When a round emits nothing but tasks remain, the rest is
/// a cycle or blocked behind one; it is emitted whole as the final stage.
/// Every task appears in exactly one stage, and an empty input yields an
/// empty plan.
pub fn layer(tasks: &[Task]) -> StagePlan<'_> {
    let node_count = tasks.len();

    // Nodes added in collection order, so node index == input position and
    // index-order iteration below is the documented tie-break.
    let mut graph: DiGraph<u64, ()> = DiGraph::with_capacity(node_count, node_count);
    let mut node_of: HashMap<u64, NodeIndex> = HashMap::with_capacity(node_count);
    for task in tasks {
        let idx = graph.add_node(task.id);
        node_of.insert(task.id, idx);
    }

    // Normalization: per task, drop self-references, ids absent from the
    // collection, and duplicate entries. Each surviving dependency becomes
    // one edge, so in-degrees count distinct unmet prerequisites.
    for (pos, task) in tasks.iter().enumerate() {
        let mut seen: HashSet<u64> = HashSet::new();
        for &dep in &task.deps {
            if dep == task.id || !seen.insert(dep) {
                continue;
            }
            if let Some(&dep_idx) = node_of.get(&dep) {
                graph.add_edge(dep_idx, NodeIndex::new(pos), ());
            }
        }
    }

    let mut remaining: Vec<usize> = (0..node_count)
        .map(|pos| {
            graph
                .neighbors_directed(NodeIndex::new(pos), Direction::Incoming)
                .count()
        })
        .collect();
    let mut assigned = vec![false; node_count];
    let mut unassigned = node_count;

    let mut stages: Vec<Vec<&Task>> = Vec::new();
    let mut cycle = false;

    while unassigned > 0 {
        let ready: Vec<usize> = (0..node_count)
            .filter(|&pos| !assigned[pos] && remaining[pos] == 0)
            .collect();

        if ready.is_empty() {
            // Everything left is on or behind a cycle: one terminal stage,
            // collection order preserved.
            stages.push(
                (0..node_count)
                    .filter(|&pos| !assigned[pos])
                    .map(|pos| &tasks[pos])
                    .collect(),
            );
            cycle = true;
            break;
        }

        for &pos in &ready {
            assigned[pos] = true;
            unassigned -= 1;
            for succ in graph.neighbors_directed(NodeIndex::new(pos), Direction::Outgoing) {
                remaining[succ.index()] -= 1;
            }
        }

        stages.push(ready.iter().map(|&pos| &tasks[pos]).collect());
    }

    StagePlan { stages, cycle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, deps: &[u64]) -> Task {
        let mut task = Task::new(id, format!("Quest {}", id));
        task.set_deps(deps.to_vec());
        task
    }

    fn stage_ids(plan: &StagePlan) -> Vec<Vec<u64>> {
        plan.stages()
            .iter()
            .map(|stage| stage.iter().map(|t| t.id).collect())
            .collect()
    }

    #[test]
    fn empty_input_yields_no_stages() {
        let plan = layer(&[]);
        assert!(plan.is_empty());
        assert!(!plan.has_cycle());
    }

    #[test]
    fn independent_tasks_form_one_stage_in_input_order() {
        let tasks = vec![task(7, &[]), task(2, &[]), task(5, &[])];
        let plan = layer(&tasks);

        // No ordering key beyond collection order, id order in particular
        assert_eq!(stage_ids(&plan), vec![vec![7, 2, 5]]);
    }

    #[test]
    fn linear_chain() {
        let tasks = vec![task(1, &[]), task(2, &[1]), task(3, &[2])];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1], vec![2], vec![3]]);
        assert!(!plan.has_cycle());
    }

    #[test]
    fn diamond_preserves_input_order_within_a_stage() {
        let tasks = vec![
            task(1, &[]),
            task(2, &[1]),
            task(3, &[1]),
            task(4, &[2, 3]),
        ];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn dangling_dependency_is_ignored() {
        let tasks = vec![task(1, &[99])];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1]]);
        assert!(!plan.has_cycle());
    }

    #[test]
    fn self_loop_behaves_as_if_absent() {
        let with_self = vec![task(1, &[1]), task(2, &[1])];
        let without = vec![task(1, &[]), task(2, &[1])];

        assert_eq!(stage_ids(&layer(&with_self)), stage_ids(&layer(&without)));
    }

    #[test]
    fn duplicate_deps_count_once() {
        // If the duplicate were double-counted, finishing quest 1 would
        // leave quest 2 with a phantom unmet prerequisite.
        let tasks = vec![task(1, &[]), task(2, &[1, 1, 1])];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1], vec![2]]);
    }

    #[test]
    fn cycle_collapses_into_single_terminal_stage() {
        let tasks = vec![task(1, &[2]), task(2, &[1])];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1, 2]]);
        assert!(plan.has_cycle());
    }

    #[test]
    fn tasks_blocked_behind_a_cycle_join_the_terminal_stage() {
        let tasks = vec![
            task(1, &[]),
            task(2, &[3]),
            task(3, &[2]),
            task(4, &[3]),
        ];
        let plan = layer(&tasks);

        assert_eq!(stage_ids(&plan), vec![vec![1], vec![2, 3, 4]]);
        assert!(plan.has_cycle());
    }

    #[test]
    fn stage_of_locates_each_task() {
        let tasks = vec![task(1, &[]), task(2, &[1])];
        let plan = layer(&tasks);

        assert_eq!(plan.stage_of(1), Some(0));
        assert_eq!(plan.stage_of(2), Some(1));
        assert_eq!(plan.stage_of(3), None);
    }

    #[test]
    fn layering_is_deterministic() {
        let tasks = vec![
            task(4, &[2]),
            task(2, &[]),
            task(9, &[2, 4]),
            task(1, &[7]),
            task(7, &[]),
        ];

        assert_eq!(stage_ids(&layer(&tasks)), stage_ids(&layer(&tasks)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            /// Task lists with arbitrary dep references, including
            /// self-loops, dangling ids, duplicates and cycles.
            fn arb_tasks()(deps in prop::collection::vec(
                prop::collection::vec(0u64..16, 0..5),
                0..12,
            )) -> Vec<Task> {
                deps.into_iter()
                    .enumerate()
                    .map(|(i, d)| task(i as u64, &d))
                    .collect()
            }
        }

        proptest! {
            #[test]
            fn every_task_appears_in_exactly_one_stage(tasks in arb_tasks()) {
                let plan = layer(&tasks);

                let mut seen: Vec<u64> = plan
                    .stages()
                    .iter()
                    .flatten()
                    .map(|t| t.id)
                    .collect();
                prop_assert_eq!(seen.len(), tasks.len());

                seen.sort_unstable();
                let mut expected: Vec<u64> = tasks.iter().map(|t| t.id).collect();
                expected.sort_unstable();
                prop_assert_eq!(seen, expected);
            }

            #[test]
            fn dag_layerings_are_topologically_valid(tasks in arb_tasks()) {
                let plan = layer(&tasks);
                prop_assume!(!plan.has_cycle());

                let ids: HashSet<u64> = tasks.iter().map(|t| t.id).collect();
                for t in &tasks {
                    for &dep in &t.deps {
                        if dep == t.id || !ids.contains(&dep) {
                            continue;
                        }
                        prop_assert!(plan.stage_of(dep).unwrap() < plan.stage_of(t.id).unwrap());
                    }
                }
            }

            #[test]
            fn repeated_runs_agree(tasks in arb_tasks()) {
                prop_assert_eq!(stage_ids(&layer(&tasks)), stage_ids(&layer(&tasks)));
            }
        }
    }
}
