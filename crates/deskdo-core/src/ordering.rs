//! Per-group ordering helpers shared by the stores and the migration.

use crate::task::Task;

/// Indices into `tasks` of the members of `group`, by ascending `order`.
/// Ties keep their position in `tasks`.
pub fn members_in_order(tasks: &[Task], group: &str) -> Vec<usize> {
    let mut members: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.group == group)
        .map(|(i, _)| i)
        .collect();
    members.sort_by_key(|&i| (tasks[i].order, i));
    members
}

/// Rewrite the orders of `group` to `0..k-1`, keeping their relative ranking.
pub fn renumber_group(tasks: &mut [Task], group: &str) {
    let members = members_in_order(tasks, group);
    for (rank, i) in members.into_iter().enumerate() {
        tasks[i].order = rank;
    }
}

/// Group names referenced by `tasks`, in order of first appearance.
pub fn groups_in_use(tasks: &[Task]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for task in tasks {
        if !names.iter().any(|n| *n == task.group) {
            names.push(task.group.clone());
        }
    }
    names
}

/// True when the orders of `group` are exactly `{0, .., k-1}`.
pub fn is_contiguous(tasks: &[Task], group: &str) -> bool {
    let mut orders: Vec<usize> = tasks
        .iter()
        .filter(|t| t.group == group)
        .map(|t| t.order)
        .collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(rank, &order)| rank == order)
}
