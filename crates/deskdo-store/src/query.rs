//! Read-only views over the task list.

use crate::error::StoreError;
use deskdo_core::{Task, TaskId};
use serde::Serialize;

/// Minimum length of an id prefix typed by a user.
pub const MIN_PREFIX_LEN: usize = 4;

/// Counts shown in the status line of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

pub fn group_stats(tasks: &[Task], group: &str) -> GroupStats {
    let mut stats = GroupStats::default();
    for task in tasks.iter().filter(|t| t.group == group) {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
    }
    stats
}

/// Resolve a full id or a unique prefix of one.
///
/// An exact match always wins, so short legacy ids stay addressable.
pub fn resolve_id(tasks: &[Task], prefix: &str) -> Result<TaskId, StoreError> {
    let prefix = prefix.trim();
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == prefix) {
        return Ok(task.id.clone());
    }
    if prefix.chars().count() < MIN_PREFIX_LEN {
        return Err(StoreError::Validation(format!(
            "task id prefix must be at least {} characters",
            MIN_PREFIX_LEN
        )));
    }
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(prefix)).collect();
    match matches.as_slice() {
        [] => Err(StoreError::TaskNotFound(prefix.to_string())),
        [task] => Ok(task.id.clone()),
        many => Err(StoreError::AmbiguousPrefix {
            prefix: prefix.to_string(),
            count: many.len(),
        }),
    }
}
