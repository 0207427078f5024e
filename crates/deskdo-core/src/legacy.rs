//! Task records as found on disk, including those written by older versions
//! that predate groups (`group` missing) or manual ordering (`order` missing).

use crate::id::TaskId;
use crate::task::{timestamp, Task};
use crate::DEFAULT_GROUP;
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, HashSet};

/// Loose shape of a persisted task. Every field added after the first
/// release is optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub group: Option<String>,
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| timestamp::parse(&s).ok()))
}

/// Result of upgrading a list of records to current tasks.
#[derive(Debug, Clone, Default)]
pub struct Migration {
    pub tasks: Vec<Task>,
    /// Records that had no group and were placed in the default group.
    pub filled_groups: usize,
    /// Records that had no order and were ranked by position.
    pub filled_orders: usize,
    /// Tasks whose stored order was rewritten to restore contiguity.
    pub renumbered: usize,
    /// Records whose id repeated an earlier record's and got a fresh one.
    pub reassigned_ids: usize,
}

impl Migration {
    pub fn is_clean(&self) -> bool {
        self.filled_groups == 0
            && self.filled_orders == 0
            && self.renumbered == 0
            && self.reassigned_ids == 0
    }
}

/// Upgrade records to tasks.
///
/// Missing groups become the default group. A missing order takes the
/// record's position among the members of its group. Each group is then
/// ranked by stored order (ties by document position) and renumbered
/// `0..k-1`. A record repeating an earlier id keeps its data under a
/// freshly generated id.
pub fn migrate(records: Vec<TaskRecord>) -> Migration {
    let mut filled_groups = 0;
    let mut filled_orders = 0;
    let mut reassigned_ids = 0;
    let mut seen_ids: HashSet<TaskId> = HashSet::new();
    let mut seen_in_group: HashMap<String, i64> = HashMap::new();
    let mut keyed: Vec<(i64, Task)> = Vec::with_capacity(records.len());

    for (position_in_doc, record) in records.into_iter().enumerate() {
        let created_at = record.created_at.unwrap_or_default();
        let mut id = record.id;
        if seen_ids.contains(&id) {
            reassigned_ids += 1;
            let at = Utc.from_utc_datetime(&created_at);
            let mut seq = position_in_doc as u64;
            while seen_ids.contains(&id) {
                id = TaskId::generate(&at, seq, &record.text);
                seq += 1;
            }
        }
        seen_ids.insert(id.clone());

        let group = match record.group.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => {
                filled_groups += 1;
                DEFAULT_GROUP.to_string()
            }
        };
        let slot = seen_in_group.entry(group.clone()).or_insert(0);
        let position = *slot;
        *slot += 1;
        let key = match record.order {
            Some(order) => order,
            None => {
                filled_orders += 1;
                position
            }
        };
        let task = Task {
            id,
            text: record.text,
            completed: record.completed,
            created_at,
            order: 0,
            group,
        };
        keyed.push((key, task));
    }

    let mut renumbered = 0;
    let mut groups: Vec<String> = Vec::new();
    for (_, task) in &keyed {
        if !groups.contains(&task.group) {
            groups.push(task.group.clone());
        }
    }
    for group in &groups {
        let mut members: Vec<usize> = keyed
            .iter()
            .enumerate()
            .filter(|(_, (_, t))| t.group == *group)
            .map(|(i, _)| i)
            .collect();
        members.sort_by_key(|&i| (keyed[i].0, i));
        for (rank, i) in members.into_iter().enumerate() {
            if keyed[i].0 != rank as i64 {
                renumbered += 1;
            }
            keyed[i].1.order = rank;
        }
    }

    Migration {
        tasks: keyed.into_iter().map(|(_, t)| t).collect(),
        filled_groups,
        filled_orders,
        renumbered,
        reassigned_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::is_contiguous;

    fn records(json: &str) -> Vec<TaskRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn records_without_group_and_order_land_in_default_group() {
        let m = migrate(records(
            r#"[
                {"id": 1700000000.1, "text": "a", "completed": false, "created_at": "2023-11-14 22:13:20"},
                {"id": 1700000000.2, "text": "b", "completed": true,  "created_at": "2023-11-14 22:13:21"},
                {"id": 1700000000.3, "text": "c", "completed": false, "created_at": "2023-11-14 22:13:22"}
            ]"#,
        ));
        assert_eq!(m.filled_groups, 3);
        assert_eq!(m.filled_orders, 3);
        assert_eq!(m.renumbered, 0);
        let got: Vec<(&str, usize, &str)> = m
            .tasks
            .iter()
            .map(|t| (t.text.as_str(), t.order, t.group.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("a", 0, DEFAULT_GROUP), ("b", 1, DEFAULT_GROUP), ("c", 2, DEFAULT_GROUP)]
        );
        assert!(m.tasks[1].completed);
    }

    #[test]
    fn missing_order_is_position_within_group() {
        let m = migrate(records(
            r#"[
                {"id": "t1", "text": "a", "group": "x"},
                {"id": "t2", "text": "b", "group": "y"},
                {"id": "t3", "text": "c", "group": "x"}
            ]"#,
        ));
        assert_eq!(m.tasks[0].order, 0);
        assert_eq!(m.tasks[1].order, 0);
        assert_eq!(m.tasks[2].order, 1);
    }

    #[test]
    fn flat_renumbered_orders_are_repaired_per_group() {
        // Orders written by a global renumber: unique overall, gapped per group.
        let m = migrate(records(
            r#"[
                {"id": "t1", "text": "a", "group": "x", "order": 0},
                {"id": "t2", "text": "b", "group": "y", "order": 1},
                {"id": "t3", "text": "c", "group": "x", "order": 2},
                {"id": "t4", "text": "d", "group": "y", "order": 3}
            ]"#,
        ));
        assert!(is_contiguous(&m.tasks, "x"));
        assert!(is_contiguous(&m.tasks, "y"));
        assert_eq!(m.tasks[2].order, 1);
        assert_eq!(m.tasks[3].order, 1);
        assert_eq!(m.renumbered, 3);
    }

    #[test]
    fn stored_order_wins_over_document_position() {
        let m = migrate(records(
            r#"[
                {"id": "t1", "text": "second", "group": "x", "order": 1},
                {"id": "t2", "text": "first",  "group": "x", "order": 0}
            ]"#,
        ));
        assert_eq!(m.tasks[0].order, 1);
        assert_eq!(m.tasks[1].order, 0);
        assert!(m.is_clean());
    }

    #[test]
    fn repeated_ids_get_fresh_ones() {
        let m = migrate(records(
            r#"[
                {"id": 7, "text": "a", "group": "x", "order": 0},
                {"id": 7, "text": "b", "group": "x", "order": 1},
                {"id": 7, "text": "b", "group": "x", "order": 2}
            ]"#,
        ));
        assert_eq!(m.reassigned_ids, 2);
        assert!(!m.is_clean());
        assert_eq!(m.tasks[0].id.as_str(), "7");
        let ids: HashSet<&TaskId> = m.tasks.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(m.tasks[2].text, "b");
        assert_eq!(m.tasks[2].order, 2);
    }

    #[test]
    fn unparseable_timestamp_falls_back() {
        let m = migrate(records(r#"[{"id": "t1", "text": "a", "created_at": "someday"}]"#));
        assert_eq!(m.tasks[0].created_at, NaiveDateTime::default());
    }
}
