use crate::document::{load_json, save_json, Document};
use crate::error::StoreError;
use chrono::SubsecRound;
use deskdo_core::legacy::{migrate, TaskRecord};
use deskdo_core::ordering::{groups_in_use, members_in_order, renumber_group};
use deskdo_core::{Clock, SystemClock, Task, TaskId, DEFAULT_GROUP};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Owner of all tasks and of the group registry.
///
/// Every mutation leaves each group's orders at exactly `0..k-1` and every
/// task pointing at a registered group. Mutations that touch tasks write the
/// whole task document before returning. A failed write is logged and kept
/// in [`TaskStore::persist_error`]; the in-memory change stands and the next
/// write retries.
///
/// The registry itself is persisted by whoever owns the preferences document
/// (see [`crate::session::Session`]).
pub struct TaskStore {
    tasks: Vec<Task>,
    groups: Vec<String>,
    document: Box<dyn Document>,
    clock: Box<dyn Clock>,
    seq: u64,
    persist_error: Option<String>,
}

impl TaskStore {
    /// Load tasks from `document`, registering `groups` first.
    ///
    /// Legacy records are upgraded in memory. Groups referenced by tasks but
    /// missing from `groups` are appended to the registry. An unreadable or
    /// corrupt document is logged and treated as empty; it is left on disk
    /// until the next write.
    pub fn open(document: impl Document + 'static, groups: Vec<String>) -> Self {
        let tasks = match load_json::<Vec<TaskRecord>>(&document) {
            Ok(Some(records)) => {
                let migration = migrate(records);
                if !migration.is_clean() {
                    info!(
                        document = %document.location(),
                        filled_groups = migration.filled_groups,
                        filled_orders = migration.filled_orders,
                        renumbered = migration.renumbered,
                        "upgraded task records"
                    );
                }
                if migration.reassigned_ids > 0 {
                    warn!(
                        document = %document.location(),
                        count = migration.reassigned_ids,
                        "repeated task ids replaced"
                    );
                }
                migration.tasks
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(document = %document.location(), error = %e, "failed to load tasks, starting empty");
                Vec::new()
            }
        };

        let mut store = Self {
            tasks: Vec::new(),
            groups: Vec::new(),
            document: Box::new(document),
            clock: Box::new(SystemClock),
            seq: 0,
            persist_error: None,
        };
        store.register_groups(groups);
        store.tasks = tasks;
        for name in groups_in_use(&store.tasks) {
            if !store.has_group(&name) {
                info!(group = %name, "registering group referenced by tasks");
                store.groups.push(name);
            }
        }
        store
    }

    /// Replace the time source used for new tasks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn register_groups(&mut self, groups: Vec<String>) {
        for name in groups {
            let name = name.trim().to_string();
            if !name.is_empty() && !self.has_group(&name) {
                self.groups.push(name);
            }
        }
        if !self.has_group(DEFAULT_GROUP) {
            self.groups.insert(0, DEFAULT_GROUP.to_string());
        }
    }

    // --- reads ---

    /// All tasks in document order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Registered group names, in creation order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    pub fn find(&self, id: &TaskId) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == *id).cloned()
    }

    /// Tasks of `group` by ascending order, optionally without completed ones.
    pub fn list_tasks(&self, group: &str, include_completed: bool) -> Vec<Task> {
        members_in_order(&self.tasks, group)
            .into_iter()
            .map(|i| &self.tasks[i])
            .filter(|t| include_completed || !t.completed)
            .cloned()
            .collect()
    }

    /// The last write failure, cleared by the next successful write.
    pub fn persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }

    // --- task mutations ---

    pub fn add_task(&mut self, text: &str, group: &str) -> Result<Task, StoreError> {
        let text = validate_text(text)?;
        let group = group.trim();
        self.require_group(group)?;

        let now = self.clock.now();
        self.seq += 1;
        let order = self.tasks.iter().filter(|t| t.group == group).count();
        let task = Task::new(
            TaskId::generate(&now, self.seq, &text),
            text,
            group,
            order,
            now.naive_local().trunc_subsecs(0),
        );
        debug!(id = %task.id, group, order, "add task");
        self.tasks.push(task.clone());
        self.write_through();
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        let i = self.index_of(id)?;
        self.tasks[i].completed = !self.tasks[i].completed;
        debug!(%id, completed = self.tasks[i].completed, "toggle task");
        let task = self.tasks[i].clone();
        self.write_through();
        Ok(task)
    }

    pub fn edit_task(&mut self, id: &TaskId, new_text: &str) -> Result<Task, StoreError> {
        let text = validate_text(new_text)?;
        let i = self.index_of(id)?;
        self.tasks[i].text = text;
        debug!(%id, "edit task");
        let task = self.tasks[i].clone();
        self.write_through();
        Ok(task)
    }

    /// Remove a task and renumber what remains of its group.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        let i = self.index_of(id)?;
        let removed = self.tasks.remove(i);
        renumber_group(&mut self.tasks, &removed.group);
        debug!(%id, group = %removed.group, "delete task");
        self.write_through();
        Ok(removed)
    }

    /// Swap with the previous sibling. Returns false at the top of the group.
    pub fn move_up(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        self.shift(id, true)
    }

    /// Swap with the next sibling. Returns false at the bottom of the group.
    pub fn move_down(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        self.shift(id, false)
    }

    fn shift(&mut self, id: &TaskId, up: bool) -> Result<bool, StoreError> {
        let i = self.index_of(id)?;
        let mut members = members_in_order(&self.tasks, &self.tasks[i].group);
        let Some(pos) = members.iter().position(|&m| m == i) else {
            return Err(StoreError::TaskNotFound(id.to_string()));
        };
        let other = match (up, pos) {
            (true, 0) => return Ok(false),
            (true, p) => p - 1,
            (false, p) if p + 1 >= members.len() => return Ok(false),
            (false, p) => p + 1,
        };
        members.swap(pos, other);
        for (rank, m) in members.into_iter().enumerate() {
            self.tasks[m].order = rank;
        }
        debug!(%id, up, "move task");
        self.write_through();
        Ok(true)
    }

    /// Apply a complete new ordering of `group`, e.g. the result of a drag.
    ///
    /// `ids` must list every member of the group exactly once; anything else
    /// is rejected without touching state.
    pub fn reorder_within_group(&mut self, group: &str, ids: &[TaskId]) -> Result<(), StoreError> {
        let group = group.trim();
        self.require_group(group)?;
        let members: HashSet<&TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.group == group)
            .map(|t| &t.id)
            .collect();
        let given: HashSet<&TaskId> = ids.iter().collect();
        if given.len() != ids.len() {
            return Err(StoreError::Validation("reorder list contains duplicate ids".into()));
        }
        if given != members {
            return Err(StoreError::Validation(format!(
                "reorder list must name exactly the {} tasks of group '{}'",
                members.len(),
                group
            )));
        }

        for (rank, id) in ids.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) {
                task.order = rank;
            }
        }
        debug!(group, count = ids.len(), "reorder group");
        self.write_through();
        Ok(())
    }

    // --- group mutations ---

    pub fn add_group(&mut self, name: &str) -> Result<String, StoreError> {
        let name = validate_group_name(name)?;
        if self.has_group(&name) {
            return Err(StoreError::GroupExists(name));
        }
        debug!(group = %name, "add group");
        self.groups.push(name.clone());
        Ok(name)
    }

    /// Rename a group in place and move its tasks along. Returns the number
    /// of tasks that moved.
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<usize, StoreError> {
        let old = old.trim();
        if old == DEFAULT_GROUP {
            return Err(StoreError::ImmutableGroup(DEFAULT_GROUP.to_string()));
        }
        let new = validate_group_name(new)?;
        let Some(slot) = self.groups.iter().position(|g| g == old) else {
            return Err(StoreError::GroupNotFound(old.to_string()));
        };
        if new == old {
            return Ok(0);
        }
        if self.has_group(&new) {
            return Err(StoreError::GroupExists(new));
        }

        self.groups[slot] = new.clone();
        let mut moved = 0;
        for task in self.tasks.iter_mut().filter(|t| t.group == old) {
            task.group = new.clone();
            moved += 1;
        }
        debug!(from = old, to = %new, moved, "rename group");
        if moved > 0 {
            self.write_through();
        }
        Ok(moved)
    }

    /// Delete a group, appending its tasks to the end of the default group
    /// in their current order. Returns the number of tasks that moved.
    pub fn delete_group(&mut self, name: &str) -> Result<usize, StoreError> {
        let name = name.trim();
        if name == DEFAULT_GROUP {
            return Err(StoreError::ImmutableGroup(DEFAULT_GROUP.to_string()));
        }
        let Some(slot) = self.groups.iter().position(|g| g == name) else {
            return Err(StoreError::GroupNotFound(name.to_string()));
        };

        let base = self.tasks.iter().filter(|t| t.group == DEFAULT_GROUP).count();
        let members = members_in_order(&self.tasks, name);
        let moved = members.len();
        for (k, i) in members.into_iter().enumerate() {
            self.tasks[i].group = DEFAULT_GROUP.to_string();
            self.tasks[i].order = base + k;
        }
        self.groups.remove(slot);
        debug!(group = name, moved, "delete group");
        if moved > 0 {
            self.write_through();
        }
        Ok(moved)
    }

    // --- persistence ---

    /// Write the task document now and report the outcome.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let result = save_json(self.document.as_ref(), &self.tasks);
        match &result {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                warn!(document = %self.document.location(), error = %e, "failed to save tasks");
                self.persist_error = Some(e.to_string());
            }
        }
        result
    }

    fn write_through(&mut self) {
        // Failures are recorded in `persist_error` by `flush`.
        let _ = self.flush();
    }

    fn index_of(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| StoreError::TaskNotFound(id.as_str().to_string()))
    }

    fn require_group(&self, group: &str) -> Result<(), StoreError> {
        if self.has_group(group) {
            Ok(())
        } else {
            Err(StoreError::GroupNotFound(group.to_string()))
        }
    }
}

fn validate_text(text: &str) -> Result<String, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::Validation("task text cannot be empty".into()));
    }
    Ok(text.to_string())
}

fn validate_group_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("group name cannot be empty".into()));
    }
    Ok(name.to_string())
}
