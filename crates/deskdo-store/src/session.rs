use crate::config_store::ConfigStore;
use crate::document::{Document, JsonFile};
use crate::error::StoreError;
use crate::query::{self, GroupStats};
use crate::task_store::TaskStore;
use deskdo_core::{Clock, CloseAction, Config, Task, TaskId, DEFAULT_GROUP};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding the task list inside a data directory.
pub const TASKS_FILE: &str = "todo_data.json";
/// File holding the preferences inside a data directory.
pub const CONFIG_FILE: &str = "todo_config.json";

/// One interactive session over a data directory.
///
/// Combines the task store and the preferences store. The group registry is
/// owned by the task store but persisted in the preferences document, so
/// every group operation goes through here to keep both in step. Like the
/// stores it wraps, a session is driven from a single thread.
pub struct Session {
    root: Option<PathBuf>,
    tasks: TaskStore,
    config_store: ConfigStore,
    config: Config,
}

impl Session {
    /// Open the session stored in `dir`. Files are created on first write.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let root = dir.as_ref().to_path_buf();
        let mut session = Self::with_documents(
            JsonFile::new(root.join(TASKS_FILE)),
            JsonFile::new(root.join(CONFIG_FILE)),
        );
        session.root = Some(root);
        session
    }

    /// Open a session over arbitrary documents.
    pub fn with_documents(tasks: impl Document + 'static, config: impl Document + 'static) -> Self {
        let (config_store, config) = ConfigStore::open(config);
        let tasks = TaskStore::open(tasks, config.groups.clone());
        let mut session = Self {
            root: None,
            tasks,
            config_store,
            config,
        };
        if session.config.groups.as_slice() != session.tasks.groups() {
            session.save_config();
        }
        session
    }

    /// Replace the time source used for new tasks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.tasks = self.tasks.with_clock(clock);
        self
    }

    /// Data directory, when opened from one.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn groups(&self) -> &[String] {
        self.tasks.groups()
    }

    pub fn current_group(&self) -> &str {
        &self.config.current_group
    }

    // --- tasks ---

    /// Add a task to `group`, or to the current group when `None`.
    pub fn add_task(&mut self, text: &str, group: Option<&str>) -> Result<Task, StoreError> {
        let group = group.unwrap_or(&self.config.current_group).to_string();
        self.tasks.add_task(text, &group)
    }

    pub fn toggle_task(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        self.tasks.toggle_task(id)
    }

    pub fn edit_task(&mut self, id: &TaskId, new_text: &str) -> Result<Task, StoreError> {
        self.tasks.edit_task(id, new_text)
    }

    pub fn delete_task(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        self.tasks.delete_task(id)
    }

    pub fn move_up(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        self.tasks.move_up(id)
    }

    pub fn move_down(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        self.tasks.move_down(id)
    }

    pub fn reorder_within_group(&mut self, group: &str, ids: &[TaskId]) -> Result<(), StoreError> {
        self.tasks.reorder_within_group(group, ids)
    }

    pub fn list_tasks(&self, group: &str, include_completed: bool) -> Vec<Task> {
        self.tasks.list_tasks(group, include_completed)
    }

    /// The current group as the widget shows it, honoring `show_completed`.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.tasks
            .list_tasks(&self.config.current_group, self.config.show_completed)
    }

    pub fn group_stats(&self, group: &str) -> GroupStats {
        query::group_stats(self.tasks.tasks(), group)
    }

    pub fn resolve_id(&self, prefix: &str) -> Result<TaskId, StoreError> {
        query::resolve_id(self.tasks.tasks(), prefix)
    }

    // --- groups ---

    /// Create a group and make it the current one.
    pub fn add_group(&mut self, name: &str) -> Result<String, StoreError> {
        let name = self.tasks.add_group(name)?;
        self.config.current_group = name.clone();
        self.save_config();
        Ok(name)
    }

    /// Rename a group. The current group follows the rename.
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<usize, StoreError> {
        let moved = self.tasks.rename_group(old, new)?;
        if self.config.current_group == old.trim() {
            self.config.current_group = new.trim().to_string();
        }
        self.save_config();
        Ok(moved)
    }

    /// Delete a group. If it was current, the default group becomes current.
    pub fn delete_group(&mut self, name: &str) -> Result<usize, StoreError> {
        let moved = self.tasks.delete_group(name)?;
        self.save_config();
        Ok(moved)
    }

    pub fn select_group(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if !self.tasks.has_group(name) {
            return Err(StoreError::GroupNotFound(name.to_string()));
        }
        self.config.current_group = name.to_string();
        self.save_config();
        Ok(())
    }

    // --- preferences ---

    pub fn set_show_completed(&mut self, show: bool) {
        self.config.show_completed = show;
        self.save_config();
    }

    pub fn set_auto_hide(&mut self, enabled: bool) {
        self.config.auto_hide_enabled = enabled;
        self.save_config();
    }

    pub fn close_action(&self) -> CloseAction {
        self.config.close_action()
    }

    /// Record how the user answered the close prompt and return what to do.
    pub fn record_close_choice(&mut self, to_tray: bool, remember: bool) -> CloseAction {
        self.config.close_to_tray = to_tray;
        self.config.remember_choice = remember;
        self.save_config();
        if to_tray {
            CloseAction::HideToTray
        } else {
            CloseAction::Quit
        }
    }

    // --- persistence ---

    /// The most recent unresolved write failure of either document.
    pub fn persist_error(&self) -> Option<&str> {
        self.tasks
            .persist_error()
            .or_else(|| self.config_store.persist_error())
    }

    /// Write both documents now and report the first failure.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let tasks = self.tasks.flush();
        let config = self.config_store.try_save(&self.config);
        tasks.and(config)
    }

    fn save_config(&mut self) {
        self.config.groups = self.tasks.groups().to_vec();
        if !self.config.has_group(&self.config.current_group) {
            self.config.current_group = DEFAULT_GROUP.to_string();
        }
        debug!(current_group = %self.config.current_group, "save config");
        self.config_store.save(&self.config);
    }
}
