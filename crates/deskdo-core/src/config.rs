use crate::DEFAULT_GROUP;
use serde::{Deserialize, Serialize};

/// User preferences, persisted as a flat JSON object.
///
/// Every field has a default so documents from older versions, which lack
/// newer keys, still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_true")]
    pub show_completed: bool,
    #[serde(default)]
    pub auto_hide_enabled: bool,
    #[serde(default)]
    pub close_to_tray: bool,
    #[serde(default)]
    pub remember_choice: bool,
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    #[serde(default = "default_group")]
    pub current_group: String,
}

fn default_true() -> bool {
    true
}

fn default_groups() -> Vec<String> {
    vec![DEFAULT_GROUP.to_string()]
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_completed: true,
            auto_hide_enabled: false,
            close_to_tray: false,
            remember_choice: false,
            groups: default_groups(),
            current_group: default_group(),
        }
    }
}

/// What the window's close button should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseAction {
    /// No remembered choice; the user must be asked.
    Ask,
    HideToTray,
    Quit,
}

impl Config {
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    /// Bring a loaded document back to a consistent shape. Returns true if
    /// anything changed.
    ///
    /// Blank and duplicate group names are dropped (first occurrence wins),
    /// the default group is put first when missing, and an unknown
    /// `current_group` falls back to the default group.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();

        let mut groups: Vec<String> = Vec::with_capacity(self.groups.len());
        for name in self.groups.drain(..) {
            let name = name.trim().to_string();
            if !name.is_empty() && !groups.contains(&name) {
                groups.push(name);
            }
        }
        if !groups.iter().any(|g| g == DEFAULT_GROUP) {
            groups.insert(0, DEFAULT_GROUP.to_string());
        }
        self.groups = groups;

        if !self.has_group(&self.current_group) {
            self.current_group = DEFAULT_GROUP.to_string();
        }

        *self != before
    }

    pub fn close_action(&self) -> CloseAction {
        match (self.remember_choice, self.close_to_tray) {
            (false, _) => CloseAction::Ask,
            (true, true) => CloseAction::HideToTray,
            (true, false) => CloseAction::Quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gets_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.show_completed);
        assert_eq!(config.groups, vec![DEFAULT_GROUP]);
        assert_eq!(config.current_group, DEFAULT_GROUP);
    }

    #[test]
    fn older_document_keeps_known_fields() {
        let config: Config =
            serde_json::from_str(r#"{"show_completed": false, "auto_hide_enabled": true}"#).unwrap();
        assert!(!config.show_completed);
        assert!(config.auto_hide_enabled);
        assert!(!config.close_to_tray);
        assert_eq!(config.groups, vec![DEFAULT_GROUP]);
    }

    #[test]
    fn repair_unknown_current_group() {
        let mut config = Config {
            groups: vec![DEFAULT_GROUP.into(), "工作".into()],
            current_group: "gone".into(),
            ..Config::default()
        };
        assert!(config.repair());
        assert_eq!(config.current_group, DEFAULT_GROUP);
    }

    #[test]
    fn repair_restores_default_and_dedupes() {
        let mut config = Config {
            groups: vec!["a".into(), " ".into(), "a".into(), "b".into()],
            current_group: "b".into(),
            ..Config::default()
        };
        assert!(config.repair());
        assert_eq!(config.groups, vec![DEFAULT_GROUP, "a", "b"]);
        assert_eq!(config.current_group, "b");
    }

    #[test]
    fn repair_is_noop_on_consistent_config() {
        let mut config = Config::default();
        assert!(!config.repair());
    }

    #[test]
    fn close_action_follows_remembered_choice() {
        let mut config = Config::default();
        assert_eq!(config.close_action(), CloseAction::Ask);
        config.close_to_tray = true;
        assert_eq!(config.close_action(), CloseAction::Ask);
        config.remember_choice = true;
        assert_eq!(config.close_action(), CloseAction::HideToTray);
        config.close_to_tray = false;
        assert_eq!(config.close_action(), CloseAction::Quit);
    }
}
