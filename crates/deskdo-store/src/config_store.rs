use crate::document::{load_json, save_json, Document};
use crate::error::StoreError;
use deskdo_core::Config;
use tracing::{info, warn};

/// Durable user preferences.
///
/// Loading never fails: a missing document yields defaults and an unreadable
/// one is logged and replaced by defaults in memory. Saving never fails the
/// caller either; errors are logged and kept in [`ConfigStore::persist_error`].
pub struct ConfigStore {
    document: Box<dyn Document>,
    persist_error: Option<String>,
}

impl ConfigStore {
    pub fn new(document: impl Document + 'static) -> Self {
        Self {
            document: Box::new(document),
            persist_error: None,
        }
    }

    /// Open the store for a new session and return the config to use.
    ///
    /// Auto-hide is never resumed from a previous run: if the stored flag is
    /// set it is cleared and the correction is written back before the
    /// config is returned.
    pub fn open(document: impl Document + 'static) -> (Self, Config) {
        let mut store = Self::new(document);
        let mut config = store.load();
        if config.auto_hide_enabled {
            info!("auto-hide was left enabled, switching it off for this session");
            config.auto_hide_enabled = false;
            store.save(&config);
        }
        (store, config)
    }

    /// Read the document, filling defaults for missing fields and repairing
    /// the group list and current group.
    pub fn load(&self) -> Config {
        let mut config = match load_json::<Config>(self.document.as_ref()) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                warn!(document = %self.document.location(), error = %e, "failed to load config, using defaults");
                Config::default()
            }
        };
        if config.repair() {
            info!(current_group = %config.current_group, "repaired stored group list");
        }
        config
    }

    /// Write the full document.
    pub fn save(&mut self, config: &Config) {
        let _ = self.try_save(config);
    }

    /// Write the full document and report the outcome.
    pub fn try_save(&mut self, config: &Config) -> Result<(), StoreError> {
        let result = save_json(self.document.as_ref(), config);
        match &result {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                warn!(document = %self.document.location(), error = %e, "failed to save config");
                self.persist_error = Some(e.to_string());
            }
        }
        result
    }

    /// The last write failure, cleared by the next successful write.
    pub fn persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }
}
