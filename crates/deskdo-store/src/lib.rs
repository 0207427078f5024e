//! Persistence and stores for deskdo.
//!
//! [`TaskStore`] owns tasks and groups, [`ConfigStore`] owns preferences, and
//! [`Session`] ties both to a data directory. All of them assume a single
//! control thread and write their documents through on every mutation.

pub mod config_store;
pub mod document;
pub mod error;
pub mod lockfile;
pub mod query;
pub mod session;
pub mod task_store;

pub use config_store::ConfigStore;
pub use document::{Document, JsonFile, MemoryDocument};
pub use error::StoreError;
pub use query::GroupStats;
pub use session::Session;
pub use task_store::TaskStore;
