//! Plain data for the deskdo to-do widget: tasks, groups, preferences and
//! the migration rules for documents written by older versions.

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod legacy;
pub mod ordering;
pub mod task;

/// The permanent group. It always exists and can be neither renamed nor deleted.
pub const DEFAULT_GROUP: &str = "默认分组";

pub use clock::{Clock, SystemClock};
pub use config::{CloseAction, Config};
pub use error::CoreError;
pub use id::TaskId;
pub use task::Task;
