pub mod close;
pub mod config;
pub mod group;
pub mod task;

use anyhow::{bail, Context, Result};
use deskdo_core::Task;
use deskdo_store::Session;
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Global options shared by every command.
pub struct Ctx {
    data_dir: Option<PathBuf>,
    pub json: bool,
}

impl Ctx {
    pub fn new(data_dir: Option<PathBuf>, json: bool) -> Self {
        Self { data_dir, json }
    }

    /// `--data-dir`, then `$DESKDO_DIR`, then the current directory.
    fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = env::var_os("DESKDO_DIR").filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        env::current_dir().context("failed to get current directory")
    }

    pub fn session(&self) -> Result<Session> {
        let dir = self.data_dir()?;
        debug!(dir = %dir.display(), "opening session");
        Ok(Session::open(dir))
    }
}

/// Fail if the session could not write its documents. The process is about
/// to exit, so unsaved changes would be lost.
pub fn ensure_saved(session: &Session) -> Result<()> {
    if let Some(err) = session.persist_error() {
        bail!("changes could not be saved: {}", err);
    }
    Ok(())
}

/// One task as a line (or block, for multi-line text) of human output.
pub fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut lines = task.text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("{:>3}. [{}] {}  ({})", task.order + 1, mark, first, task.id.short());
    for line in lines {
        out.push_str("\n         ");
        out.push_str(line);
    }
    out
}
