//! Whole-document storage: every read returns the full text and every
//! write replaces it. The stores never update a document in place.

use crate::error::StoreError;
use crate::lockfile::Lockfile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait Document {
    /// Full document text, or `None` if it has never been written.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the document.
    fn write(&self, contents: &str) -> Result<(), StoreError>;

    /// Where the document lives, for log messages.
    fn location(&self) -> String;
}

/// Parse a document as JSON. A missing document yields `None`.
pub fn load_json<T: DeserializeOwned>(document: &dyn Document) -> Result<Option<T>, StoreError> {
    match document.read()? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Write `value` as indented JSON. Non-ASCII text is kept verbatim.
pub fn save_json<T: Serialize + ?Sized>(document: &dyn Document, value: &T) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    document.write(&json)
}

/// A UTF-8 JSON file replaced atomically through a [`Lockfile`].
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for JsonFile {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        Lockfile::replace(&self.path, contents.as_bytes())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory document. Clones share the same contents, so a test can keep a
/// handle while a store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let doc = Self::default();
        doc.state.borrow_mut().contents = Some(contents.into());
        doc
    }

    pub fn contents(&self) -> Option<String> {
        self.state.borrow().contents.clone()
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }
}

impl Document for MemoryDocument {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.state.borrow().contents.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
