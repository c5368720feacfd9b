use crate::models::TodoItem;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read a persisted snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed todo file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable medium holding the full ordered list of todos
pub trait Snapshot {
    /// Read every stored item in canonical order. A medium that does not
    /// exist yet holds no items.
    fn load(&self) -> Result<Vec<TodoItem>, SnapshotError>;

    /// Replace the stored content with `items`, in the given order
    fn save(&mut self, items: &[TodoItem]) -> io::Result<()>;

    /// Where the snapshot lives, for error reporting
    fn location(&self) -> &Path;
}

/// JSON array of records in a single file
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path a malformed file is copied to before it can be overwritten
    pub fn corrupt_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "corrupt")
    }

    fn temp_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "tmp")
    }

    fn preserve_corrupt(&self) {
        let backup = self.corrupt_path();
        match fs::copy(&self.path, &backup) {
            Ok(_) => log::warn!("Preserved unreadable todo file as {}", backup.display()),
            Err(e) => log::warn!("Could not preserve unreadable todo file: {}", e),
        }
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl Snapshot for JsonFileSnapshot {
    fn load(&self) -> Result<Vec<TodoItem>, SnapshotError> {
        // Raw bytes: invalid UTF-8 is malformed content, not a read failure
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No todo file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                if self.path.exists() {
                    self.preserve_corrupt();
                }
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&content).map_err(|source| {
            self.preserve_corrupt();
            SnapshotError::Parse {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn save(&mut self, items: &[TodoItem]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(items).map_err(io::Error::other)?;

        // Write beside the target and rename over it so a failed write never
        // truncates the existing file
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        log::debug!("Saved {} todo(s) to {}", items.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Snapshot kept in memory; counts writes and can be told to fail them
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    items: Vec<TodoItem>,
    saves: usize,
    fail_writes: bool,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<TodoItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Items as of the last successful save
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Snapshot for MemorySnapshot {
    fn load(&self) -> Result<Vec<TodoItem>, SnapshotError> {
        Ok(self.items.clone())
    }

    fn save(&mut self, items: &[TodoItem]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::other("writes disabled"));
        }
        self.items = items.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> &Path {
        Path::new("<memory>")
    }
}
