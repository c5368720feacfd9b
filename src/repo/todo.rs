use chrono::NaiveDateTime;
use std::cmp::Ordering;
use crate::error::TodoError;
use crate::models::TodoItem;
use crate::storage::Snapshot;

/// Display order for listing todos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most urgent (1) first
    Priority,
    /// Earliest deadline first, items without one last
    Deadline,
    /// Earliest time block first, items without one last
    Time,
    /// Creation order
    Id,
}

impl SortKey {
    /// Map a user-supplied key; anything unrecognised sorts by id
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "priority" => SortKey::Priority,
            "deadline" => SortKey::Deadline,
            "time" => SortKey::Time,
            _ => SortKey::Id,
        }
    }

    fn compare(&self, a: &TodoItem, b: &TodoItem) -> Ordering {
        match self {
            SortKey::Priority => a.priority.cmp(&b.priority),
            SortKey::Deadline => or_latest(a.deadline).cmp(&or_latest(b.deadline)),
            SortKey::Time => {
                let a_start = a.time_block.map(|block| block.start);
                let b_start = b.time_block.map(|block| block.start);
                or_latest(a_start).cmp(&or_latest(b_start))
            }
            SortKey::Id => a.id.cmp(&b.id),
        }
    }
}

/// Absent timestamps sort as the latest representable time
fn or_latest(ts: Option<NaiveDateTime>) -> NaiveDateTime {
    ts.unwrap_or(NaiveDateTime::MAX)
}

/// Ordered todo collection backed by a snapshot.
///
/// Insertion order is canonical: positional operations (`toggle_complete`,
/// `delete`) use 0-based canonical indices. Every successful mutation is
/// written through to the snapshot; a failed write rolls the mutation back.
pub struct TodoStore<S: Snapshot> {
    snapshot: S,
    items: Vec<TodoItem>,
}

impl<S: Snapshot> TodoStore<S> {
    /// Construct a store from whatever the snapshot currently holds
    pub fn open(snapshot: S) -> Self {
        let mut store = Self {
            snapshot,
            items: Vec::new(),
        };
        store.items = store.load();
        store
    }

    /// Read the persisted items. Unreadable or malformed content counts as
    /// an empty list; stored blocks are not re-checked for conflicts.
    pub fn load(&self) -> Vec<TodoItem> {
        match self.snapshot.load() {
            Ok(items) => {
                log::debug!("Loaded {} todo(s)", items.len());
                items
            }
            Err(e) => {
                log::warn!("{}: {}; starting with an empty list", e, error_source(&e));
                Vec::new()
            }
        }
    }

    /// Write every item, in canonical order, over the previous snapshot
    pub fn save(&mut self) -> Result<(), TodoError> {
        self.snapshot
            .save(&self.items)
            .map_err(|source| TodoError::StorageWrite {
                path: self.snapshot.location().to_path_buf(),
                source,
            })
    }

    /// First existing item whose time block collides with `candidate`
    pub fn find_conflict(&self, candidate: &TodoItem) -> Option<&TodoItem> {
        self.items.iter().find(|existing| candidate.overlaps(existing))
    }

    /// Append `candidate` unless its id is taken or its time block collides
    /// with an existing one
    pub fn add(&mut self, candidate: TodoItem) -> Result<&TodoItem, TodoError> {
        if self.items.iter().any(|existing| existing.id == candidate.id) {
            return Err(TodoError::DuplicateId { id: candidate.id });
        }

        if let Some(existing) = self.find_conflict(&candidate) {
            log::debug!("Rejected '{}': overlaps '{}'", candidate.title, existing.title);
            return Err(TodoError::Conflict {
                title: existing.title.clone(),
            });
        }

        let index = self.items.len();
        self.items.push(candidate);
        if let Err(e) = self.save() {
            self.items.pop();
            return Err(e);
        }

        log::debug!("Added todo {} at position {}", self.items[index].id, index);
        Ok(&self.items[index])
    }

    /// Items in display order. Ties keep canonical order.
    pub fn list(&self, key: SortKey) -> Vec<&TodoItem> {
        self.list_indexed(key)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }

    /// Items in display order, paired with their canonical index
    pub fn list_indexed(&self, key: SortKey) -> Vec<(usize, &TodoItem)> {
        let mut rows: Vec<(usize, &TodoItem)> = self.items.iter().enumerate().collect();
        // sort_by is stable
        rows.sort_by(|(_, a), (_, b)| key.compare(a, b));
        rows
    }

    /// Flip the completion flag of the item at canonical `index`
    pub fn toggle_complete(&mut self, index: usize) -> Result<&TodoItem, TodoError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(TodoError::IndexOutOfRange { index, len })?;
        item.completed = !item.completed;

        if let Err(e) = self.save() {
            self.items[index].completed = !self.items[index].completed;
            return Err(e);
        }

        log::debug!(
            "Todo {} marked {}",
            self.items[index].id,
            if self.items[index].completed { "complete" } else { "open" }
        );
        Ok(&self.items[index])
    }

    /// Remove the item at canonical `index`; later items shift down by one
    pub fn delete(&mut self, index: usize) -> Result<TodoItem, TodoError> {
        let len = self.items.len();
        if index >= len {
            return Err(TodoError::IndexOutOfRange { index, len });
        }

        let removed = self.items.remove(index);
        if let Err(e) = self.save() {
            self.items.insert(index, removed);
            return Err(e);
        }

        log::debug!("Deleted todo {} from position {}", removed.id, index);
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Option<&TodoItem> {
        self.items.get(index)
    }

    /// Items in canonical order
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut S {
        &mut self.snapshot
    }
}

fn error_source(e: &dyn std::error::Error) -> String {
    e.source().map(|s| s.to_string()).unwrap_or_default()
}
