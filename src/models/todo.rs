use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Priority given to items when none is supplied
pub const DEFAULT_PRIORITY: u8 = 3;

/// Most urgent priority
pub const HIGHEST_PRIORITY: u8 = 1;

/// Least urgent priority
pub const LOWEST_PRIORITY: u8 = 5;

/// A scheduled commitment: the half-open interval [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeBlock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: blocks that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Todo item model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TodoRecord", try_from = "TodoRecord")]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub deadline: Option<NaiveDateTime>,
    pub priority: u8, // 1 (most urgent) ..= 5
    pub completed: bool,
    pub time_block: Option<TimeBlock>,
}

impl TodoItem {
    /// Create a new open item with default priority and no deadline or block.
    ///
    /// The id is a time-ordered UUID, so sorting by id follows creation order
    /// and the id stays the same across save/load cycles.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            deadline: None,
            priority: DEFAULT_PRIORITY,
            completed: false,
            time_block: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<NaiveDateTime>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        debug_assert!(
            (HIGHEST_PRIORITY..=LOWEST_PRIORITY).contains(&priority),
            "priority {} out of range",
            priority
        );
        self.priority = priority;
        self
    }

    pub fn with_time_block(mut self, time_block: Option<TimeBlock>) -> Self {
        self.time_block = time_block;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Check whether the two items' time blocks collide.
    ///
    /// Items without a time block never conflict. An item with a block
    /// overlaps itself, so callers scanning a collection must skip the
    /// candidate's own entry.
    pub fn overlaps(&self, other: &TodoItem) -> bool {
        match (&self.time_block, &other.time_block) {
            (Some(a), Some(b)) => a.overlaps(b),
            _ => false,
        }
    }
}

/// Persisted shape of a todo item.
///
/// Timestamps serialize as ISO-8601 (`2026-01-10T14:30:00`) or null; the
/// time block is stored as two flat nullable columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    pub priority: u8,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub time_block_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub time_block_end: Option<NaiveDateTime>,
}

/// A record carrying only one time block endpoint
#[derive(Debug, Error)]
#[error("todo '{title}' has a time block with only one endpoint")]
pub struct PartialTimeBlock {
    pub title: String,
}

impl From<TodoItem> for TodoRecord {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            deadline: item.deadline,
            priority: item.priority,
            completed: item.completed,
            time_block_start: item.time_block.map(|b| b.start),
            time_block_end: item.time_block.map(|b| b.end),
        }
    }
}

impl TryFrom<TodoRecord> for TodoItem {
    type Error = PartialTimeBlock;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        let time_block = match (record.time_block_start, record.time_block_end) {
            (Some(start), Some(end)) => Some(TimeBlock::new(start, end)),
            (None, None) => None,
            _ => return Err(PartialTimeBlock { title: record.title }),
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            deadline: record.deadline,
            priority: record.priority,
            completed: record.completed,
            time_block,
        })
    }
}
