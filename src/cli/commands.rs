use clap::{Parser, Subcommand};
use chrono::{Local, NaiveDate};
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};
use crate::cli::error::{parse_position, position_error};
use crate::cli::output::{format_todo_line, format_todo_table, ListOptions};
use crate::cli::shell::Shell;
use crate::error::ValidationError;
use crate::models::TodoItem;
use crate::repo::{SortKey, TodoStore};
use crate::storage::{DataLocation, Snapshot};
use crate::utils::{parse_deadline, parse_priority, parse_time_range, validate_title};

#[derive(Parser)]
#[command(name = "blocktodo")]
#[command(about = "Todo tracker with deadlines, priorities and conflict-free time blocks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Todo file to use instead of the configured location
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Command to run (defaults to the interactive shell)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new todo
    Add {
        /// Todo title
        title: Vec<String>,
        /// Deadline (YYYY-MM-DD or MM-DD, optionally followed by HH:MM)
        #[arg(long)]
        due: Option<String>,
        /// Priority from 1 (most urgent) to 5
        #[arg(short, long)]
        priority: Option<String>,
        /// Time block for today, e.g. 14:00-15:30
        #[arg(long)]
        block: Option<String>,
    },
    /// List todos
    List {
        /// Sort order: priority, deadline, time or id
        #[arg(default_value = "priority")]
        sort: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Toggle the completed flag of a todo
    Complete {
        /// Position shown in the # column of `list`
        #[arg(allow_hyphen_values = true)]
        position: String,
    },
    /// Delete a todo
    Delete {
        /// Position shown in the # column of `list`
        #[arg(allow_hyphen_values = true)]
        position: String,
    },
    /// Interactive prompt
    Shell,
}

/// Raw field values for a new todo, as typed by the user
#[derive(Debug, Clone, Default)]
pub struct AddInput {
    pub title: String,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub block: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate every field and build a candidate todo.
/// Time blocks are anchored on `today`.
pub fn build_candidate(input: &AddInput, today: NaiveDate) -> Result<TodoItem, ValidationError> {
    let title = validate_title(&input.title)?;
    let deadline = non_blank(&input.due).map(parse_deadline).transpose()?;
    let priority = parse_priority(input.priority.as_deref().unwrap_or(""))?;
    let time_block = non_blank(&input.block)
        .map(|range| parse_time_range(range, today))
        .transpose()?;

    Ok(TodoItem::new(title)
        .with_deadline(deadline)
        .with_priority(priority)
        .with_time_block(time_block))
}

pub fn handle_add<S: Snapshot>(
    store: &mut TodoStore<S>,
    input: &AddInput,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let candidate = build_candidate(input, today)?;
    let position = store.len() + 1;
    let item = store.add(candidate)?;
    writeln!(out, "Added {}", format_todo_line(position, item))?;
    Ok(())
}

pub fn handle_list<S: Snapshot>(
    store: &TodoStore<S>,
    sort: &str,
    json: bool,
    options: &ListOptions,
    out: &mut impl Write,
) -> Result<()> {
    let key = SortKey::from_name(sort);
    if json {
        let items = store.list(key);
        let rendered = serde_json::to_string_pretty(&items)
            .context("Failed to serialize todos")?;
        writeln!(out, "{}", rendered)?;
    } else {
        write!(out, "{}", format_todo_table(&store.list_indexed(key), options))?;
    }
    Ok(())
}

pub fn handle_complete<S: Snapshot>(
    store: &mut TodoStore<S>,
    position: &str,
    out: &mut impl Write,
) -> Result<()> {
    let index = parse_position(position)?;
    let item = store.toggle_complete(index).map_err(position_error)?;
    let verb = if item.completed { "Completed" } else { "Reopened" };
    writeln!(out, "{} {}", verb, format_todo_line(index + 1, item))?;
    Ok(())
}

pub fn handle_delete<S: Snapshot>(
    store: &mut TodoStore<S>,
    position: &str,
    out: &mut impl Write,
) -> Result<()> {
    let index = parse_position(position)?;
    let removed = store.delete(index).map_err(position_error)?;
    writeln!(out, "Deleted {}", format_todo_line(index + 1, &removed))?;
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let snapshot = DataLocation::open(cli.file)?;
    let mut store = TodoStore::open(snapshot);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let today = Local::now().date_naive();

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Add { title, due, priority, block } => {
            let input = AddInput {
                title: title.join(" "),
                due,
                priority,
                block,
            };
            handle_add(&mut store, &input, today, &mut out)
        }
        Commands::List { sort, json } => {
            handle_list(&store, &sort, json, &ListOptions::for_stdout(), &mut out)
        }
        Commands::Complete { position } => handle_complete(&mut store, &position, &mut out),
        Commands::Delete { position } => handle_delete(&mut store, &position, &mut out),
        Commands::Shell => {
            let stdin = io::stdin();
            Shell::new(stdin.lock(), out)
                .with_list_options(ListOptions::for_stdout())
                .run(&mut store)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TodoError;
    use crate::storage::MemorySnapshot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn input(title: &str) -> AddInput {
        AddInput {
            title: title.to_string(),
            ..AddInput::default()
        }
    }

    #[test]
    fn test_build_candidate_defaults() {
        let item = build_candidate(&input("  plan week "), today()).unwrap();
        assert_eq!(item.title, "plan week");
        assert_eq!(item.priority, 3);
        assert!(item.deadline.is_none());
        assert!(item.time_block.is_none());
    }

    #[test]
    fn test_build_candidate_all_fields() {
        let add = AddInput {
            title: "dentist".to_string(),
            due: Some("2026-10-20".to_string()),
            priority: Some("1".to_string()),
            block: Some("14:00-15:30".to_string()),
        };
        let item = build_candidate(&add, today()).unwrap();
        assert_eq!(item.priority, 1);
        assert_eq!(
            item.deadline,
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap().and_hms_opt(0, 0, 0)
        );
        let block = item.time_block.unwrap();
        assert_eq!(block.start, today().and_hms_opt(14, 0, 0).unwrap());
        assert_eq!(block.end, today().and_hms_opt(15, 30, 0).unwrap());
    }

    #[test]
    fn test_build_candidate_blank_optionals_are_ignored() {
        let add = AddInput {
            title: "x".to_string(),
            due: Some("  ".to_string()),
            priority: Some("".to_string()),
            block: Some("".to_string()),
        };
        assert!(build_candidate(&add, today()).is_ok());
    }

    #[test]
    fn test_build_candidate_rejects_each_bad_field() {
        assert_eq!(
            build_candidate(&input(""), today()),
            Err(ValidationError::EmptyTitle)
        );

        let mut bad_due = input("x");
        bad_due.due = Some("next week".to_string());
        assert!(matches!(
            build_candidate(&bad_due, today()),
            Err(ValidationError::InvalidDate(_))
        ));

        let mut bad_priority = input("x");
        bad_priority.priority = Some("9".to_string());
        assert!(matches!(
            build_candidate(&bad_priority, today()),
            Err(ValidationError::InvalidPriority(_))
        ));

        let mut bad_block = input("x");
        bad_block.block = Some("14:00-14:05".to_string());
        assert!(matches!(
            build_candidate(&bad_block, today()),
            Err(ValidationError::BlockTooShort { .. })
        ));
    }

    #[test]
    fn test_handle_add_reports_conflict() {
        let mut store = TodoStore::open(MemorySnapshot::new());
        let mut out = Vec::new();

        let mut first = input("standup");
        first.block = Some("09:00-09:30".to_string());
        handle_add(&mut store, &first, today(), &mut out).unwrap();

        let mut second = input("call");
        second.block = Some("09:15-10:00".to_string());
        let err = handle_add(&mut store, &second, today(), &mut out).unwrap_err();
        match err.downcast_ref::<TodoError>() {
            Some(TodoError::Conflict { title }) => assert_eq!(title, "standup"),
            other => panic!("unexpected error: {:?}", other),
        }

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Added 1. [ ] [10-16 09:00-09:30] standup"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_handle_complete_and_delete_use_one_based_positions() {
        let mut store = TodoStore::open(MemorySnapshot::new());
        let mut out = Vec::new();
        for title in ["a", "b"] {
            handle_add(&mut store, &input(title), today(), &mut out).unwrap();
        }

        handle_complete(&mut store, "2", &mut out).unwrap();
        assert!(store.get(1).unwrap().completed);

        handle_delete(&mut store, "1", &mut out).unwrap();
        assert_eq!(store.get(0).unwrap().title, "b");

        assert!(handle_delete(&mut store, "0", &mut out).is_err());
        let err = handle_complete(&mut store, "5", &mut out).unwrap_err();
        assert_eq!(err.to_string(), "No todo at position 5: list has 1 item(s)");

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Completed 2. [x] b"));
        assert!(printed.contains("Deleted 1. [ ] a"));
    }

    #[test]
    fn test_handle_list_json() {
        let mut store = TodoStore::open(MemorySnapshot::new());
        let mut out = Vec::new();
        handle_add(&mut store, &input("only"), today(), &mut out).unwrap();

        let mut listed = Vec::new();
        handle_list(&store, "priority", true, &ListOptions::plain(80), &mut listed).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&listed).unwrap();
        assert_eq!(value[0]["title"], "only");
        assert!(value[0]["time_block_start"].is_null());
    }
}
