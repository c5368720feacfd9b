// Interactive prompt loop
// Reads one command per line and prompts for each field; invalid input
// rejects that single command and the loop carries on.

use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};
use anyhow::{Context, Result};
use crate::cli::commands::{handle_add, handle_complete, handle_delete, handle_list, AddInput};
use crate::cli::error::is_user_error;
use crate::cli::output::ListOptions;
use crate::repo::TodoStore;
use crate::storage::Snapshot;

const COMMAND_HELP: &str = "Commands: add / list / complete / delete / exit";

pub struct Shell<R, W> {
    input: R,
    output: W,
    today: NaiveDate,
    list_options: ListOptions,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            today: Local::now().date_naive(),
            list_options: ListOptions::plain(100),
        }
    }

    /// Day that new time blocks are anchored on
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_list_options(mut self, options: ListOptions) -> Self {
        self.list_options = options;
        self
    }

    /// Run until `exit` or end of input.
    ///
    /// User errors are printed and the loop continues; storage failures end
    /// the session and are returned to the caller.
    pub fn run<S: Snapshot>(&mut self, store: &mut TodoStore<S>) -> Result<()> {
        writeln!(self.output, "=== blocktodo ===")?;

        loop {
            writeln!(self.output, "\n{}", COMMAND_HELP)?;
            let Some(command) = self.prompt("Command: ")? else {
                break;
            };

            let result = match command.to_lowercase().as_str() {
                "exit" | "quit" => break,
                "" => continue,
                "add" => self.add(store),
                "list" => self.list(store),
                "complete" => self.complete(store),
                "delete" => self.delete(store),
                other => {
                    writeln!(self.output, "Unknown command: {}", other)?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                if !is_user_error(&e) {
                    return Err(e);
                }
                writeln!(self.output, "Error: {}", e)?;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, treating end of input as an empty answer
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    fn add<S: Snapshot>(&mut self, store: &mut TodoStore<S>) -> Result<()> {
        let title = self.ask("Title: ")?;
        let due = self.ask("Deadline (optional, e.g. 2026-12-31 or 12-31 17:00): ")?;
        let priority = self.ask("Priority (1-5, 1 highest, default 3): ")?;
        let block = self.ask("Time block (optional, 24h, e.g. 14:00-15:30): ")?;

        let input = AddInput {
            title,
            due: Some(due),
            priority: Some(priority),
            block: Some(block),
        };
        handle_add(store, &input, self.today, &mut self.output)
    }

    fn list<S: Snapshot>(&mut self, store: &TodoStore<S>) -> Result<()> {
        let sort = self.ask("Sort by (priority/deadline/time, default priority): ")?;
        let sort = if sort.is_empty() { "priority".to_string() } else { sort };
        handle_list(store, &sort, false, &self.list_options, &mut self.output)
    }

    fn complete<S: Snapshot>(&mut self, store: &mut TodoStore<S>) -> Result<()> {
        let position = self.ask("Position to toggle: ")?;
        handle_complete(store, &position, &mut self.output)
    }

    fn delete<S: Snapshot>(&mut self, store: &mut TodoStore<S>) -> Result<()> {
        let position = self.ask("Position to delete: ")?;
        handle_delete(store, &position, &mut self.output)
    }
}
