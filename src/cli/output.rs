// Output formatting utilities

use crate::models::{TimeBlock, TodoItem};
use chrono::{NaiveDateTime, Timelike};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";

const TITLE_MIN_WIDTH: usize = 10;
const COLUMN_GAP: &str = "  ";

/// How a todo list should be rendered
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    /// Emit ANSI styling (bold header, dimmed completed rows)
    pub styled: bool,
    /// Total width available for a row
    pub width: usize,
}

impl ListOptions {
    /// Options for the current stdout
    pub fn for_stdout() -> Self {
        Self {
            styled: is_tty(),
            width: get_terminal_width(),
        }
    }

    /// Unstyled options, used for piped output and tests
    pub fn plain(width: usize) -> Self {
        Self { styled: false, width }
    }
}

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate, with fallback to the COLUMNS environment
/// variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    100
}

/// Format a deadline; midnight deadlines show the date only
pub fn format_deadline(ts: &NaiveDateTime) -> String {
    if ts.hour() == 0 && ts.minute() == 0 {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Format a time block as `MM-DD HH:MM-HH:MM`
pub fn format_time_block(block: &TimeBlock) -> String {
    format!(
        "{} {}-{}",
        block.start.format("%m-%d"),
        block.start.format("%H:%M"),
        block.end.format("%H:%M")
    )
}

/// One-line description of a todo, used in command confirmations
pub fn format_todo_line(position: usize, item: &TodoItem) -> String {
    let mut line = format!("{}. [{}] ", position, if item.completed { "x" } else { " " });
    if let Some(block) = &item.time_block {
        line.push_str(&format!("[{}] ", format_time_block(block)));
    }
    line.push_str(&item.title);
    if let Some(deadline) = &item.deadline {
        line.push_str(&format!(" (due {})", format_deadline(deadline)));
    }
    line.push_str(&format!(" (priority {})", item.priority));
    line
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Format todos as a table.
///
/// `rows` pairs each item with its canonical 0-based index; the `#` column
/// shows that index 1-based, which is what `complete` and `delete` accept
/// regardless of the display order.
pub fn format_todo_table(rows: &[(usize, &TodoItem)], options: &ListOptions) -> String {
    if rows.is_empty() {
        return "No todos.\n".to_string();
    }

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|(index, item)| {
            [
                (index + 1).to_string(),
                if item.completed { "[x]" } else { "[ ]" }.to_string(),
                item.time_block.as_ref().map(format_time_block).unwrap_or_default(),
                item.title.clone(),
                item.deadline.as_ref().map(format_deadline).unwrap_or_default(),
                item.priority.to_string(),
            ]
        })
        .collect();

    let headers = ["#", "Done", "Block", "Title", "Due", "Pri"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    // Title absorbs whatever width the other columns leave
    let fixed: usize = widths
        .iter()
        .enumerate()
        .filter(|(col, _)| *col != 3)
        .map(|(_, w)| *w)
        .sum::<usize>()
        + COLUMN_GAP.len() * (headers.len() - 1);
    let title_room = options.width.saturating_sub(fixed).max(TITLE_MIN_WIDTH);
    widths[3] = widths[3].min(title_room);

    let render = |cols: &[String]| -> String {
        let last = cols.len() - 1;
        let parts: Vec<String> = cols
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let cell = if col == 3 { truncate(cell, widths[3]) } else { cell.clone() };
                if col == last {
                    cell
                } else {
                    pad(&cell, widths[col])
                }
            })
            .collect();
        parts.join(COLUMN_GAP)
    };

    let mut output = String::new();
    let header_line = render(&headers.map(String::from));
    if options.styled {
        output.push_str(&format!("{}{}{}\n", ANSI_BOLD, header_line, ANSI_RESET));
    } else {
        output.push_str(&header_line);
        output.push('\n');
    }

    for ((_, item), row) in rows.iter().zip(&cells) {
        let line = render(row);
        if options.styled && item.completed {
            output.push_str(&format!("{}{}{}\n", ANSI_DIM, line, ANSI_RESET));
        } else {
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}
