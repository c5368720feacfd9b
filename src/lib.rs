//! blocktodo - a personal todo tracker with conflict-free time blocks
//!
//! This library provides the core functionality for blocktodo, including:
//! - Date, time and time-block validation
//! - The todo item model and its persisted record shape
//! - The todo store with time-block conflict detection and display sorting
//! - The JSON snapshot adapter and data location resolution
//! - CLI command parsing and the interactive shell
//!
//! # Example
//!
//! ```no_run
//! use blocktodo::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod error;
pub mod models;
pub mod repo;
pub mod storage;
pub mod cli;
pub mod utils;

pub use error::{TodoError, ValidationError};
