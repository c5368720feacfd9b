// Core data models for blocktodo

pub mod todo;

pub use todo::*;
