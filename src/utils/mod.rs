pub mod date;
pub mod fields;

pub use date::*;
pub use fields::*;
