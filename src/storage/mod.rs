pub mod location;
pub mod snapshot;

pub use location::*;
pub use snapshot::*;
