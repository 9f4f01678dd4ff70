pub mod description;
pub mod segment;

pub use description::*;
pub use segment::*;
