pub mod compatibility;
pub mod mapping;

pub use compatibility::*;
pub use mapping::*;
