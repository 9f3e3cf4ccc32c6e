pub mod builder;
pub mod topology;

pub use builder::*;
pub use topology::*;
