pub mod messages;
pub mod neighbor;
pub mod parser;
pub mod types;

pub use messages::*;
pub use neighbor::*;
pub use parser::*;
pub use types::*;
