pub mod generation;
pub mod identity;
pub mod usage;

pub use generation::*;
pub use identity::*;
pub use usage::*;
