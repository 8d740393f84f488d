pub mod history;
pub mod identity;

pub use history::*;
pub use identity::*;
