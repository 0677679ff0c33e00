//! Terminal application state, split into focused submodules
pub mod input;
pub mod state;

pub use state::{App, Focus};
