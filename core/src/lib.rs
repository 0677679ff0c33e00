//! `capdir-core` - capability directory client
//!
//! Everything below the terminal frontend: the capability model, the store
//! and query engine, the registry client for the directory service, the
//! feedback channel, and the controller that ties them together.

pub mod logger;

pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod model;
pub mod query;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use controller::{Action, DirectoryController, Effect};
pub use error::{CapdirError, Result};
pub use model::{Capability, Snapshot};
pub use query::{apply, Availability, Criteria, SortKey};
pub use registry::{CapabilityBackend, HttpBackend, InMemoryBackend, Outcome, RegistryClient};
pub use runtime::Runtime;
