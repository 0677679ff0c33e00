//! Registry Client
//!
//! [`CapabilityBackend`] is the wire seam: one async method per endpoint of
//! the directory service, returning raw `Result`s. [`RegistryClient`] sits on
//! top and folds register/unregister results into an [`Outcome`] the UI can
//! show as-is, logging transport failures on the way.
//!
//! Implementations:
//! - [`HttpBackend`]: the REST service, via reqwest
//! - [`InMemoryBackend`]: same contract over a local snapshot, for tests

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use crate::error::{CapdirError, Result};
use crate::model::Snapshot;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Detail shown when the backend rejects a request without saying why.
pub const GENERIC_FAILURE_DETAIL: &str = "An error occurred";

/// Endpoints of the directory service.
#[async_trait]
pub trait CapabilityBackend: Send + Sync {
    /// `GET /capabilities`
    async fn fetch_capabilities(&self) -> Result<Snapshot>;

    /// `POST /capabilities/{name}/register?email={email}`; `Ok` carries the
    /// backend's success message.
    async fn register(&self, capability: &str, email: &str) -> Result<String>;

    /// `DELETE /capabilities/{name}/unregister?email={email}`
    async fn unregister(&self, capability: &str, email: &str) -> Result<String>;
}

/// Which roster change was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Register,
    Unregister,
}

impl Mutation {
    /// Fixed text shown when the request never got a usable answer.
    pub fn transport_failure_detail(self) -> &'static str {
        match self {
            Mutation::Register => "Failed to register. Please try again.",
            Mutation::Unregister => "Failed to unregister. Please try again.",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Register => write!(f, "register"),
            Mutation::Unregister => write!(f, "unregister"),
        }
    }
}

/// Normalized result of a register/unregister round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { message: String },
    Failure { detail: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The text to put in front of the user.
    pub fn text(&self) -> &str {
        match self {
            Outcome::Success { message } => message,
            Outcome::Failure { detail } => detail,
        }
    }

    fn from_result(mutation: Mutation, result: Result<String>) -> Self {
        match result {
            Ok(message) => Outcome::Success { message },
            Err(CapdirError::Status { detail, .. }) => Outcome::Failure { detail },
            Err(err) => {
                crate::error_log!("Error {}ing: {}", mutation, err);
                Outcome::Failure {
                    detail: mutation.transport_failure_detail().to_string(),
                }
            }
        }
    }
}

/// Cheap to clone; all clones share one backend.
#[derive(Clone)]
pub struct RegistryClient {
    backend: Arc<dyn CapabilityBackend>,
}

impl RegistryClient {
    pub fn new(backend: Arc<dyn CapabilityBackend>) -> Self {
        Self { backend }
    }

    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let result = self.backend.fetch_capabilities().await;
        match &result {
            Ok(snapshot) => {
                crate::debug_log!("Fetched {} capabilities", snapshot.len());
            }
            Err(err) => {
                crate::error_log!("Error fetching capabilities: {}", err);
            }
        }
        result
    }

    pub async fn register(&self, capability: &str, email: &str) -> Outcome {
        self.mutate(Mutation::Register, capability, email).await
    }

    pub async fn unregister(&self, capability: &str, email: &str) -> Outcome {
        self.mutate(Mutation::Unregister, capability, email).await
    }

    pub async fn mutate(&self, mutation: Mutation, capability: &str, email: &str) -> Outcome {
        crate::info_log!("{} {} for {}", mutation, email, capability);
        let result = match mutation {
            Mutation::Register => self.backend.register(capability, email).await,
            Mutation::Unregister => self.backend.unregister(capability, email).await,
        };
        Outcome::from_result(mutation, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failure_keeps_backend_detail() {
        let outcome = Outcome::from_result(
            Mutation::Unregister,
            Err(CapdirError::Status {
                status: 400,
                detail: "Consultant is not registered for this capability".to_string(),
            }),
        );
        assert_eq!(
            outcome,
            Outcome::Failure {
                detail: "Consultant is not registered for this capability".to_string()
            }
        );
    }

    #[test]
    fn test_transport_failure_uses_fixed_text() {
        let outcome = Outcome::from_result(
            Mutation::Register,
            Err(CapdirError::Http("connection refused".to_string())),
        );
        assert_eq!(outcome.text(), "Failed to register. Please try again.");

        let outcome = Outcome::from_result(
            Mutation::Unregister,
            Err(CapdirError::Decode("expected value at line 1".to_string())),
        );
        assert_eq!(outcome.text(), "Failed to unregister. Please try again.");
    }

    #[test]
    fn test_success() {
        let outcome = Outcome::from_result(Mutation::Register, Ok("Registered".to_string()));
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), "Registered");
    }
}
