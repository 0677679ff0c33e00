//! In-memory implementation of the directory service contract
//!
//! Behaves like the REST service (same success messages, same rejection
//! details) over a locally held snapshot. Can be switched offline to
//! exercise transport failures, and counts fetches so callers can check
//! when a refetch happened.

use super::CapabilityBackend;
use crate::error::{CapdirError, Result};
use crate::model::Snapshot;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryBackend {
    snapshot: Mutex<Snapshot>,
    offline: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Default::default()
        }
    }

    /// When offline every call fails as if the connection was refused.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Copy of the backend-side state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CapdirError::Http("connection refused".to_string()));
        }
        Ok(())
    }
}

fn not_found() -> CapdirError {
    CapdirError::Status {
        status: 404,
        detail: "Capability not found".to_string(),
    }
}

#[async_trait]
impl CapabilityBackend for InMemoryBackend {
    async fn fetch_capabilities(&self) -> Result<Snapshot> {
        self.check_online()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.lock().clone())
    }

    async fn register(&self, capability: &str, email: &str) -> Result<String> {
        self.check_online()?;
        let mut snapshot = self.snapshot.lock();
        let mut entry = snapshot.get(capability).cloned().ok_or_else(not_found)?;
        if entry.has_consultant(email) {
            return Err(CapdirError::Status {
                status: 400,
                detail: "Consultant is already registered for this capability".to_string(),
            });
        }
        entry.consultants.get_or_insert_with(Vec::new).push(email.to_string());
        snapshot.insert(capability, entry);
        Ok(format!("Registered {} for {}", email, capability))
    }

    async fn unregister(&self, capability: &str, email: &str) -> Result<String> {
        self.check_online()?;
        let mut snapshot = self.snapshot.lock();
        let mut entry = snapshot.get(capability).cloned().ok_or_else(not_found)?;
        if !entry.has_consultant(email) {
            return Err(CapdirError::Status {
                status: 400,
                detail: "Consultant is not registered for this capability".to_string(),
            });
        }
        if let Some(consultants) = entry.consultants.as_mut() {
            consultants.retain(|c| c != email);
        }
        snapshot.insert(capability, entry);
        Ok(format!("Unregistered {} from {}", email, capability))
    }
}
