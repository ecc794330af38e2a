// --- File: crates/consultify_flow/src/store.rs ---
//! In-memory booking session store.
//!
//! Sessions live only for the duration of one booking flow; nothing here
//! survives a restart (durability is the excluded backend's concern). Each
//! session has its own lock so one session's in-flight gateway call does
//! not block the others.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::FlowError;
use crate::logic::BookingSession;

pub type SharedSession = Arc<Mutex<BookingSession>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new booking session with an empty selection.
    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(BookingSession::new(id)));
        self.inner.lock().await.insert(id, session.clone());
        (id, session)
    }

    /// Looks up an open session.
    pub async fn get(&self, id: Uuid) -> Result<SharedSession, FlowError> {
        self.inner
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(FlowError::SessionNotFound)
    }

    /// Discards a session (user navigated away or flow finished).
    pub async fn remove(&self, id: Uuid) -> Result<(), FlowError> {
        self.inner
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(FlowError::SessionNotFound)
    }
}
