//! Session boundary for the external authentication service.
//!
//! The surrounding application holds live authentication state behind a
//! subscription/listener pattern. This module abstracts that as an explicit
//! provider interface; the redirect validator and the invoice builder never
//! touch it directly; they receive already-resolved identifiers.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::UserId;

/// A resolved authentication session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The authenticated principal
    pub user_id: UserId,
    /// Opaque bearer token for the auth collaborator
    pub access_token: String,
}

/// Handle for removing a registered session listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked whenever the session changes; `None` means signed out.
pub type SessionListener = Box<dyn Fn(Option<&Session>) + Send + Sync>;

/// Live authentication state, supplied by the external auth collaborator.
pub trait SessionProvider: Send + Sync {
    /// The currently established session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Register a listener for session changes.
    fn subscribe(&self, listener: SessionListener) -> SubscriptionId;

    /// Remove a previously registered listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Thread-safe slot holding the persisted post-auth redirect path.
///
/// The login page stores the intended destination here before handing the
/// browser to the auth provider; the callback consumes it exactly once, so a
/// stale value can never redirect a later sign-in.
#[derive(Debug, Default)]
pub struct RedirectSlot {
    path: Mutex<Option<String>>,
}

impl RedirectSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the destination to return to after authentication.
    pub fn store(&self, path: impl Into<String>) {
        *self.path.lock().expect("Mutex poisoned") = Some(path.into());
    }

    /// Take the stored destination, leaving the slot empty.
    pub fn take(&self) -> Option<String> {
        self.path.lock().expect("Mutex poisoned").take()
    }

    /// Drop any stored destination without reading it.
    pub fn clear(&self) {
        *self.path.lock().expect("Mutex poisoned") = None;
    }
}

/// Shared listener registry for [`SessionProvider`] implementations.
///
/// Keeps the bookkeeping (id allocation, registration, notification fan-out)
/// out of each provider.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Mutex<u64>,
    listeners: Mutex<HashMap<u64, SessionListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its handle.
    pub fn register(&self, listener: SessionListener) -> SubscriptionId {
        let mut next_id = self.next_id.lock().expect("Mutex poisoned");
        let id = *next_id;
        *next_id += 1;
        self.listeners
            .lock()
            .expect("Mutex poisoned")
            .insert(id, listener);
        SubscriptionId(id)
    }

    /// Remove a listener; unknown ids are ignored.
    pub fn remove(&self, id: SubscriptionId) {
        self.listeners.lock().expect("Mutex poisoned").remove(&id.0);
    }

    /// Invoke every registered listener with the new session state.
    pub fn notify(&self, session: Option<&Session>) {
        let listeners = self.listeners.lock().expect("Mutex poisoned");
        for listener in listeners.values() {
            listener(session);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.listeners.lock().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("ListenerRegistry")
            .field("listeners", &count)
            .finish()
    }
}
