//! Process-wide session state.
//!
//! DESIGN
//! ======
//! `SessionStore` is a cheap-to-clone handle over shared interior state,
//! injected into every collaborator that needs it. Reads are pull-based
//! (`snapshot` and friends); the derived authenticated flag is additionally
//! published on a `watch` channel so collaborators can react to login/logout
//! edges without polling.
//!
//! Single-writer convention: only the `AuthGateway` mutates the store, with
//! one sanctioned exception — a collaborator may `clear()` to treat the user
//! as logged out after an authorization failure. Mutators stay `pub` for that
//! reason; the boundary is a discipline, not an enforced one.
//!
//! TRADE-OFFS
//! ==========
//! Two in-flight operations may race their store writes; the last response
//! to arrive wins. There is no per-operation sequencing, so callers that
//! need ordering must serialize their own calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::net::types::User;
use crate::session::persist::SessionFile;

/// Current session fields. `access_token` and `user` presence move in
/// lockstep under every mutation except the read-through user refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// True iff an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

struct Inner {
    session: Mutex<Session>,
    authenticated: watch::Sender<bool>,
    persist: Option<SessionFile>,
}

/// Shared handle to the process-wide session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Empty, non-persistent store. Starts anonymous.
    #[must_use]
    pub fn new() -> Self {
        Self::from_session(Session::default(), None)
    }

    /// Store backed by durable storage; the initial session is whatever the
    /// previous process persisted. No liveness check is performed on a
    /// restored token until the first authenticated request.
    #[must_use]
    pub fn with_persistence(file: SessionFile) -> Self {
        let session = file.load();
        Self::from_session(session, Some(file))
    }

    fn from_session(session: Session, persist: Option<SessionFile>) -> Self {
        let (authenticated, _) = watch::channel(session.is_authenticated());
        Self {
            inner: Arc::new(Inner { session: Mutex::new(session), authenticated, persist }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Copy of the current session fields.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// Derived flag: an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Change notification for the authenticated flag. The receiver holds
    /// the current value immediately and observes every subsequent edge.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.authenticated.subscribe()
    }

    // =========================================================================
    // MUTATIONS (gateway-only by convention)
    // =========================================================================

    /// Install a freshly issued token pair and the user it belongs to,
    /// then write through to durable storage.
    pub fn set_authenticated(&self, access_token: &str, refresh_token: &str, user: User) {
        {
            let mut session = self.lock();
            session.access_token = Some(access_token.to_owned());
            session.refresh_token = Some(refresh_token.to_owned());
            session.user = Some(user.clone());
        }
        if let Some(persist) = &self.inner.persist {
            if let Err(error) = persist
                .save_tokens(access_token, refresh_token)
                .and_then(|()| persist.save_user(&user))
            {
                tracing::warn!(error = %error, "session persistence failed");
            }
        }
        self.inner.authenticated.send_replace(true);
        tracing::debug!(username = %user.username, "session authenticated");
    }

    /// Read-through refresh of the cached user record; tokens untouched.
    pub fn set_user(&self, user: User) {
        self.lock().user = Some(user.clone());
        if let Some(persist) = &self.inner.persist {
            if let Err(error) = persist.save_user(&user) {
                tracing::warn!(error = %error, "user record persistence failed");
            }
        }
    }

    /// Drop all session fields and erase durable storage.
    pub fn clear(&self) {
        {
            let mut session = self.lock();
            *session = Session::default();
        }
        if let Some(persist) = &self.inner.persist {
            if let Err(error) = persist.clear() {
                tracing::warn!(error = %error, "session storage clear failed");
            }
        }
        self.inner.authenticated.send_replace(false);
        tracing::debug!("session cleared");
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
