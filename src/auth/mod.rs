//! Authentication handle: holds the signed-in user's session

mod persistence;
mod session;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Error;

pub use persistence::*;
pub use session::*;

/// Handle to the authentication state shared by the other clients.
///
/// Sign-in itself happens elsewhere; this handle receives the resulting
/// session, persists it when enabled, and hands out the bearer token.
#[derive(Clone)]
pub struct Auth {
    /// The current session
    session: Arc<Mutex<Option<Session>>>,

    /// Where the session is persisted
    store: Arc<dyn SessionStore>,

    /// Whether the session is written to `store`
    persist_session: bool,
}

impl Auth {
    /// Create a new Auth handle, restoring a persisted session if enabled
    pub(crate) fn new(store: Arc<dyn SessionStore>, persist_session: bool) -> Self {
        let restored = if persist_session {
            match store.load() {
                Ok(session) => session,
                Err(e) => {
                    log::warn!("ignoring unreadable persisted session: {}", e);
                    None
                }
            }
        } else {
            None
        };

        if let Some(ref session) = restored {
            log::debug!("restored session for user {}", session.user_id);
        }

        Self {
            session: Arc::new(Mutex::new(restored)),
            store,
            persist_session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the current session
    pub fn current_session(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Set the session, persisting it when enabled
    pub fn set_session(&self, session: Session) -> Result<(), Error> {
        if self.persist_session {
            self.store.save(&session)?;
        }
        *self.lock() = Some(session);
        Ok(())
    }

    /// The ID token to send as bearer token, if a live session exists
    pub fn id_token(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| s.id_token.clone())
    }

    /// Whether a non-expired session is present
    pub fn is_signed_in(&self) -> bool {
        self.id_token().is_some()
    }

    /// Sign out locally: drop the session from memory and the store
    pub fn sign_out(&self) -> Result<(), Error> {
        let previous = self.lock().take();
        if self.persist_session {
            self.store.clear()?;
        }
        match previous {
            Some(session) => log::info!("signed out user {}", session.user_id),
            None => log::debug!("sign out without a session"),
        }
        Ok(())
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("signed_in", &self.is_signed_in())
            .field("persist_session", &self.persist_session)
            .finish()
    }
}
