//! # Session Gate
//!
//! Holds the single authentication token and publishes it to observers.
//!
//! ```text
//!   Restoring ──restore()──► SignedOut ──login(t)──► SignedIn(t)
//!                       └──► SignedIn(t) ──logout()──► SignedOut
//! ```
//!
//! Storage always moves first: `login` only publishes once the token is on
//! disk, and `logout` removes it from disk before publishing `SignedOut`.
//! A failed write during `login` is a failed login.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::core::nav::NavGraph;
use crate::core::store::{KeyValueStore, StoreError};

/// Storage key of the persisted token.
pub const TOKEN_KEY: &str = "userToken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been read yet. Neither graph is shown.
    Restoring,
    SignedOut,
    SignedIn(String),
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::SignedIn(token) => Some(token),
            _ => None,
        }
    }

    /// `None` while restoring.
    pub fn graph(&self) -> Option<NavGraph> {
        match self {
            SessionState::Restoring => None,
            other => Some(NavGraph::for_token(other.token())),
        }
    }
}

#[derive(Debug)]
pub enum SessionError {
    Storage(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Storage(e) => write!(f, "could not persist session: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

pub struct SessionGate {
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Restoring);
        Self { store, state }
    }

    /// Reads the persisted token. Storage errors are logged and treated
    /// as "no session".
    pub fn restore(&self) -> Option<String> {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!("Error reading token from storage: {e}");
                None
            }
        };
        info!("Session restored: signed_in={}", token.is_some());
        self.state.send_replace(match &token {
            Some(token) => SessionState::SignedIn(token.clone()),
            None => SessionState::SignedOut,
        });
        token
    }

    /// Persists `token`, then publishes it. Nothing is published if the
    /// write fails.
    pub fn login(&self, token: String) -> Result<(), SessionError> {
        if let Err(e) = self.store.set(TOKEN_KEY, &token) {
            warn!("Failed to persist session token: {e}");
            return Err(SessionError::Storage(e));
        }
        debug!("Session token persisted");
        self.state.send_replace(SessionState::SignedIn(token));
        Ok(())
    }

    /// Clears the persisted token, then publishes `SignedOut`.
    ///
    /// The in-memory session ends even if storage could not be cleared; the
    /// error is returned so the caller can tell the user the stored token
    /// may come back on the next start.
    pub fn logout(&self) -> Result<(), SessionError> {
        let removed = self.store.remove(TOKEN_KEY);
        if let Err(e) = &removed {
            warn!("Failed to clear persisted session token: {e}");
        }
        self.state.send_replace(SessionState::SignedOut);
        info!("Signed out");
        removed.map_err(SessionError::Storage)
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn graph(&self) -> Option<NavGraph> {
        self.state.borrow().graph()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
