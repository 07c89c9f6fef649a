//! Session store: the single writer of the signed-in user. The in-memory value
//! is published through a watch channel so any number of readers can follow
//! it, and every change is mirrored to durable storage under [`SESSION_KEY`].
//! Only `login` and `logout` mutate the session.

use crate::session::{storage::Storage, types::User};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Storage key holding the serialized user.
pub const SESSION_KEY: &str = "user";

pub struct SessionStore {
    user: watch::Sender<Option<User>>,
    storage: Box<dyn Storage>,
    // Set by `logout`, cleared by `login`. While set, the durable copy is not
    // adopted, even if removing it failed.
    logged_out: AtomicBool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionStore")
            .field("user", &*self.user.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Builds an empty store; the durable copy is adopted on first read.
    #[must_use]
    pub fn new(storage: impl Storage + 'static) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            user,
            storage: Box::new(storage),
            logged_out: AtomicBool::new(false),
        }
    }

    /// Builds a store and immediately resynchronizes it with durable storage.
    #[must_use]
    pub fn hydrate(storage: impl Storage + 'static) -> Self {
        let store = Self::new(storage);
        store.current_user();
        store
    }

    /// Returns the signed-in user, adopting the durable copy when memory is empty.
    /// A missing or unreadable durable copy means there is no session.
    pub fn current_user(&self) -> Option<User> {
        if let Some(user) = self.user.borrow().as_ref() {
            return Some(user.clone());
        }
        if self.logged_out.load(Ordering::SeqCst) {
            return None;
        }

        let user = self.read_durable()?;
        debug!(user_id = %user.id, "session restored from storage");
        self.user.send_replace(Some(user.clone()));
        Some(user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Replaces the session with `user` and persists it.
    /// The durable copy is written first so memory never runs ahead of it.
    ///
    /// # Errors
    /// Returns an error if the user cannot be serialized or written; the
    /// previous session is left untouched in that case.
    pub fn login(&self, user: User) -> Result<()> {
        let payload = serde_json::to_string(&user).context("Failed to serialize user")?;
        self.storage
            .set_item(SESSION_KEY, &payload)
            .context("Failed to persist session")?;

        info!(user_id = %user.id, "user logged in");
        self.logged_out.store(false, Ordering::SeqCst);
        self.user.send_replace(Some(user));
        Ok(())
    }

    /// Clears the session in memory and in durable storage. Calling it again
    /// is a no-op.
    ///
    /// # Errors
    /// Returns an error if the durable entry cannot be removed. The user is
    /// signed out of this store regardless; only a new store would pick the
    /// leftover entry up again.
    pub fn logout(&self) -> Result<()> {
        self.logged_out.store(true, Ordering::SeqCst);
        if self.user.send_replace(None).is_some() {
            info!("user logged out");
        }

        self.storage
            .remove_item(SESSION_KEY)
            .context("Failed to remove persisted session")
    }

    fn read_durable(&self) -> Option<User> {
        let payload = match self.storage.get_item(SESSION_KEY) {
            Ok(payload) => payload?,
            Err(err) => {
                warn!("Ignoring unreadable session storage: {err:#}");
                return None;
            }
        };

        match serde_json::from_str::<User>(&payload) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Ignoring malformed persisted session: {err}");
                None
            }
        }
    }
}
