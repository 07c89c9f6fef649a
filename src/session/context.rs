//! Explicitly passed context that carries shared services (the session store
//! first of all) down to pages and forms. Values are keyed by type; looking up
//! a service that was never provided is a wiring bug and panics.

use crate::session::state::SessionStore;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Context")
            .field("values", &self.values.len())
            .finish()
    }
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides `value` to everything that receives this context, replacing
    /// any previous value of the same type.
    pub fn provide<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        self.values.insert(TypeId::of::<T>(), value);
    }

    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }
}

/// Provides the session store to everything below this context.
pub fn provide_auth(context: &mut Context, store: Arc<SessionStore>) {
    context.provide(store);
}

/// Returns the session store provided to this context.
///
/// # Panics
/// Panics if no session store was provided: the caller was wired outside
/// an auth provider.
#[track_caller]
#[must_use]
pub fn use_auth(context: &Context) -> Arc<SessionStore> {
    match try_use_auth(context) {
        Some(store) => store,
        None => panic!("use_auth must be used within an AuthProvider"),
    }
}

#[must_use]
pub fn try_use_auth(context: &Context) -> Option<Arc<SessionStore>> {
    context.get::<SessionStore>()
}
