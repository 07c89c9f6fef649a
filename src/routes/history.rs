//! In-memory navigation history. Forms push or replace entries after a
//! successful submission; `back` walks the stack like a browser would.

use crate::session::Context;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Debug)]
struct Entries {
    stack: Vec<String>,
    index: usize,
}

#[derive(Debug)]
pub struct History {
    entries: Mutex<Entries>,
}

impl History {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial.to_string()],
                index: 0,
            }),
        }
    }

    #[must_use]
    pub fn current(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    /// Adds `path` after the current entry, dropping any forward entries.
    pub fn push(&self, path: &str) {
        let mut entries = self.lock();
        let next = entries.index + 1;
        entries.stack.truncate(next);
        entries.stack.push(path.to_string());
        entries.index = next;
        debug!(path, "navigate (push)");
    }

    /// Overwrites the current entry so `back` skips the page being left.
    pub fn replace(&self, path: &str) {
        let mut entries = self.lock();
        let index = entries.index;
        entries.stack[index] = path.to_string();
        debug!(path, "navigate (replace)");
    }

    /// Moves one entry back; returns the new current path, or `None` at the start.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.lock();
        if entries.index == 0 {
            return None;
        }
        entries.index -= 1;
        Some(entries.stack[entries.index].clone())
    }

    /// Number of entries, including forward entries left by `back`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lock().stack.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the navigation history provided to this context.
///
/// # Panics
/// Panics if no history was provided to the context.
#[track_caller]
#[must_use]
pub fn use_history(context: &Context) -> Arc<History> {
    match context.get::<History>() {
        Some(history) => history,
        None => panic!("use_history must be used within a Router"),
    }
}
