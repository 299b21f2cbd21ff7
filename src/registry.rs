//! Engine lifecycle: at most one live instance per logical key.
//!
//! The screens this crate serves create surfaces lazily as problems come
//! into view and tear them down when the screen is replaced. The registry is
//! the one process-wide mutable structure: it answers "is there already an
//! engine for this key?" so that repeated init calls for the same surface
//! are no-ops and a student's half-drawn answer survives re-entry.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::engine::EngineError;
use crate::export::EngineKey;

/// Maps logical keys to live engine instances.
///
/// Generic over the instance type so native tests register
/// [`crate::engine::EngineCore`]s while the browser registers canvas-bound
/// [`crate::engine::Engine`]s.
pub struct Registry<E> {
    live: HashMap<EngineKey, E>,
}

impl<E> Registry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { live: HashMap::new() }
    }

    /// Fetch the instance for `key`, creating it with `init` on first use.
    ///
    /// Idempotent: when an instance is already live, `init` is not called
    /// and the existing instance — surface state included — is returned. A
    /// failed `init` registers nothing, so the caller can retry once the
    /// surface is attached and sized.
    ///
    /// # Errors
    ///
    /// Whatever `init` returns; the registry is unchanged on error.
    pub fn obtain_with<F>(&mut self, key: &str, init: F) -> Result<&mut E, EngineError>
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        match self.live.entry(key.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let engine = match init() {
                    Ok(engine) => engine,
                    Err(e) => {
                        tracing::warn!(%key, error = %e, "engine init failed");
                        return Err(e);
                    }
                };
                tracing::debug!(%key, "engine registered");
                Ok(slot.insert(engine))
            }
        }
    }

    /// Look up a live instance.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&E> {
        self.live.get(key)
    }

    /// Look up a live instance for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut E> {
        self.live.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.live.contains_key(key)
    }

    /// Drop one instance; its surface and history go with it. Returns
    /// whether anything was live under the key.
    pub fn dispose(&mut self, key: &str) -> bool {
        let disposed = self.live.remove(key).is_some();
        if disposed {
            tracing::debug!(%key, "engine disposed");
        }
        disposed
    }

    /// Drop every instance, e.g. when the hosting screen is torn down.
    pub fn reset(&mut self) {
        if !self.live.is_empty() {
            tracing::debug!(count = self.live.len(), "registry reset");
        }
        self.live.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}
