//! Registry of per-subsystem dump callbacks
//!
//! Subsystems that can describe their own state register a callback here
//! during their initialization and unregister during teardown. The registry
//! is process-wide state: created once at stack startup, shared behind an
//! `Arc`, and live for the stack's lifetime.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::sink::DumpSink;

/// Opaque identity of a registered subsystem.
///
/// Tokens are only ever compared for equality; the value carries no meaning
/// and is never inspected. A collaborator with a stable address can mint its
/// token with [`DumpToken::for_owner`]; any other process-unique value works
/// just as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DumpToken(usize);

impl DumpToken {
    /// Create a token from a raw value chosen by the caller.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Create a token from the address of the registering collaborator's
    /// stable identity object.
    pub fn for_owner<T: ?Sized>(owner: &T) -> Self {
        Self(owner as *const T as *const () as usize)
    }
}

/// A dump callback: given the output sink and the trigger's argument list,
/// writes the owning subsystem's diagnostic text.
pub type DumpFn = Box<dyn Fn(&DumpSink, &[String]) + Send>;

/// Process-wide map of dump targets.
///
/// Registration can happen from any context, so all operations take an
/// internal lock. Callbacks run under that lock during [`for_each`], so a
/// callback must not call back into the registry.
///
/// [`for_each`]: DumpRegistry::for_each
#[derive(Default)]
pub struct DumpRegistry {
    entries: Mutex<HashMap<DumpToken, DumpFn>>,
}

impl DumpRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dump callback for `token`.
    ///
    /// # Panics
    ///
    /// Registering a token that is already present is a lifecycle bug in the
    /// collaborator (double initialization) and aborts rather than being
    /// reported back.
    pub fn register(&self, token: DumpToken, callback: DumpFn) {
        debug!(?token, "DumpRegistry::register: called");
        let mut entries = self.entries.lock().expect("dump registry mutex poisoned");
        let previous = entries.insert(token, callback);
        assert!(
            previous.is_none(),
            "dump callback already registered for {token:?}"
        );
    }

    /// Remove the dump callback for `token`.
    ///
    /// # Panics
    ///
    /// Unregistering a token that was never registered is a lifecycle bug in
    /// the collaborator and aborts.
    pub fn unregister(&self, token: DumpToken) {
        debug!(?token, "DumpRegistry::unregister: called");
        let mut entries = self.entries.lock().expect("dump registry mutex poisoned");
        let removed = entries.remove(&token);
        assert!(
            removed.is_some(),
            "no dump callback registered for {token:?}"
        );
    }

    /// Invoke `visit` for every registered callback, in unspecified order,
    /// synchronously on the calling context.
    pub fn for_each(&self, mut visit: impl FnMut(&DumpFn)) {
        debug!("DumpRegistry::for_each: called");
        let entries = self.entries.lock().expect("dump registry mutex poisoned");
        for callback in entries.values() {
            visit(callback);
        }
    }

    /// Number of registered dump targets.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("dump registry mutex poisoned").len()
    }

    /// Whether no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
