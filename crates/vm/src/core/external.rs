use std::fmt;

use hashbrown::HashMap;

use super::types::Word;

/// A host-supplied side effect, invoked by `call_external`.
pub type ExternalCall = Box<dyn FnMut()>;

/// The [`ExternalCalls`] registry maps host-chosen identifiers to zero-argument callbacks.
///
/// The VM only knows identifiers; what a callback does (print a verdict, record a flag) is
/// entirely up to the host that registered it.
#[derive(Default)]
pub struct ExternalCalls {
    calls: HashMap<Word, ExternalCall>,
}

impl ExternalCalls {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `call` under `id`, replacing any earlier registration. Returns whether an
    /// earlier registration was replaced.
    ///
    /// ```
    /// use warden_vm::core::external::ExternalCalls;
    ///
    /// let mut calls = ExternalCalls::new();
    /// assert!(!calls.register(1, || {}));
    /// assert!(calls.register(1, || {}));
    /// assert_eq!(calls.len(), 1);
    /// ```
    pub fn register(&mut self, id: Word, call: impl FnMut() + 'static) -> bool {
        self.calls.insert(id, Box::new(call)).is_some()
    }

    /// Invokes the callback registered under `id`. Unregistered ids are ignored.
    /// Returns whether a callback ran.
    pub fn call(&mut self, id: Word) -> bool {
        match self.calls.get_mut(&id) {
            Some(call) => {
                call();
                true
            }
            None => false,
        }
    }

    /// Whether a callback is registered under `id`.
    pub fn contains(&self, id: Word) -> bool {
        self.calls.contains_key(&id)
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl fmt::Debug for ExternalCalls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.calls.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        f.debug_struct("ExternalCalls").field("ids", &ids).finish()
    }
}
