//! Opcode dispatch.
//!
//! Handlers are not indexed by the raw opcode. Each opcode is first run through
//! [`dispatch_key`], a fixed arithmetic transform, and the table is keyed by the result. The
//! transform is an obfuscation layer and carries no meaning. Decoding goes through [`Opcode`]
//! first, so a word that merely aliases a defined key (50 shares the key of `push`) is rejected
//! as unknown rather than dispatched.

use std::fmt;

use hashbrown::HashMap;

use crate::{
    core::{
        constants::{DISPATCH_KEY_MULTIPLIER, DISPATCH_KEY_OFFSET, DISPATCH_KEY_SPACE},
        opcodes::Opcode,
        types::Word,
    },
    error::Error,
};

use super::{core::VM, handlers};

/// An opcode handler. Handlers consume their own immediates through the VM's instruction
/// pointer.
pub type Handler = fn(&mut VM) -> Result<(), Error>;

/// Obfuscation layer: derives the dispatch key of an opcode word.
///
/// ```
/// use warden_vm::core::vm::dispatch_key;
///
/// assert_eq!(dispatch_key(0), 3);
/// assert_eq!(dispatch_key(14), 41);
/// ```
pub fn dispatch_key(opcode: Word) -> i64 {
    (opcode as i64 * DISPATCH_KEY_MULTIPLIER + DISPATCH_KEY_OFFSET).rem_euclid(DISPATCH_KEY_SPACE)
}

/// Maps dispatch keys to handlers. Built once per VM and never modified afterwards.
#[derive(Clone)]
pub struct DispatchTable {
    handlers: HashMap<i64, (Opcode, Handler)>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTable {
    /// Builds the table with one handler per defined opcode.
    pub fn new() -> Self {
        let mut table = DispatchTable { handlers: HashMap::with_capacity(Opcode::ALL.len()) };

        table.bind(Opcode::Push, handlers::stack::push);
        table.bind(Opcode::Pop, handlers::stack::pop);
        table.bind(Opcode::Add, handlers::arithmetic::add);
        table.bind(Opcode::Ret, handlers::control::ret);
        table.bind(Opcode::CallExternal, handlers::system::call_external);
        table.bind(Opcode::Cmp, handlers::comparison::cmp);
        table.bind(Opcode::JumpIfEqual, handlers::control::jump_if_equal);
        table.bind(Opcode::Sub, handlers::arithmetic::sub);
        table.bind(Opcode::PushJunk, handlers::stack::push_junk);
        table.bind(Opcode::Xor, handlers::bitwise::xor);
        table.bind(Opcode::Mutate, handlers::system::mutate);
        table.bind(Opcode::TimingCheck, handlers::integrity::timing_check);
        table.bind(Opcode::ChecksumCheck, handlers::integrity::checksum_check);
        table.bind(Opcode::ChecksumPush, handlers::integrity::checksum_push);
        table.bind(Opcode::Rotl, handlers::bitwise::rotl);

        table
    }

    fn bind(&mut self, opcode: Opcode, handler: Handler) {
        let previous = self.handlers.insert(dispatch_key(opcode.word()), (opcode, handler));
        debug_assert!(previous.is_none(), "dispatch key collision for `{opcode}`");
    }

    /// Resolves a fetched word to its opcode and handler.
    pub fn resolve(&self, word: Word, address: usize) -> Result<(Opcode, Handler), Error> {
        let unknown = Error::UnknownOpcode { opcode: word, address };
        let opcode = Opcode::try_from(word).map_err(|_| unknown.clone())?;

        match self.handlers.get(&dispatch_key(word)) {
            Some(&(bound, handler)) if bound == opcode => Ok((opcode, handler)),
            _ => Err(unknown),
        }
    }

    /// Number of bound handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are bound.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound = self.handlers.iter().map(|(key, (op, _))| (*key, *op)).collect::<Vec<_>>();
        bound.sort_unstable();
        f.debug_struct("DispatchTable").field("handlers", &bound).finish()
    }
}
