use std::fmt::Display;

use crate::error::Error;

use super::types::Word;

/// The [`Stack`] struct represents the VM's operand stack.
/// It is a LIFO data structure of [`Word`]s; the last element of the backing vector is the top.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Stack {
    /// The values on the stack, bottom first.
    pub stack: Vec<Word>,
}

impl Stack {
    /// Creates a new, empty [`Stack`].
    ///
    /// ```
    /// use warden_vm::core::stack::Stack;
    ///
    /// let stack = Stack::new();
    /// assert_eq!(stack.size(), 0);
    /// ```
    pub fn new() -> Stack {
        Stack { stack: Vec::with_capacity(64) }
    }

    /// Push a value onto the stack.
    ///
    /// ```
    /// use warden_vm::core::stack::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(7);
    /// assert_eq!(stack.size(), 1);
    /// ```
    pub fn push(&mut self, value: Word) {
        self.stack.push(value);
    }

    /// Pop a value off the stack.
    ///
    /// ```
    /// use warden_vm::core::stack::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(7);
    ///
    /// assert_eq!(stack.pop(), Ok(7));
    /// assert!(stack.pop().is_err());
    /// ```
    pub fn pop(&mut self) -> Result<Word, Error> {
        self.stack.pop().ok_or(Error::StackUnderflow { needed: 1, available: 0 })
    }

    /// Pop the two topmost values off the stack, returned as `(a, b)` where `b` was on top.
    ///
    /// Nothing is popped if the stack holds fewer than two values.
    ///
    /// ```
    /// use warden_vm::core::stack::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(10);
    /// stack.push(3);
    ///
    /// // stack is now [10, 3]
    /// assert_eq!(stack.pop_pair(), Ok((10, 3)));
    /// assert!(stack.is_empty());
    /// ```
    pub fn pop_pair(&mut self) -> Result<(Word, Word), Error> {
        if self.stack.len() < 2 {
            return Err(Error::StackUnderflow { needed: 2, available: self.stack.len() });
        }

        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }

    /// Peek at the value `index` positions below the top of the stack.
    ///
    /// ```
    /// use warden_vm::core::stack::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(1);
    /// stack.push(2);
    ///
    /// assert_eq!(stack.peek(0), Some(2));
    /// assert_eq!(stack.peek(1), Some(1));
    /// assert_eq!(stack.peek(2), None);
    /// ```
    pub fn peek(&self, index: usize) -> Option<Word> {
        self.stack.len().checked_sub(index + 1).map(|position| self.stack[position])
    }

    /// Returns the top of the stack, or zero if the stack is empty.
    pub fn top_or_zero(&self) -> Word {
        self.peek(0).unwrap_or(0)
    }

    /// Get the size of the stack
    pub fn size(&self) -> usize {
        self.stack.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Remove every value from the stack.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.stack.iter().rev().map(|value| value.to_string()).collect::<Vec<_>>();
        write!(f, "[{}]", values.join(", "))
    }
}
