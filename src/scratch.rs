//! Reusable string buffers.
//!
//! A [`Scratch`] pool is owned by one parse. Buffers are lent out through
//! [`ScratchString`] guards and go back to the pool, cleared, when the guard
//! drops, so early returns cannot leak them.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Buffers larger than this are dropped instead of pooled.
const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Pool of string buffers for one document.
#[derive(Debug, Default)]
pub struct Scratch {
    strings: RefCell<Vec<String>>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow an empty string buffer.
    pub fn string(&self) -> ScratchString<'_> {
        let buf = self.strings.borrow_mut().pop().unwrap_or_default();
        debug_assert!(buf.is_empty());
        ScratchString { pool: self, buf }
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.strings.borrow().len()
    }
}

/// A pooled string; returned to its [`Scratch`] on drop.
#[derive(Debug)]
pub struct ScratchString<'a> {
    pool: &'a Scratch,
    buf: String,
}

impl Deref for ScratchString<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for ScratchString<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for ScratchString<'_> {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        if buf.capacity() <= MAX_POOLED_CAPACITY {
            buf.clear();
            self.pool.strings.borrow_mut().push(buf);
        }
    }
}
