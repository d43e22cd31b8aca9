//! A thread-safe registry of compiled POSIX regular expressions addressed
//! by opaque handles.
//!
//! # Example
//!
//! ```
//! use ere_registry::{CompileFlags, ExecFlags, Registry};
//!
//! let registry = Registry::new();
//! let (handle, nsub) = registry.compile("a(b)*c", CompileFlags::EXTENDED).unwrap();
//! assert_eq!(1, nsub);
//!
//! let captures = registry.exec(handle, b"abbbc", ExecFlags::empty()).unwrap().unwrap();
//! assert_eq!(vec![(0, 5), (3, 4)], captures.to_offsets());
//!
//! registry.release(handle).unwrap();
//! assert!(registry.exec(handle, b"abc", ExecFlags::empty()).is_err());
//! ```

mod error;
mod pattern;

pub use ere_compiler::{CompileFlags, PatternError, PatternErrorKind};
pub use ere_runtime::{Captures, ExecError, ExecFlags, ExecOptions, SaveGroupSlot};
pub use error::{RegistryError, RegistryResult};
pub use pattern::CompiledPattern;

use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An opaque reference to a pattern held by a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns compiled patterns on behalf of callers that only hold a [`Handle`].
///
/// Lookups share a read lock, so any number of threads may evaluate
/// patterns concurrently. Handles are minted from a counter and are never
/// reissued after release.
#[derive(Debug)]
pub struct Registry {
    patterns: RwLock<FastHashMap<Handle, Arc<CompiledPattern>>>,
    next_id: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            patterns: RwLock::new(FastHashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` and registers it, returning its handle and the
    /// number of capturing groups it defines.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn compile(&self, pattern: &str, flags: CompileFlags) -> RegistryResult<(Handle, usize)> {
        let compiled = CompiledPattern::new(pattern, flags).map_err(|err| {
            tracing::event!(
                tracing::Level::DEBUG,
                operation = "compile",
                kind = %err.kind(),
                position = err.position() as u64,
                "pattern rejected"
            );
            err
        })?;
        let nsub = compiled.nsub();

        Ok((self.register(compiled), nsub))
    }

    /// Takes ownership of an already compiled pattern.
    pub fn register(&self, compiled: CompiledPattern) -> Handle {
        let handle = Handle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.patterns.write().insert(handle, Arc::new(compiled));

        tracing::event!(
            tracing::Level::TRACE,
            operation = "register",
            handle = handle.0
        );
        handle
    }

    /// Like [`Registry::compile`], but releases the pattern once the
    /// returned guard is dropped.
    pub fn compile_scoped(
        &self,
        pattern: &str,
        flags: CompileFlags,
    ) -> RegistryResult<(ScopedHandle<'_>, usize)> {
        let (handle, nsub) = self.compile(pattern, flags)?;

        Ok((
            ScopedHandle {
                registry: self,
                handle,
            },
            nsub,
        ))
    }

    pub fn lookup(&self, handle: Handle) -> RegistryResult<Arc<CompiledPattern>> {
        self.patterns
            .read()
            .get(&handle)
            .cloned()
            .ok_or(RegistryError::InvalidHandle(handle))
    }

    /// Drops the registry's reference to a pattern. Matches already in
    /// flight keep their own reference and run to completion.
    pub fn release(&self, handle: Handle) -> RegistryResult<()> {
        let removed = self.patterns.write().remove(&handle);

        tracing::event!(
            tracing::Level::TRACE,
            operation = "release",
            handle = handle.0,
            found = removed.is_some()
        );

        removed
            .map(|_| ())
            .ok_or(RegistryError::InvalidHandle(handle))
    }

    pub fn exec(
        &self,
        handle: Handle,
        input: &[u8],
        flags: ExecFlags,
    ) -> RegistryResult<Option<Captures>> {
        self.exec_with_options(handle, input, &ExecOptions::from(flags))
    }

    pub fn exec_with_options(
        &self,
        handle: Handle,
        input: &[u8],
        options: &ExecOptions,
    ) -> RegistryResult<Option<Captures>> {
        // the lock is released before matching begins.
        let compiled = self.lookup(handle)?;
        let res = compiled.exec(input, options)?;

        tracing::event!(
            tracing::Level::TRACE,
            operation = "exec",
            handle = handle.0,
            input_len = input.len() as u64,
            matched = res.is_some()
        );

        Ok(res)
    }

    /// The number of live handles.
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle that is released from its registry when dropped.
#[derive(Debug)]
pub struct ScopedHandle<'a> {
    registry: &'a Registry,
    handle: Handle,
}

impl<'a> ScopedHandle<'a> {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn exec(&self, input: &[u8], flags: ExecFlags) -> RegistryResult<Option<Captures>> {
        self.registry.exec(self.handle, input, flags)
    }
}

impl<'a> Drop for ScopedHandle<'a> {
    fn drop(&mut self) {
        // a handle released by hand ahead of the guard is not an error here.
        let _ = self.registry.release(self.handle);
    }
}
