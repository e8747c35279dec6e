//! Read/write gate ordering pack reads against pack mutations.
//!
//! The stores are individually thread-safe, so the gate is not needed for
//! memory safety. It exists so that multi-step operations (a listing pass, a
//! batched ingestion commit) are atomic with respect to each other:
//!
//! ```text
//! read ops  (lookup, namespaces, list) ── shared
//! write ops (put, remove, ingest)      ── exclusive
//! ```
//!
//! Acquisition first tries the lock without blocking and only parks the
//! thread when that fails. Guards release on drop, so every exit path,
//! including early `None` returns, gives the gate back.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Coordinates access to the pack's stores.
#[derive(Debug, Default)]
pub struct AccessGate {
    lock: RwLock<()>,
}

/// Shared access held for the duration of a read operation.
pub type ReadPass<'a> = RwLockReadGuard<'a, ()>;

/// Exclusive access held for the duration of a mutation.
pub type WritePass<'a> = RwLockWriteGuard<'a, ()>;

impl AccessGate {
    /// Create an open gate.
    pub const fn new() -> Self {
        Self {
            lock: RwLock::new(()),
        }
    }

    /// Acquire shared access.
    pub fn read(&self) -> ReadPass<'_> {
        if let Some(pass) = self.lock.try_read() {
            return pass;
        }
        tracing::trace!("access gate contended, waiting for shared access");
        self.lock.read()
    }

    /// Acquire exclusive access.
    pub fn write(&self) -> WritePass<'_> {
        if let Some(pass) = self.lock.try_write() {
            return pass;
        }
        tracing::trace!("access gate contended, waiting for exclusive access");
        self.lock.write()
    }

    /// Check whether a writer currently holds the gate.
    #[inline]
    pub fn is_write_locked(&self) -> bool {
        self.lock.is_locked_exclusive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_readers_share() {
        let gate = AccessGate::new();
        let first = gate.read();
        let second = gate.read();
        assert!(!gate.is_write_locked());
        drop(first);
        drop(second);
    }

    #[test]
    fn test_released_on_drop() {
        let gate = AccessGate::new();
        {
            let _pass = gate.write();
            assert!(gate.is_write_locked());
        }
        assert!(!gate.is_write_locked());
        let _pass = gate.write();
    }

    #[test]
    fn test_writer_waits_for_reader() {
        let gate = Arc::new(AccessGate::new());
        let written = Arc::new(AtomicBool::new(false));

        let pass = gate.read();
        let writer = {
            let gate = Arc::clone(&gate);
            let written = Arc::clone(&written);
            thread::spawn(move || {
                let _pass = gate.write();
                written.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!written.load(Ordering::SeqCst));
        drop(pass);

        writer.join().unwrap();
        assert!(written.load(Ordering::SeqCst));
    }
}
