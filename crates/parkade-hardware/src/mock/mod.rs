//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without requiring physical hardware. Devices that the
//! controller takes ownership of record what happened into a shared
//! [`Journal`], so a test can keep a clone and inspect it afterwards.

pub mod clock;
pub mod keypad;
pub mod pins;

use std::sync::{Arc, Mutex, MutexGuard};

// Re-export commonly used types
pub use clock::VirtualClock;
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use pins::{MockInput, MockInputHandle, MockOutput, PinEvent, PinJournal, ScriptedInput};

/// Append-only record shared between a mock device and its observers.
#[derive(Debug)]
pub struct Journal<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Journal<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        self.lock().push(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run `f` over the recorded entries.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        // A panicking test thread must not hide the entries from the others.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Journal<T> {
    /// Copy of every entry, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}

impl<T> Clone for Journal<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_clones_share_entries() {
        let journal = Journal::new();
        let observer = journal.clone();

        journal.push(1);
        journal.push(2);

        assert_eq!(observer.snapshot(), vec![1, 2]);
        assert_eq!(observer.len(), 2);
        assert_eq!(observer.with(|e| e.iter().sum::<i32>()), 3);
    }
}
