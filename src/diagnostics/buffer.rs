// SPDX-License-Identifier: MPL-2.0
//! Fixed-capacity history used by the session journal.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::JournalCapacity;

/// Keeps the most recent entries, oldest first.
///
/// ```
/// use viewer_session::diagnostics::{CircularBuffer, JournalCapacity};
///
/// let mut history = CircularBuffer::new(JournalCapacity::new(16));
/// for n in 0..20 {
///     history.push(n);
/// }
/// assert_eq!(history.iter().next(), Some(&4));
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: JournalCapacity) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity.value()),
            capacity: capacity.value(),
        }
    }

    /// Appends `item`, returning the entry it evicted once full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.data.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_reports_evicted_entry_once_full() {
        let mut history = CircularBuffer::new(JournalCapacity::new(16));
        for n in 0..16 {
            assert_eq!(history.push(n), None);
        }
        assert_eq!(history.push(16), Some(0));
        assert_eq!(history.len(), 16);
        assert_eq!(history.last(), Some(&16));
    }
}
