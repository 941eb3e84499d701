// SPDX-License-Identifier: MPL-2.0
//! Diagnostics newtypes.

/// Journal capacity bounds, in entries.
pub mod journal_capacity_bounds {
    pub const MIN: usize = 16;
    pub const MAX: usize = 4096;
    pub const DEFAULT: usize = 256;
}

/// How many journal entries a session keeps before evicting the oldest.
///
/// Always within [`journal_capacity_bounds`]; out-of-range requests are
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCapacity(usize);

impl JournalCapacity {
    #[must_use]
    pub fn new(entries: usize) -> Self {
        Self(entries.clamp(journal_capacity_bounds::MIN, journal_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for JournalCapacity {
    fn default() -> Self {
        Self(journal_capacity_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_and_huge_requests_are_clamped() {
        assert_eq!(JournalCapacity::new(1).value(), 16);
        assert_eq!(JournalCapacity::new(1 << 20).value(), 4096);
        assert_eq!(JournalCapacity::new(512).value(), 512);
    }
}
