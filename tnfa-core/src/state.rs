//! State identifiers and the allocator that issues them
//!
//! Identifiers are never reused for the lifetime of an allocator, so
//! automata built from the same allocator can always be combined without
//! collisions, even when they come from different patterns.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An NFA state ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u64);

impl StateId {
    /// The raw numeric value of this ID
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues fresh, monotonically increasing state IDs
///
/// Backed by an atomic counter, so one allocator can be shared by reference
/// between threads compiling independent patterns.
#[derive(Debug, Default)]
pub struct StateAllocator {
    next: AtomicU64,
}

impl StateAllocator {
    /// Create an allocator whose first ID is 0
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create an allocator whose first ID is `first`
    ///
    /// Allocators started at non-overlapping offsets hand out disjoint IDs
    /// as long as neither runs into the other's range.
    pub const fn starting_at(first: u64) -> Self {
        StateAllocator {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate a new state and return its ID
    pub fn fresh(&self) -> StateId {
        StateId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID the next call to [`fresh`](Self::fresh) will return
    pub fn peek(&self) -> StateId {
        StateId(self.next.load(Ordering::Relaxed))
    }
}
