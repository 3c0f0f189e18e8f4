use serde::{Deserialize, Serialize};

/// A counter object used to implement auto-increment IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub next: u64,
}

impl Counter {
    /// Create a new `Counter` starting at the given value.
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    /// Retrieve the next value of the counter, advancing it.
    pub fn next(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(1)
    }
}
