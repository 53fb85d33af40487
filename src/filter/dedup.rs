// Fri Oct 16 2026 - Alex

use ahash::AHashSet;

/// Decorated names already written to the export listing.
#[derive(Debug, Default)]
pub struct TakenSet {
    taken: AHashSet<String>,
    duplicates: usize,
}

impl TakenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `decorated` and returns true if it was not taken yet.
    /// A repeat is counted as a duplicate and returns false.
    pub fn take(&mut self, decorated: &str) -> bool {
        if self.taken.contains(decorated) {
            self.duplicates += 1;
            return false;
        }
        self.taken.insert(decorated.to_string());
        true
    }

    /// Gate for callers that want to skip work on names already taken.
    /// Counts the duplicate without inserting anything.
    pub fn reject_taken(&mut self, decorated: &str) -> bool {
        if self.taken.contains(decorated) {
            self.duplicates += 1;
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
