use crate::model::HistoryEntry;

/// Lookups made during this run, oldest first internally.
///
/// Unbounded and never persisted. Reads come back most-recent-first.
#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// The `limit` most recent entries (all of them for `None`), newest first.
    pub fn list(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let limit = limit.unwrap_or(self.entries.len());
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
