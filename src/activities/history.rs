use std::collections::HashSet;

use crate::transactions::Activity;

/// Activity history with its dedup state
///
/// Entries stay sorted by timestamp, newest first, and never exceed `cap`.
/// The known-signatures set only grows (or is cleared wholesale); trimming
/// old entries does not forget their signatures.
#[derive(Debug, Clone)]
pub struct ActivityHistory {
    entries: Vec<Activity>,
    known_signatures: HashSet<String>,
    cap: usize,
}

impl ActivityHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            known_signatures: HashSet::new(),
            cap,
        }
    }

    /// Rebuild from persisted entries, seeding the known set from them
    pub fn seeded(entries: Vec<Activity>, cap: usize) -> Self {
        let mut history = Self::new(cap);
        history.merge(entries);
        history
    }

    pub fn entries(&self) -> &[Activity] {
        &self.entries
    }

    /// Newest `limit` entries
    pub fn recent(&self, limit: usize) -> &[Activity] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn known_signatures(&self) -> &HashSet<String> {
        &self.known_signatures
    }

    pub fn is_known(&self, signature: &str) -> bool {
        self.known_signatures.contains(signature)
    }

    /// Merge new activities; returns the ids of the entries actually added
    ///
    /// Entries whose id is already present are dropped. The rest are placed
    /// in front of the history, which is then stably re-sorted by timestamp
    /// and truncated to the cap.
    pub fn merge(&mut self, incoming: Vec<Activity>) -> Vec<String> {
        let mut ids: HashSet<String> = self.entries.iter().map(|a| a.id.clone()).collect();
        let mut fresh = Vec::with_capacity(incoming.len());

        for activity in incoming {
            self.known_signatures.insert(activity.signature.clone());
            if ids.insert(activity.id.clone()) {
                fresh.push(activity);
            }
        }

        let added: Vec<String> = fresh.iter().map(|a| a.id.clone()).collect();
        if added.is_empty() {
            return added;
        }

        fresh.append(&mut self.entries);
        fresh.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        fresh.truncate(self.cap);
        self.entries = fresh;
        added
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.known_signatures.clear();
    }
}
