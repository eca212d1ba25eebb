//! Append-only record of every proposal and the feedback it got.

use super::entities::{HistoryEntry, HitCount, Proposal};

/// Chronological history of a session.
///
/// Entries are never updated or removed once appended.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record feedback for a proposal and return the new entry.
    pub fn append(&mut self, proposal: Proposal, hits: HitCount) -> &HistoryEntry {
        let attempt = self.entries.len() + 1;
        self.entries.push(HistoryEntry::new(attempt, proposal, hits));
        &self.entries[attempt - 1]
    }

    /// Entries in append order. The iterator can be cloned to restart it.
    pub fn entries(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HistoryLedger {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(raw: &[&str]) -> Proposal {
        Proposal::from_wire(raw).unwrap()
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = HistoryLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.entries().count(), 0);
        assert!(ledger.last().is_none());
    }

    #[test]
    fn test_append_keeps_order_and_numbers_attempts() {
        let mut ledger = HistoryLedger::new();
        ledger.append(proposal(&["p0c0", "p1c1"]), HitCount::new(0, 2).unwrap());
        ledger.append(proposal(&["p0c1", "p1c0"]), HitCount::new(1, 2).unwrap());
        let last = ledger.append(proposal(&["p0c1", "p1c1"]), HitCount::new(2, 2).unwrap());
        assert_eq!(last.attempt(), 3);

        let attempts: Vec<_> = ledger.entries().map(HistoryEntry::attempt).collect();
        assert_eq!(attempts, vec![1, 2, 3]);

        let hits: Vec<_> = ledger.entries().map(|e| e.hits().get()).collect();
        assert_eq!(hits, vec![0, 1, 2]);
        assert_eq!(ledger.entries().next().unwrap().proposal().to_string(), "c0 c1");
    }

    #[test]
    fn test_entries_view_is_restartable() {
        let mut ledger = HistoryLedger::new();
        ledger.append(proposal(&["p0c0"]), HitCount::default());
        ledger.append(proposal(&["p0c1"]), HitCount::default());

        let view = ledger.entries();
        let first_pass: Vec<_> = view.clone().collect();
        let second_pass: Vec<_> = view.collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!((&ledger).into_iter().count(), 2);
    }
}
