use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing mutations applied to the address book.
#[derive(Default)]
pub struct ContactsMetrics {
    persons_created: AtomicU64,
    persons_updated: AtomicU64,
    persons_deleted: AtomicU64,
}

impl ContactsMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a person created through the collection endpoint.
    pub fn record_created(&self) {
        self.persons_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update of an existing person.
    pub fn record_updated(&self) {
        self.persons_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful removal.
    pub fn record_deleted(&self) {
        self.persons_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters alongside the stored person count.
    pub fn snapshot(&self, persons_stored: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            persons_created: self.persons_created.load(Ordering::Relaxed),
            persons_updated: self.persons_updated.load(Ordering::Relaxed),
            persons_deleted: self.persons_deleted.load(Ordering::Relaxed),
            persons_stored: persons_stored as u64,
        }
    }
}

/// Immutable view of mutation counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    /// Persons created since startup.
    pub persons_created: u64,
    /// Successful updates since startup.
    pub persons_updated: u64,
    /// Successful deletions since startup.
    pub persons_deleted: u64,
    /// Persons currently held by the book.
    pub persons_stored: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_mutation_kind() {
        let metrics = ContactsMetrics::new();
        metrics.record_created();
        metrics.record_created();
        metrics.record_updated();
        metrics.record_deleted();

        let snapshot = metrics.snapshot(1);
        assert_eq!(snapshot.persons_created, 2);
        assert_eq!(snapshot.persons_updated, 1);
        assert_eq!(snapshot.persons_deleted, 1);
        assert_eq!(snapshot.persons_stored, 1);
    }

    #[test]
    fn snapshot_starts_empty() {
        let metrics = ContactsMetrics::new();
        assert_eq!(
            metrics.snapshot(0),
            MetricsSnapshot {
                persons_created: 0,
                persons_updated: 0,
                persons_deleted: 0,
                persons_stored: 0,
            }
        );
    }
}
