//! Event queue with deterministic ordering.

use crate::SourceIndex;
use std::cmp::Ordering;
use std::time::Duration;

/// Key for ordering events in the queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Source index (deterministic ordering)
/// 3. Sequence number (FIFO for same time/source)
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EventKey {
    /// When this event should be processed.
    pub time: Duration,
    /// Which traffic source receives this event.
    pub source: SourceIndex,
    /// Sequence number for deterministic FIFO ordering.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match self.source.cmp(&other.source) {
            Ordering::Equal => {}
            ord => return ord,
        }

        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_ordering() {
        let earlier = EventKey {
            time: Duration::from_secs(1),
            source: 1,
            sequence: 5,
        };
        let later = EventKey {
            time: Duration::from_secs(2),
            source: 0,
            sequence: 1,
        };
        assert!(earlier < later);
    }

    #[test]
    fn test_source_ordering_at_same_time() {
        let source0 = EventKey {
            time: Duration::from_secs(1),
            source: 0,
            sequence: 2,
        };
        let source1 = EventKey {
            time: Duration::from_secs(1),
            source: 1,
            sequence: 1,
        };
        assert!(source0 < source1, "Lower source index should process first");
    }

    #[test]
    fn test_fifo_for_same_time_and_source() {
        let first = EventKey {
            time: Duration::from_millis(500),
            source: 3,
            sequence: 1,
        };
        let second = EventKey {
            sequence: 2,
            ..first
        };
        assert!(first < second);
    }
}
