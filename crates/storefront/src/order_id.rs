//! Locally generated order ids.

use std::sync::atomic::{AtomicU64, Ordering};

use common::OrderId;

/// Issues `ORD-xxxxxxxx` ids from the wall clock.
///
/// Two calls in the same millisecond, or a clock that steps backwards,
/// would repeat an id; the generator bumps such readings past the last one
/// it handed out so ids stay unique for the life of the process.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicU64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for the current time.
    pub fn next(&self) -> OrderId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now)
    }

    /// Returns the id for a given millisecond reading.
    pub fn next_at(&self, millis: u64) -> OrderId {
        let mut issued = millis;
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = if millis > last { millis } else { last + 1 };
                Some(issued)
            });
        OrderId::from_millis(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let ids = OrderIdGenerator::new();
        assert_eq!(ids.next_at(1_700_000_123_456).as_str(), "ORD-00123456");
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let ids = OrderIdGenerator::new();
        let a = ids.next_at(1_700_000_000_001);
        let b = ids.next_at(1_700_000_000_001);
        assert_eq!(a.as_str(), "ORD-00000001");
        assert_eq!(b.as_str(), "ORD-00000002");
    }

    #[test]
    fn test_clock_going_backwards() {
        let ids = OrderIdGenerator::new();
        let a = ids.next_at(5_000);
        let b = ids.next_at(4_000);
        assert_ne!(a, b);
        assert_eq!(b.as_str(), "ORD-00005001");
    }

    #[test]
    fn test_wall_clock_ids_are_unique() {
        let ids = OrderIdGenerator::new();
        let a = ids.next();
        let b = ids.next();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ORD-"));
    }
}
