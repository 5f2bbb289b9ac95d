use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time for note timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Produces ids for newly created notes.
pub trait IdGenerator {
    /// Next id, given the creation time of the note it is for.
    fn next_id(&self, now: DateTime<Utc>) -> String;
}

/// Ids are the creation time in Unix milliseconds.
///
/// Never hands out the same value twice: two notes created within the same
/// millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: Cell<i64>,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let next = now.timestamp_millis().max(self.last.get() + 1);
        self.last.set(next);
        next.to_string()
    }
}

/// Ids `1`, `2`, `3`, ... regardless of time.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, _now: DateTime<Utc>) -> String {
        let next = self.next.get() + 1;
        self.next.set(next);
        next.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_ids_use_millis() {
        let ids = TimestampIds::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(ids.next_id(at), "1700000000123");
    }

    #[test]
    fn test_timestamp_ids_never_repeat() {
        let ids = TimestampIds::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(ids.next_id(at), "1700000000000");
        assert_eq!(ids.next_id(at), "1700000000001");

        // Clock going backwards still yields increasing ids
        let earlier = Utc.timestamp_millis_opt(1_600_000_000_000).unwrap();
        assert_eq!(ids.next_id(earlier), "1700000000002");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        let at = Utc::now();
        assert_eq!(ids.next_id(at), "1");
        assert_eq!(ids.next_id(at), "2");
    }

    #[test]
    fn test_fixed_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), start + Duration::seconds(5));
    }
}
