//! The bounded quantity counter.

use stockroom_core::MAX_QUANTITY;

use crate::notice::Notice;

/// Result of one counter step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterStep {
    /// The counter moved to this value.
    Changed(u8),
    /// The counter was already at a bound and did not move.
    AtBoundary(Notice),
}

/// A quantity in `0..=MAX_QUANTITY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuantityCounter(u8);

impl QuantityCounter {
    /// Build a counter, clamping `value` into range.
    ///
    /// Returns the counter and whether clamping happened.
    pub fn clamped(value: i64) -> (Self, bool) {
        let bounded = value.clamp(0, i64::from(MAX_QUANTITY));
        // In range after the clamp.
        (Self(bounded as u8), bounded != value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn increment(&mut self) -> CounterStep {
        if self.0 >= MAX_QUANTITY {
            return CounterStep::AtBoundary(Notice::QuantityAtMaximum);
        }
        self.0 += 1;
        CounterStep::Changed(self.0)
    }

    pub fn decrement(&mut self) -> CounterStep {
        if self.0 == 0 {
            return CounterStep::AtBoundary(Notice::QuantityAtMinimum);
        }
        self.0 -= 1;
        CounterStep::Changed(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments_to_maximum() {
        let mut counter = QuantityCounter::default();
        for expected in 1..=MAX_QUANTITY {
            assert_eq!(counter.increment(), CounterStep::Changed(expected));
        }
        assert_eq!(
            counter.increment(),
            CounterStep::AtBoundary(Notice::QuantityAtMaximum)
        );
        assert_eq!(counter.value(), MAX_QUANTITY);

        assert_eq!(counter.decrement(), CounterStep::Changed(MAX_QUANTITY - 1));
    }

    #[test]
    fn test_decrement_at_zero() {
        let mut counter = QuantityCounter::default();
        assert_eq!(
            counter.decrement(),
            CounterStep::AtBoundary(Notice::QuantityAtMinimum)
        );
        assert!(counter.is_zero());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(QuantityCounter::clamped(42), (QuantityCounter(42), false));
        assert_eq!(QuantityCounter::clamped(250), (QuantityCounter(100), true));
        assert_eq!(QuantityCounter::clamped(-3), (QuantityCounter(0), true));
    }
}
