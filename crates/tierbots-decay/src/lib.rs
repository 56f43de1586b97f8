//! Tick-indexed decay and growth arithmetic.
//!
//! Every mutable square or property in the world is represented not by a
//! live decaying value but by the tick at which it will reach zero (or, for
//! growth, the tick at which it reaches its max). Reading the current value
//! is a pure function of `(now, zero_tick)`; applying a change is a pure
//! function that produces a new `zero_tick`. This keeps tick-advance an O(1)
//! no-op for every square that isn't actively being read or written.

/// Ticks remaining before `time` reaches `zero_time`, zero if already past.
/// `decay` is the fraction of the tracked quantity lost per tick.
///
/// The result is ceil-rounded: a quantity with any ticks left to decay
/// always reads back as at least 1, never 0, until `time >= zero_time`.
pub fn param_by_zerotime(time: i64, zero_time: i64, decay: f64) -> i64 {
    if time >= zero_time {
        return 0;
    }
    ((zero_time - time) as f64 * decay).ceil() as i64
}

/// The new zero-tick after applying `param_change` (positive to add,
/// negative to remove) to a quantity currently decaying at `decay` per tick
/// and due to hit zero at `zero_time`.
///
/// If the quantity has already bottomed out (`time >= zero_time`), the
/// change is applied starting from `now` rather than from the stale
/// `zero_time`. The returned zero-tick never moves earlier than `time`.
pub fn zerotime_by_param_change(time: i64, zero_time: i64, decay: f64, param_change: i64) -> i64 {
    let base = if time >= zero_time { time } else { zero_time };
    let delta = (param_change as f64 / decay).ceil() as i64;
    let nt = base + delta;
    nt.max(time)
}

/// The current value of a quantity growing toward `max_value`, reaching it
/// at `fill_time` and growing at `growth` per tick.
pub fn param_by_filltime(time: i64, fill_time: i64, growth: f64, max_value: i64) -> i64 {
    if time >= fill_time {
        return max_value;
    }
    max_value - ((fill_time - time) as f64 * growth).ceil() as i64
}

/// A non-zero decay/growth rate, guarding the division in
/// [`zerotime_by_param_change`] against a caller accidentally passing 0.0.
pub fn checked_rate(rate: f64) -> Option<f64> {
    if rate > 0.0 && rate.is_finite() {
        Some(rate)
    } else {
        None
    }
}

/// A tick counter, newtyped so it can't be confused with an entity id or a
/// raw property value when threaded through the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(pub i64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    pub fn succ(self) -> Tick {
        Tick(self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_by_zerotime_rounds_up_remaining_ticks() {
        assert_eq!(param_by_zerotime(49, 60, 0.1), 2);
        assert_eq!(param_by_zerotime(50, 60, 0.1), 1);
        assert_eq!(param_by_zerotime(59, 60, 0.1), 1);
        assert_eq!(param_by_zerotime(60, 60, 0.1), 0);
        assert_eq!(param_by_zerotime(1000, 60, 0.1), 0);
    }

    #[test]
    fn zerotime_by_param_change_shifts_the_zero_tick() {
        assert_eq!(zerotime_by_param_change(50, 60, 0.1, 1), 70);
        assert_eq!(zerotime_by_param_change(50, 62, 0.1, 1), 72);
        assert_eq!(zerotime_by_param_change(49, 60, 0.1, -1), 50);
        assert_eq!(zerotime_by_param_change(50, 60, 0.1, -1), 50);
        assert_eq!(zerotime_by_param_change(50, 60, 0.1, -2), 50);
    }

    #[test]
    fn param_by_filltime_rounds_up_remaining_growth() {
        assert_eq!(param_by_filltime(49, 60, 0.1, 100), 98);
        assert_eq!(param_by_filltime(50, 60, 0.1, 100), 99);
        assert_eq!(param_by_filltime(59, 60, 0.1, 100), 99);
        assert_eq!(param_by_filltime(60, 60, 0.1, 100), 100);
        assert_eq!(param_by_filltime(1000, 60, 0.1, 100), 100);
    }

    #[test]
    fn checked_rate_rejects_zero_and_negative() {
        assert_eq!(checked_rate(0.0), None);
        assert_eq!(checked_rate(-0.1), None);
        assert_eq!(checked_rate(0.1), Some(0.1));
    }

    #[test]
    fn tick_succ_increments() {
        assert_eq!(Tick::ZERO.succ(), Tick(1));
    }
}
