//! Wraparound hour-range predicate

/// Test whether `hour` falls inside the window `[start, end)`
///
/// Cases are checked in this order:
/// 1. `start == end` is the "all day" sentinel and matches every hour.
/// 2. `end > start` is a plain half-open window.
/// 3. `end < start` wraps past midnight.
///
/// All arguments are hours in `0..=23`.
pub const fn in_range(hour: u8, start: u8, end: u8) -> bool {
    if start == end {
        true
    } else if end > start {
        start <= hour && hour < end
    } else {
        hour >= start || hour < end
    }
}
