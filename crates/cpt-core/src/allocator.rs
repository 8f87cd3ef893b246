//! Contiguous, balanced partition of a pool across plan days.

use std::ops::Range;

/// Slice of the pool assigned to `day` (1-based):
/// `[floor(len * (day - 1) / days), floor(len * day / days))`.
///
/// Returns an empty range when `days` is zero or `day` is outside `1..=days`.
pub fn day_range(pool_len: usize, days: u32, day: u32) -> Range<usize> {
    if days == 0 || day == 0 || day > days {
        return 0..0;
    }

    let n = pool_len as u64;
    let d = u64::from(days);
    let start = n * u64::from(day - 1) / d;
    let end = n * u64::from(day) / d;

    start as usize..end as usize
}

/// All day slices in order, paired with their day number.
pub fn day_ranges(pool_len: usize, days: u32) -> impl Iterator<Item = (u32, Range<usize>)> {
    (1..=days).map(move |day| (day, day_range(pool_len, days, day)))
}

/// Tag every pool entry with the day it lands on, preserving pool order.
pub fn allocate<T>(pool: Vec<T>, days: u32) -> Vec<(u32, T)> {
    let len = pool.len();
    let mut items = pool.into_iter();
    let mut assigned = Vec::with_capacity(len);

    for (day, range) in day_ranges(len, days) {
        assigned.extend(items.by_ref().take(range.len()).map(|item| (day, item)));
    }

    assigned
}
