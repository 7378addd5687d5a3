//! Gap-filled daily buckets.
//!
//! A plain `GROUP BY day` drops days with no rows. Here the spine of every day
//! in the window is built first, seeded with zero, and records are accumulated
//! into it, so the output always holds exactly one point per spine day.

use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};

use crate::config::SECONDS_PER_DAY;
use crate::types::TimeseriesDatapoint;

/// Truncate a unix timestamp (seconds) to its UTC day boundary.
#[inline]
pub fn day_trunc(ts: i64) -> i64 {
    ts - ts.rem_euclid(SECONDS_PER_DAY)
}

/// Every day boundary from `day_trunc(now - window_days)` through
/// `day_trunc(now)` inclusive, ascending.
pub fn day_spine(now: i64, window_days: i64) -> Vec<i64> {
    let first = day_trunc(now - window_days * SECONDS_PER_DAY);
    let last = day_trunc(now);
    (first..=last).step_by(SECONDS_PER_DAY as usize).collect()
}

/// Sum `(timestamp, amount)` records into the spine's days. Records falling
/// outside the spine are ignored; empty days stay at zero.
pub fn fill_buckets<I>(spine: &[i64], records: I) -> Vec<TimeseriesDatapoint>
where
    I: IntoIterator<Item = (i64, BigDecimal)>,
{
    let mut buckets: BTreeMap<i64, BigDecimal> =
        spine.iter().map(|day| (*day, BigDecimal::zero())).collect();

    for (ts, amount) in records {
        if let Some(slot) = buckets.get_mut(&day_trunc(ts)) {
            *slot += amount;
        }
    }

    buckets
        .into_iter()
        .map(|(date, amount)| TimeseriesDatapoint { date, amount })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::*;
    use crate::config::VOLUME_WINDOW_DAYS;
    use crate::numeric::encode;

    const DAY: i64 = SECONDS_PER_DAY;
    // 2023-11-15 13:46:40 UTC
    const NOW: i64 = 1_700_056_000;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn day_trunc_floors_to_midnight() {
        assert_eq!(day_trunc(NOW), 1_700_006_400);
        assert_eq!(day_trunc(1_700_006_400), 1_700_006_400);
        assert_eq!(day_trunc(-1), -DAY);
    }

    #[test]
    fn spine_covers_thirty_days_plus_today() {
        let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
        assert_eq!(spine.len(), 31);
        assert_eq!(spine.first().copied(), Some(day_trunc(NOW) - 30 * DAY));
        assert_eq!(spine.last().copied(), Some(day_trunc(NOW)));
        assert!(spine.windows(2).all(|w| w[1] - w[0] == DAY));
    }

    #[test]
    fn spine_at_exact_midnight_has_same_length() {
        let midnight = day_trunc(NOW);
        assert_eq!(day_spine(midnight, VOLUME_WINDOW_DAYS).len(), 31);
    }

    #[test]
    fn no_records_yields_zero_filled_spine() {
        let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
        let points = fill_buckets(&spine, Vec::new());

        assert_eq!(points.len(), spine.len());
        for (point, day) in points.iter().zip(&spine) {
            assert_eq!(point.date, *day);
            assert_eq!(encode(&point.amount), "0.0000000000000000");
        }
    }

    #[test]
    fn records_accumulate_into_their_day() {
        let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
        let d = spine[10];
        let records = vec![
            (d + 5, dec("60")),
            (d + DAY - 1, dec("40")),
            (d + 3 * DAY, dec("0.1")),
            (d + 3 * DAY + 10, dec("0.2")),
        ];

        let points = fill_buckets(&spine, records);
        assert_eq!(points.len(), 31);
        assert_eq!(encode(&points[10].amount), "100.0000000000000000");
        assert_eq!(encode(&points[11].amount), "0.0000000000000000");
        // Exact decimal sum, no 0.30000000000000004.
        assert_eq!(encode(&points[13].amount), "0.3000000000000000");
    }

    #[test]
    fn records_outside_spine_are_ignored() {
        let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
        let records = vec![
            (spine[0] - 1, dec("5")),
            (day_trunc(NOW) + DAY, dec("7")),
        ];

        let points = fill_buckets(&spine, records);
        assert_eq!(points.len(), 31);
        assert!(points.iter().all(|p| p.amount.is_zero()));
    }

    #[test]
    fn dates_are_strictly_ascending() {
        let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
        let points = fill_buckets(&spine, vec![(NOW, dec("1"))]);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(points.last().map(|p| p.amount.clone()), Some(dec("1")));
    }

    fn arb_records() -> impl Strategy<Value = Vec<(i64, BigDecimal)>> {
        prop::collection::vec(
            (-40 * DAY..10 * DAY, 0u64..1_000_000_000, 0u32..8),
            0..64,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(offset, digits, scale)| {
                    (NOW + offset, BigDecimal::new(digits.into(), i64::from(scale)))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_spine_has_one_point_per_day(now in 0i64..4_000_000_000) {
            let spine = day_spine(now, VOLUME_WINDOW_DAYS);
            prop_assert_eq!(spine.len(), 31);
            prop_assert_eq!(spine[30], day_trunc(now));
            prop_assert!(spine.windows(2).all(|w| w[1] - w[0] == DAY));
        }

        #[test]
        fn prop_fill_keeps_spine_shape(records in arb_records()) {
            let spine = day_spine(NOW, VOLUME_WINDOW_DAYS);
            let in_window: BigDecimal = records
                .iter()
                .filter(|(ts, _)| spine.contains(&day_trunc(*ts)))
                .fold(BigDecimal::zero(), |acc, (_, amount)| acc + amount);

            let points = fill_buckets(&spine, records);
            prop_assert_eq!(points.len(), 31);
            prop_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
            prop_assert!(points.iter().map(|p| p.date).eq(spine.iter().copied()));

            let total = points
                .iter()
                .fold(BigDecimal::zero(), |acc, p| acc + &p.amount);
            prop_assert_eq!(total, in_window);
        }
    }
}
