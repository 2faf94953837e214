//! Averages over an entry's history.
//!
//! Buckets samples by hour of day (UTC) or by weekday and reports the mean
//! player count per bucket. Empty buckets report `0.0` with a sample count
//! of zero so callers can tell "no data" from "nobody playing".

use chrono::{Datelike, Timelike};
use hubwatch_types::HistoryPoint;
use serde::Serialize;

/// Mean player count within one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketAverage {
    /// Bucket index: hour `0..24`, or weekday `0..7` counted from Monday.
    pub bucket: u32,
    /// Mean players across the bucket's samples.
    pub players: f64,
    /// Number of samples in the bucket.
    pub samples: u32,
}

/// Average players per hour of day.
pub fn average_by_hour(points: &[HistoryPoint]) -> Vec<BucketAverage> {
    average_by(points, 24, |p| p.time.hour())
}

/// Average players per weekday, Monday first.
pub fn average_by_weekday(points: &[HistoryPoint]) -> Vec<BucketAverage> {
    average_by(points, 7, |p| p.time.weekday().num_days_from_monday())
}

/// Name of a weekday bucket index as produced by [`average_by_weekday`].
pub const fn weekday_name(bucket: u32) -> Option<&'static str> {
    match bucket {
        0 => Some("Monday"),
        1 => Some("Tuesday"),
        2 => Some("Wednesday"),
        3 => Some("Thursday"),
        4 => Some("Friday"),
        5 => Some("Saturday"),
        6 => Some("Sunday"),
        _ => None,
    }
}

fn average_by(
    points: &[HistoryPoint],
    buckets: u32,
    key: impl Fn(&HistoryPoint) -> u32,
) -> Vec<BucketAverage> {
    let mut sums: Vec<(f64, u32)> = (0..buckets).map(|_| (0.0, 0)).collect();
    for point in points {
        let Ok(index) = usize::try_from(key(point)) else {
            continue;
        };
        if let Some((sum, count)) = sums.get_mut(index) {
            *sum += f64::from(point.players);
            *count = count.saturating_add(1);
        }
    }
    (0..buckets)
        .zip(sums)
        .map(|(bucket, (sum, samples))| BucketAverage {
            bucket,
            players: if samples == 0 {
                0.0
            } else {
                sum / f64::from(samples)
            },
            samples,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::{TimeZone, Utc};
    use hubwatch_types::EntryId;

    use super::*;

    fn point(day: u32, hour: u32, players: u32) -> HistoryPoint {
        HistoryPoint {
            // 2026-06-01 is a Monday.
            time: Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap(),
            entry_id: EntryId::from_title("Bay"),
            players,
        }
    }

    #[test]
    fn hourly_buckets_average_samples() {
        let points = vec![point(1, 14, 10), point(2, 14, 20), point(3, 3, 5)];
        let averages = average_by_hour(&points);

        assert_eq!(averages.len(), 24);
        assert_eq!(averages[14].players, 15.0);
        assert_eq!(averages[14].samples, 2);
        assert_eq!(averages[3].players, 5.0);
        assert_eq!(averages[0].samples, 0);
        assert_eq!(averages[0].players, 0.0);
    }

    #[test]
    fn weekday_buckets_start_on_monday() {
        let points = vec![point(1, 0, 8), point(7, 0, 2), point(8, 0, 4)];
        let averages = average_by_weekday(&points);

        assert_eq!(averages.len(), 7);
        assert_eq!(averages[0].players, 6.0);
        assert_eq!(averages[0].samples, 2);
        assert_eq!(averages[6].players, 2.0);
        assert_eq!(weekday_name(averages[6].bucket), Some("Sunday"));
    }

    #[test]
    fn weekday_name_rejects_out_of_range() {
        assert_eq!(weekday_name(0), Some("Monday"));
        assert_eq!(weekday_name(7), None);
    }

    #[test]
    fn empty_history_gives_zeroed_buckets() {
        assert!(average_by_hour(&[]).iter().all(|b| b.samples == 0));
    }
}
