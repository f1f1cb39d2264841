//! Period-over-period growth computation.

use chrono::{DateTime, Duration, Utc};

/// Round to one decimal place, as reported on dashboards.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Signed percentage change between a recent count and the preceding count.
///
/// Growth from zero is reported as a flat 100% rather than infinity; two
/// zero periods report 0%. The same rule applies to every growth figure the
/// engine produces.
pub fn growth(current: u64, previous: u64) -> f64 {
    growth_f64(current as f64, previous as f64)
}

/// [`growth`] over fractional quantities (rates).
pub fn growth_f64(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        round1((current - previous) / previous * 100.0)
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Occurrence counts for a trailing window and the window preceding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounts {
    /// Occurrences in `[now - window, ..)`
    pub recent: u64,
    /// Occurrences in `[now - 2*window, now - window)`
    pub previous: u64,
}

/// Count timestamps falling in the trailing window and the one before it.
///
/// The recent window is unbounded above: a record stamped slightly ahead of
/// `now` (clock skew between store and server) still counts as recent.
pub fn count_windows<I>(timestamps: I, now: DateTime<Utc>, window: Duration) -> WindowCounts
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let window_start = now - window;
    let previous_start = window_start - window;

    let mut recent = 0;
    let mut previous = 0;
    for ts in timestamps {
        if ts >= window_start {
            recent += 1;
        } else if ts >= previous_start {
            previous += 1;
        }
    }

    WindowCounts { recent, previous }
}

/// Growth of a timestamp stream over a trailing window vs the preceding one.
pub fn windowed_growth<I>(timestamps: I, now: DateTime<Utc>, window: Duration) -> f64
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let counts = count_windows(timestamps, now, window);
    growth(counts.recent, counts.previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_basic() {
        assert_eq!(growth(123, 100), 23.0);
        assert_eq!(growth(80, 100), -20.0);
        assert_eq!(growth(100, 100), 0.0);
    }

    #[test]
    fn test_growth_zero_denominators() {
        assert_eq!(growth(5, 0), 100.0);
        assert_eq!(growth(0, 0), 0.0);
        assert_eq!(growth(0, 5), -100.0);
    }

    #[test]
    fn test_growth_rounds_to_one_decimal() {
        // 1/3 more: 33.333...% -> 33.3%
        assert_eq!(growth(4, 3), 33.3);
        assert_eq!(growth(2, 3), -33.3);
    }

    #[test]
    fn test_growth_f64_rates() {
        assert_eq!(growth_f64(15.0, 10.0), 50.0);
        assert_eq!(growth_f64(2.5, 0.0), 100.0);
        assert_eq!(growth_f64(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_count_windows_boundaries() {
        let now = "2024-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let window = Duration::days(7);

        let timestamps = vec![
            now,                       // recent
            now - Duration::days(6),   // recent
            now - Duration::days(7),   // exactly on the boundary: recent
            now - Duration::days(8),   // previous
            now - Duration::days(13),  // previous
            now - Duration::days(14),  // exactly on the older boundary: previous
            now - Duration::days(15),  // outside both windows
            now + Duration::hours(1),  // ahead of now: still recent
        ];

        let counts = count_windows(timestamps, now, window);
        assert_eq!(counts.recent, 4);
        assert_eq!(counts.previous, 3);
    }

    #[test]
    fn test_windowed_growth() {
        let now = "2024-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let window = Duration::days(7);

        let timestamps = vec![
            now - Duration::days(1),
            now - Duration::days(2),
            now - Duration::days(3),
            now - Duration::days(10),
            now - Duration::days(11),
        ];

        // 3 recent vs 2 previous
        assert_eq!(windowed_growth(timestamps, now, window), 50.0);
        assert_eq!(windowed_growth(Vec::new(), now, window), 0.0);
    }
}
