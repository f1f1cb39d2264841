//! Submission-trend bucketing for time-series charts.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::SubmissionRecord;

/// One day's submission count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Submissions received that day
    pub count: u64,
}

/// Group submissions into calendar-day buckets, ascending by date.
///
/// Day boundaries are UTC. The reference dashboard bucketed by the viewer's
/// locale day; a server-side engine needs one fixed policy so the same
/// records always produce the same series, and UTC is that policy here.
///
/// Only days with at least one submission appear. Empty input yields an
/// empty series.
pub fn bucketize(records: &[SubmissionRecord]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *buckets.entry(record.submitted_at.date_naive()).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn make_record(submitted_at: &str) -> SubmissionRecord {
        SubmissionRecord {
            id: "sub".to_string(),
            form_id: "form-1".to_string(),
            submitted_at: submitted_at.parse::<DateTime<Utc>>().unwrap(),
            completion_time_seconds: None,
            data: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        assert!(bucketize(&[]).is_empty());
    }

    #[test]
    fn test_groups_same_day_submissions() {
        let records = vec![
            make_record("2024-03-10T09:00:00Z"),
            make_record("2024-03-10T21:30:00Z"),
            make_record("2024-03-11T00:15:00Z"),
        ];

        let trend = bucketize(&records);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date.to_string(), "2024-03-10");
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[1].date.to_string(), "2024-03-11");
        assert_eq!(trend[1].count, 1);
    }

    #[test]
    fn test_sorted_chronologically_regardless_of_input_order() {
        let records = vec![
            make_record("2024-02-01T10:00:00Z"),
            make_record("2024-01-31T10:00:00Z"),
        ];

        let trend = bucketize(&records);
        assert_eq!(trend[0].date.to_string(), "2024-01-31");
        assert_eq!(trend[1].date.to_string(), "2024-02-01");
    }

    #[test]
    fn test_year_boundary_sorts_by_actual_date() {
        // "Dec 31" vs "Jan 1" labels would sort wrong as strings
        let records = vec![
            make_record("2025-01-01T00:30:00Z"),
            make_record("2024-12-31T23:30:00Z"),
        ];

        let trend = bucketize(&records);
        assert_eq!(trend[0].date.to_string(), "2024-12-31");
        assert_eq!(trend[1].date.to_string(), "2025-01-01");
    }
}
