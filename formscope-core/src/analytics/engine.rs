//! Aggregation engine
//!
//! The façade over the per-field calculators: given a form schema, its
//! submissions, and its view data, it produces the complete statistics
//! object a dashboard renders.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AGGREGATION ENGINE                       │
//! │                                                             │
//! │  schema ─┬─> fields::analyze_field  (per field, batch key)  │
//! │          └─> dropoff::estimate      (required fields)       │
//! │  submissions ─> trend::bucketize    (daily series)          │
//! │  submissions + views ─> growth::*   (trailing windows)      │
//! │                                                             │
//! │            └────────> FormStatistics / DashboardStatistics  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is pure with respect to its inputs: callers fetch the record
//! collections (concurrently if they like), then invoke it synchronously.
//! `now` is an explicit argument so identical inputs always produce
//! identical output. Nothing is cached or persisted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formscope_core::analytics::AggregationEngine;
//! use formscope_core::ViewSource;
//!
//! let engine = AggregationEngine::new();
//! let stats = engine.form_stats(&schema, &submissions, &views, chrono::Utc::now());
//! println!("{} submissions, {}% conversion", stats.total_submissions, stats.conversion_rate);
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::analytics::dropoff::{self, DropOffPoint};
use crate::analytics::fields::{self, FieldStats};
use crate::analytics::growth::{self, round1};
use crate::analytics::trend::{self, TrendPoint};
use crate::format;
use crate::types::{FormSchema, FormSummary, SubmissionRecord, ViewSource};

/// Dashboard growth compares the trailing 30 days against the 30 before.
pub const DASHBOARD_GROWTH_WINDOW_DAYS: i64 = 30;

/// Per-form growth compares the trailing 7 days against the 7 before.
///
/// The window deliberately differs from the dashboard's: dashboards answer
/// "how is this month going", a single form's page answers "how was this
/// week". Reported deltas are not comparable across the two surfaces.
pub const FORM_GROWTH_WINDOW_DAYS: i64 = 7;

/// Account-wide statistics across a set of forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStatistics {
    /// Number of forms
    pub total_forms: u64,
    /// Submissions across all the forms
    pub total_submissions: u64,
    /// Views across all the forms
    pub total_views: u64,
    /// Submissions per view, 0-100
    pub conversion_rate: f64,
    /// Forms created: trailing window vs the one before, signed percent
    pub forms_growth: f64,
    /// Submissions: trailing window vs the one before, signed percent
    pub submissions_growth: f64,
    /// Views growth; 0 unless raw view events were supplied
    pub views_growth: f64,
    /// Conversion-rate growth; 0 unless raw view events were supplied
    pub conversion_growth: f64,
}

/// Complete statistics for a single form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormStatistics {
    /// Total submissions received
    pub total_submissions: u64,
    /// Total page views
    pub total_views: u64,
    /// Submissions per view, 0-100
    pub conversion_rate: f64,
    /// 100 whenever any submission exists, else 0 (see note below)
    pub completion_rate: f64,
    /// Mean completion time, "<m>m <s>s", or "N/A" without data
    pub average_completion_time: String,
    /// Submissions: trailing week vs the one before, signed percent
    pub submissions_growth: f64,
    /// Views growth; 0 unless raw view events were supplied
    pub views_growth: f64,
    /// Conversion-rate growth; 0 unless raw view events were supplied
    pub conversion_growth: f64,
    /// Daily submission counts, chronological
    pub trend: Vec<TrendPoint>,
    /// Per-field analytics, in schema order
    pub field_stats: Vec<FieldStats>,
    /// Required fields most often skipped, worst first, top 5
    pub drop_off_points: Vec<DropOffPoint>,
}

impl Default for FormStatistics {
    /// The all-zero object callers substitute when fetching inputs fails.
    fn default() -> Self {
        Self {
            total_submissions: 0,
            total_views: 0,
            conversion_rate: 0.0,
            completion_rate: 0.0,
            average_completion_time: "N/A".to_string(),
            submissions_growth: 0.0,
            views_growth: 0.0,
            conversion_growth: 0.0,
            trend: Vec::new(),
            field_stats: Vec::new(),
            drop_off_points: Vec::new(),
        }
    }
}

/// Computes dashboard- and form-level statistics from fetched records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine;

impl AggregationEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Account-wide statistics across `forms`.
    ///
    /// Submissions and view events are restricted to the given forms' ids; a
    /// pre-aggregated view counter is trusted to be scoped already. Growth
    /// compares the trailing [`DASHBOARD_GROWTH_WINDOW_DAYS`] against the
    /// preceding window of the same length.
    pub fn dashboard_stats(
        &self,
        forms: &[FormSummary],
        submissions: &[SubmissionRecord],
        views: &ViewSource,
        now: DateTime<Utc>,
    ) -> DashboardStatistics {
        let form_ids: HashSet<&str> = forms.iter().map(|f| f.id.as_str()).collect();
        let window = Duration::days(DASHBOARD_GROWTH_WINDOW_DAYS);

        let scoped_submissions: Vec<&SubmissionRecord> = submissions
            .iter()
            .filter(|s| form_ids.contains(s.form_id.as_str()))
            .collect();

        let total_forms = forms.len() as u64;
        let total_submissions = scoped_submissions.len() as u64;
        let total_views = match views {
            ViewSource::Counter { count } => *count,
            ViewSource::Events { events } => events
                .iter()
                .filter(|v| form_ids.contains(v.form_id.as_str()))
                .count() as u64,
        };

        let conversion_rate = conversion(total_submissions, total_views);

        let forms_growth =
            growth::windowed_growth(forms.iter().map(|f| f.created_at), now, window);
        let submissions_growth = growth::windowed_growth(
            scoped_submissions.iter().map(|s| s.submitted_at),
            now,
            window,
        );

        let (views_growth, conversion_growth) = match views.events() {
            Some(events) => view_and_conversion_growth(
                scoped_submissions.iter().map(|s| s.submitted_at),
                events
                    .iter()
                    .filter(|v| form_ids.contains(v.form_id.as_str()))
                    .map(|v| v.timestamp),
                now,
                window,
            ),
            // A counter carries no history to compare against
            None => (0.0, 0.0),
        };

        tracing::info!(
            forms = total_forms,
            submissions = total_submissions,
            views = total_views,
            "Computed dashboard statistics"
        );

        DashboardStatistics {
            total_forms,
            total_submissions,
            total_views,
            conversion_rate,
            forms_growth,
            submissions_growth,
            views_growth,
            conversion_growth,
        }
    }

    /// Complete statistics for one form.
    ///
    /// The submissions and views are taken as already scoped to the form by
    /// the store. Growth compares the trailing [`FORM_GROWTH_WINDOW_DAYS`]
    /// against the preceding window of the same length.
    ///
    /// `completion_rate` is 100 whenever any submission exists: the figure
    /// has never verified that every required field was filled, and reports
    /// built on it expect that reading, so it stays as-is. Per-field gaps
    /// show up in `drop_off_points` instead.
    pub fn form_stats(
        &self,
        schema: &FormSchema,
        submissions: &[SubmissionRecord],
        views: &ViewSource,
        now: DateTime<Utc>,
    ) -> FormStatistics {
        let window = Duration::days(FORM_GROWTH_WINDOW_DAYS);

        let total_submissions = submissions.len() as u64;
        let total_views = views.total();
        let conversion_rate = conversion(total_submissions, total_views);

        let completion_rate = if total_submissions > 0 { 100.0 } else { 0.0 };
        let average_completion_time = format::format_completion_time(mean_completion_seconds(
            submissions,
        ));

        let submissions_growth =
            growth::windowed_growth(submissions.iter().map(|s| s.submitted_at), now, window);

        let (views_growth, conversion_growth) = match views.events() {
            Some(events) => view_and_conversion_growth(
                submissions.iter().map(|s| s.submitted_at),
                events.iter().map(|v| v.timestamp),
                now,
                window,
            ),
            None => (0.0, 0.0),
        };

        let field_stats: Vec<FieldStats> = schema
            .fields
            .iter()
            .map(|field| fields::analyze_field(field, submissions))
            .collect();

        tracing::info!(
            form_id = %schema.id,
            submissions = total_submissions,
            views = total_views,
            fields = field_stats.len(),
            "Computed form statistics"
        );

        FormStatistics {
            total_submissions,
            total_views,
            conversion_rate,
            completion_rate,
            average_completion_time,
            submissions_growth,
            views_growth,
            conversion_growth,
            trend: trend::bucketize(submissions),
            field_stats,
            drop_off_points: dropoff::estimate(schema, submissions),
        }
    }
}

/// Submissions per view as a percentage, 0 when there are no views.
fn conversion(submissions: u64, views: u64) -> f64 {
    if views > 0 {
        round1(submissions as f64 / views as f64 * 100.0)
    } else {
        0.0
    }
}

/// Mean of the positive completion times, 0 when none were tracked.
fn mean_completion_seconds(submissions: &[SubmissionRecord]) -> f64 {
    let times: Vec<u32> = submissions
        .iter()
        .filter_map(|s| s.completion_time_seconds)
        .filter(|&secs| secs > 0)
        .collect();

    if times.is_empty() {
        0.0
    } else {
        times.iter().map(|&s| s as f64).sum::<f64>() / times.len() as f64
    }
}

/// Views growth plus growth of the per-window conversion rate.
fn view_and_conversion_growth<S, V>(
    submission_times: S,
    view_times: V,
    now: DateTime<Utc>,
    window: Duration,
) -> (f64, f64)
where
    S: IntoIterator<Item = DateTime<Utc>>,
    V: IntoIterator<Item = DateTime<Utc>>,
{
    let sub_counts = growth::count_windows(submission_times, now, window);
    let view_counts = growth::count_windows(view_times, now, window);

    let views_growth = growth::growth(view_counts.recent, view_counts.previous);

    let recent_conversion = window_conversion(sub_counts.recent, view_counts.recent);
    let previous_conversion = window_conversion(sub_counts.previous, view_counts.previous);
    let conversion_growth = growth::growth_f64(recent_conversion, previous_conversion);

    (views_growth, conversion_growth)
}

fn window_conversion(submissions: u64, views: u64) -> f64 {
    if views > 0 {
        submissions as f64 / views as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDefinition, FieldType, ViewEvent};
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    fn make_schema(fields: Vec<FieldDefinition>) -> FormSchema {
        FormSchema {
            id: "form-1".to_string(),
            title: "Backend Engineer".to_string(),
            fields,
        }
    }

    fn make_submission(
        form_id: &str,
        submitted_at: &str,
        completion: Option<u32>,
        data: serde_json::Value,
    ) -> SubmissionRecord {
        SubmissionRecord {
            id: format!("sub-{}", submitted_at),
            form_id: form_id.to_string(),
            submitted_at: submitted_at.parse().unwrap(),
            completion_time_seconds: completion,
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    fn make_view(form_id: &str, timestamp: &str) -> ViewEvent {
        ViewEvent {
            form_id: form_id.to_string(),
            timestamp: timestamp.parse().unwrap(),
        }
    }

    #[test]
    fn test_form_stats_zero_views_zero_conversion() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![]);

        let stats = engine.form_stats(&schema, &[], &ViewSource::Counter { count: 0 }, fixed_now());
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_completion_time, "N/A");
        assert!(stats.trend.is_empty());
        assert!(stats.drop_off_points.is_empty());
    }

    #[test]
    fn test_form_stats_basic_rates() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![]);
        let submissions = vec![
            make_submission("form-1", "2024-06-14T10:00:00Z", Some(120), json!({})),
            make_submission("form-1", "2024-06-14T11:00:00Z", Some(180), json!({})),
            make_submission("form-1", "2024-06-13T09:00:00Z", None, json!({})),
        ];

        let stats = engine.form_stats(
            &schema,
            &submissions,
            &ViewSource::Counter { count: 12 },
            fixed_now(),
        );

        assert_eq!(stats.total_submissions, 3);
        assert_eq!(stats.total_views, 12);
        assert_eq!(stats.conversion_rate, 25.0);
        assert_eq!(stats.completion_rate, 100.0);
        assert_eq!(stats.average_completion_time, "2m 30s");
        // counter views carry no history
        assert_eq!(stats.views_growth, 0.0);
        assert_eq!(stats.conversion_growth, 0.0);
    }

    #[test]
    fn test_form_stats_weekly_growth_windows() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![]);
        let submissions = vec![
            make_submission("form-1", "2024-06-14T10:00:00Z", None, json!({})), // this week
            make_submission("form-1", "2024-06-13T10:00:00Z", None, json!({})), // this week
            make_submission("form-1", "2024-06-12T10:00:00Z", None, json!({})), // this week
            make_submission("form-1", "2024-06-05T10:00:00Z", None, json!({})), // last week
            make_submission("form-1", "2024-06-04T10:00:00Z", None, json!({})), // last week
        ];

        let stats = engine.form_stats(
            &schema,
            &submissions,
            &ViewSource::Counter { count: 0 },
            fixed_now(),
        );
        assert_eq!(stats.submissions_growth, 50.0);
    }

    #[test]
    fn test_form_stats_view_events_enable_growth() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![]);
        let submissions = vec![
            make_submission("form-1", "2024-06-14T10:00:00Z", None, json!({})),
            make_submission("form-1", "2024-06-05T10:00:00Z", None, json!({})),
        ];
        let views = ViewSource::Events {
            events: vec![
                make_view("form-1", "2024-06-14T09:00:00Z"),
                make_view("form-1", "2024-06-13T09:00:00Z"),
                make_view("form-1", "2024-06-05T09:00:00Z"),
                make_view("form-1", "2024-06-04T09:00:00Z"),
                make_view("form-1", "2024-06-03T09:00:00Z"),
                make_view("form-1", "2024-06-02T09:00:00Z"),
            ],
        };

        let stats = engine.form_stats(&schema, &submissions, &views, fixed_now());
        assert_eq!(stats.total_views, 6);
        // 2 recent vs 4 previous views
        assert_eq!(stats.views_growth, -50.0);
        // conversion: 1/2 = 50% recent vs 1/4 = 25% previous
        assert_eq!(stats.conversion_growth, 100.0);
    }

    #[test]
    fn test_form_stats_field_order_follows_schema() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![
            FieldDefinition::new("full name", FieldType::Text),
            FieldDefinition::new("motivation", FieldType::Textarea),
        ]);
        let submissions = vec![make_submission(
            "form-1",
            "2024-06-14T10:00:00Z",
            None,
            json!({"full name": "Ada", "motivation": "I enjoy it"}),
        )];

        let stats = engine.form_stats(
            &schema,
            &submissions,
            &ViewSource::Counter { count: 1 },
            fixed_now(),
        );
        let labels: Vec<&str> = stats.field_stats.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["full name", "motivation"]);
    }

    #[test]
    fn test_form_stats_is_idempotent() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![FieldDefinition {
            id: Some("f-loc".to_string()),
            label: "location".to_string(),
            field_type: FieldType::Select,
            required: true,
            options: vec!["Remote".to_string(), "Onsite".to_string()],
        }]);
        let submissions = vec![
            make_submission(
                "form-1",
                "2024-06-14T10:00:00Z",
                Some(95),
                json!({"location": "Remote"}),
            ),
            make_submission("form-1", "2024-06-13T10:00:00Z", None, json!({})),
        ];
        let views = ViewSource::Events {
            events: vec![make_view("form-1", "2024-06-14T09:00:00Z")],
        };

        let first = engine.form_stats(&schema, &submissions, &views, fixed_now());
        let second = engine.form_stats(&schema, &submissions, &views, fixed_now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_form_stats_percentages_stay_in_bounds() {
        let engine = AggregationEngine::new();
        let schema = make_schema(vec![FieldDefinition {
            id: None,
            label: "location".to_string(),
            field_type: FieldType::Select,
            required: true,
            options: vec!["Remote".to_string()],
        }]);
        // More submissions than views: conversion is capped by nothing except
        // arithmetic, but must stay non-negative
        let submissions = vec![
            make_submission("form-1", "2024-06-14T10:00:00Z", None, json!({"location": "Remote"})),
            make_submission("form-1", "2024-06-14T11:00:00Z", None, json!({})),
        ];

        let stats = engine.form_stats(
            &schema,
            &submissions,
            &ViewSource::Counter { count: 4 },
            fixed_now(),
        );

        assert!(stats.conversion_rate >= 0.0 && stats.conversion_rate <= 100.0);
        assert!(stats.completion_rate >= 0.0 && stats.completion_rate <= 100.0);
        for field in &stats.field_stats {
            if let crate::analytics::fields::FieldBreakdown::Choice { distribution } =
                &field.breakdown
            {
                for option in distribution {
                    assert!(option.percentage >= 0.0 && option.percentage <= 100.0);
                }
            }
        }
        for point in &stats.drop_off_points {
            assert!(point.drop_off_rate >= 0.0 && point.drop_off_rate <= 100.0);
        }
    }

    #[test]
    fn test_default_form_statistics_is_all_zero() {
        let stats = FormStatistics::default();
        assert_eq!(stats.total_submissions, 0);
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.average_completion_time, "N/A");
        assert!(stats.trend.is_empty());
        assert!(stats.field_stats.is_empty());
        assert!(stats.drop_off_points.is_empty());
    }

    #[test]
    fn test_dashboard_stats_restricts_to_given_forms() {
        let engine = AggregationEngine::new();
        let forms = vec![
            FormSummary {
                id: "form-1".to_string(),
                created_at: "2024-06-10T00:00:00Z".parse().unwrap(),
            },
            FormSummary {
                id: "form-2".to_string(),
                created_at: "2024-04-01T00:00:00Z".parse().unwrap(),
            },
        ];
        let submissions = vec![
            make_submission("form-1", "2024-06-14T10:00:00Z", None, json!({})),
            make_submission("form-2", "2024-06-14T10:00:00Z", None, json!({})),
            make_submission("form-9", "2024-06-14T10:00:00Z", None, json!({})), // not ours
        ];
        let views = ViewSource::Events {
            events: vec![
                make_view("form-1", "2024-06-14T09:00:00Z"),
                make_view("form-2", "2024-06-14T09:30:00Z"),
                make_view("form-2", "2024-06-14T10:00:00Z"),
                make_view("form-2", "2024-06-14T10:30:00Z"),
                make_view("form-9", "2024-06-14T09:00:00Z"), // not ours
            ],
        };

        let stats = engine.dashboard_stats(&forms, &submissions, &views, fixed_now());
        assert_eq!(stats.total_forms, 2);
        assert_eq!(stats.total_submissions, 2);
        assert_eq!(stats.total_views, 4);
        assert_eq!(stats.conversion_rate, 50.0);
    }

    #[test]
    fn test_dashboard_stats_monthly_growth_windows() {
        let engine = AggregationEngine::new();
        // One form created this 30-day window, one before it
        let forms = vec![
            FormSummary {
                id: "form-1".to_string(),
                created_at: "2024-06-01T00:00:00Z".parse().unwrap(),
            },
            FormSummary {
                id: "form-2".to_string(),
                created_at: "2024-05-01T00:00:00Z".parse().unwrap(),
            },
        ];
        let submissions = vec![
            // 12 days ago: inside the trailing 30 days, outside the 7-day form window
            make_submission("form-1", "2024-06-03T10:00:00Z", None, json!({})),
            make_submission("form-2", "2024-05-01T10:00:00Z", None, json!({})),
            make_submission("form-2", "2024-04-28T10:00:00Z", None, json!({})),
        ];

        let stats = engine.dashboard_stats(
            &forms,
            &submissions,
            &ViewSource::Counter { count: 0 },
            fixed_now(),
        );
        assert_eq!(stats.forms_growth, 0.0); // 1 vs 1
        assert_eq!(stats.submissions_growth, -50.0); // 1 vs 2
        assert_eq!(stats.views_growth, 0.0);
        assert_eq!(stats.conversion_growth, 0.0);
    }

    #[test]
    fn test_dashboard_stats_counter_views() {
        let engine = AggregationEngine::new();
        let forms = vec![FormSummary {
            id: "form-1".to_string(),
            created_at: "2024-06-01T00:00:00Z".parse().unwrap(),
        }];
        let submissions = vec![make_submission(
            "form-1",
            "2024-06-14T10:00:00Z",
            None,
            json!({}),
        )];

        let stats = engine.dashboard_stats(
            &forms,
            &submissions,
            &ViewSource::Counter { count: 10 },
            fixed_now(),
        );
        assert_eq!(stats.total_views, 10);
        assert_eq!(stats.conversion_rate, 10.0);
    }

    #[test]
    fn test_dashboard_stats_empty_inputs() {
        let engine = AggregationEngine::new();
        let stats = engine.dashboard_stats(
            &[],
            &[],
            &ViewSource::Counter { count: 0 },
            fixed_now(),
        );
        assert_eq!(stats, DashboardStatistics::default());
    }
}
