//! Metric registry for discovery and documentation.

/// Type of metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValueType {
    Integer,
    Percentage,
    Text,
    Series,
}

impl MetricValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricValueType::Integer => "integer",
            MetricValueType::Percentage => "percentage",
            MetricValueType::Text => "text",
            MetricValueType::Series => "series",
        }
    }
}

/// Descriptor for a statistic the aggregation engine produces.
#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    /// Statistics object the metric belongs to: "dashboard", "form", "field"
    pub scope: &'static str,
    pub name: &'static str,
    pub value_type: MetricValueType,
    pub summary: &'static str,
    pub description: &'static str,
}

const DASHBOARD_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor {
        scope: "dashboard",
        name: "total_forms",
        value_type: MetricValueType::Integer,
        summary: "Number of forms on the dashboard.",
        description: "Count of the forms the dashboard aggregates over.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "total_submissions",
        value_type: MetricValueType::Integer,
        summary: "Submissions across all forms.",
        description: "Count of submissions belonging to the dashboard's forms.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "total_views",
        value_type: MetricValueType::Integer,
        summary: "Page views across all forms.",
        description: "Count of view events (or the summed counter) for the dashboard's forms.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "conversion_rate",
        value_type: MetricValueType::Percentage,
        summary: "Submissions per view.",
        description: "Total submissions divided by total views, as a percentage. 0 with no views.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "forms_growth",
        value_type: MetricValueType::Percentage,
        summary: "Forms created: 30-day change.",
        description: "Signed change in forms created, trailing 30 days vs the preceding 30.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "submissions_growth",
        value_type: MetricValueType::Percentage,
        summary: "Submissions: 30-day change.",
        description: "Signed change in submissions, trailing 30 days vs the preceding 30.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "views_growth",
        value_type: MetricValueType::Percentage,
        summary: "Views: 30-day change.",
        description: "Signed change in views; 0 when only a view counter is available.",
    },
    MetricDescriptor {
        scope: "dashboard",
        name: "conversion_growth",
        value_type: MetricValueType::Percentage,
        summary: "Conversion rate: 30-day change.",
        description: "Signed change in the per-window conversion rate; 0 without view events.",
    },
];

const FORM_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor {
        scope: "form",
        name: "total_submissions",
        value_type: MetricValueType::Integer,
        summary: "Submissions received by the form.",
        description: "Count of all submission records for the form.",
    },
    MetricDescriptor {
        scope: "form",
        name: "total_views",
        value_type: MetricValueType::Integer,
        summary: "Page views of the form.",
        description: "Count of view events (or the stored counter) for the form.",
    },
    MetricDescriptor {
        scope: "form",
        name: "conversion_rate",
        value_type: MetricValueType::Percentage,
        summary: "Submissions per view.",
        description: "Submissions divided by views, as a percentage. 0 with no views.",
    },
    MetricDescriptor {
        scope: "form",
        name: "completion_rate",
        value_type: MetricValueType::Percentage,
        summary: "100 when any submission exists.",
        description: "Does not verify individual required fields; see drop_off_points for that.",
    },
    MetricDescriptor {
        scope: "form",
        name: "average_completion_time",
        value_type: MetricValueType::Text,
        summary: "Mean time from first view to submit.",
        description: "Formatted as \"<m>m <s>s\"; \"N/A\" when no completion times were tracked.",
    },
    MetricDescriptor {
        scope: "form",
        name: "submissions_growth",
        value_type: MetricValueType::Percentage,
        summary: "Submissions: 7-day change.",
        description: "Signed change in submissions, trailing 7 days vs the preceding 7.",
    },
    MetricDescriptor {
        scope: "form",
        name: "trend",
        value_type: MetricValueType::Series,
        summary: "Daily submission counts.",
        description: "One point per UTC day with submissions, chronological, for the trend chart.",
    },
    MetricDescriptor {
        scope: "form",
        name: "drop_off_points",
        value_type: MetricValueType::Series,
        summary: "Required fields most often skipped.",
        description: "Top 5 required fields by share of submissions missing them, worst first.",
    },
];

const FIELD_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor {
        scope: "field",
        name: "responses",
        value_type: MetricValueType::Integer,
        summary: "Submissions that answered the field.",
        description: "Count of records with a non-empty value under the field's resolved key.",
    },
    MetricDescriptor {
        scope: "field",
        name: "distribution",
        value_type: MetricValueType::Series,
        summary: "Choice counts for select fields.",
        description: "Counts and percentages per declared option, in declared order, zeros kept.",
    },
    MetricDescriptor {
        scope: "field",
        name: "average_length",
        value_type: MetricValueType::Integer,
        summary: "Mean answer length for textarea fields.",
        description: "Rounded mean character count over string answers; non-strings are skipped.",
    },
];

/// List all registered metrics.
pub fn list_metrics() -> Vec<MetricDescriptor> {
    let mut all = Vec::new();
    all.extend_from_slice(DASHBOARD_METRICS);
    all.extend_from_slice(FORM_METRICS);
    all.extend_from_slice(FIELD_METRICS);
    all
}

/// List metrics for a given scope ("dashboard", "form", "field").
pub fn list_metrics_for_scope(scope: &str) -> Vec<MetricDescriptor> {
    list_metrics()
        .into_iter()
        .filter(|m| m.scope == scope)
        .collect()
}
