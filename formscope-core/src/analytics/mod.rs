//! Analytics module for formscope
//!
//! Turns a form's field schema plus its accumulated raw submission and view
//! records into dashboard statistics:
//! - Aggregate totals, conversion, and period-over-period growth
//! - Per-field response breakdowns (choice distributions, answer lengths)
//! - Drop-off estimates for required fields
//! - Daily submission trend series
//!
//! Submission payloads are schema-less key/value bags whose keys do not
//! reliably match the current field definitions, so everything per-field
//! goes through heuristic key resolution (see [`resolver`]). Malformed or
//! missing data never errors; it degrades to zero/absent results.
//!
//! The computation is synchronous and pure: callers fetch the collections,
//! hand them over, and get a fresh statistics object back. Nothing is
//! cached, persisted, or shared between invocations.

pub mod dropoff;
pub mod engine;
pub mod fields;
pub mod growth;
pub mod registry;
pub mod resolver;
pub mod trend;

// Engine exports
pub use engine::{
    AggregationEngine, DashboardStatistics, FormStatistics, DASHBOARD_GROWTH_WINDOW_DAYS,
    FORM_GROWTH_WINDOW_DAYS,
};

// Component exports
pub use dropoff::DropOffPoint;
pub use fields::{FieldBreakdown, FieldStats, OptionCount};
pub use registry::{list_metrics, list_metrics_for_scope, MetricDescriptor, MetricValueType};
pub use resolver::BatchResolution;
pub use trend::TrendPoint;
