//! # formscope-core
//!
//! Core library for formscope - response analytics for job-application forms.
//!
//! This library provides:
//! - Domain types for form schemas, submissions, and view events
//! - The aggregation engine (totals, growth, trends, per-field breakdowns,
//!   drop-off estimates)
//! - Response export to CSV/JSON rows
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The engine consumes collections of already-fetched records and a form
//! schema, and returns a freshly computed statistics object. It does not
//! fetch, authenticate, persist, or render: the record store and the
//! dashboard/export surfaces sit outside this crate and exchange only the
//! types defined here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use formscope_core::analytics::AggregationEngine;
//! use formscope_core::{FormSchema, ViewSource};
//!
//! let schema: FormSchema = serde_json::from_str(r#"{"id":"f","title":"t"}"#).unwrap();
//! let engine = AggregationEngine::new();
//! let stats = engine.form_stats(&schema, &[], &ViewSource::Counter { count: 0 }, chrono::Utc::now());
//! assert_eq!(stats.total_submissions, 0);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod types;
