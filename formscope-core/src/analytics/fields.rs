//! Per-field response analytics.
//!
//! For each field the calculator reports how many submissions answered it,
//! plus a type-specific breakdown: a categorical distribution for select
//! fields and an average answer length for textarea fields. All lookups go
//! through batch key resolution so every record in one computation is read
//! under the same key.

use serde::Serialize;

use crate::analytics::growth::round1;
use crate::analytics::resolver;
use crate::types::{FieldDefinition, FieldType, FieldValue, SubmissionRecord};

/// One option's share of a select field's responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    /// Declared option text
    pub option: String,
    /// Submissions that chose it
    pub count: u64,
    /// Share of the field's responses, 0-100, one decimal
    pub percentage: f64,
}

/// Type-specific portion of a field's analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldBreakdown {
    /// Categorical distribution, in declared option order (select fields)
    Choice { distribution: Vec<OptionCount> },
    /// Average answer length in characters (textarea fields)
    TextLength { average_length: u64 },
    /// Response count only (text, email, phone, file fields)
    None,
}

/// Analytics for one field across a submission set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    /// Field id, when the schema has one
    pub id: Option<String>,
    /// Field label
    pub label: String,
    /// Type of field
    pub field_type: FieldType,
    /// Submissions with a value under the resolved key
    pub responses: u64,
    /// Type-specific breakdown
    pub breakdown: FieldBreakdown,
}

impl FieldStats {
    fn empty(field: &FieldDefinition) -> Self {
        Self {
            id: field.id.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            responses: 0,
            breakdown: FieldBreakdown::None,
        }
    }
}

/// Compute a field's response count and breakdown across a submission set.
///
/// Never fails: if no candidate key matches any record the field reports
/// zero responses and no breakdown.
pub fn analyze_field(field: &FieldDefinition, records: &[SubmissionRecord]) -> FieldStats {
    let Some(resolution) = resolver::resolve_best_key(field, records) else {
        return FieldStats::empty(field);
    };

    let responses = resolution.matches;
    let key = resolution.key.as_str();

    let breakdown = match field.field_type {
        FieldType::Select if !field.options.is_empty() => {
            FieldBreakdown::Choice {
                distribution: choice_distribution(field, records, key, responses),
            }
        }
        FieldType::Textarea => FieldBreakdown::TextLength {
            average_length: average_text_length(records, key),
        },
        // File uploads and free-form contact fields only report presence
        _ => FieldBreakdown::None,
    };

    FieldStats {
        id: field.id.clone(),
        label: field.label.clone(),
        field_type: field.field_type,
        responses,
        breakdown,
    }
}

/// Distribution over the declared option order.
///
/// Options nobody picked still appear with a zero count. Values that are not
/// strings, or that name an option no longer declared (stale submissions
/// from an older option set), are ignored.
fn choice_distribution(
    field: &FieldDefinition,
    records: &[SubmissionRecord],
    key: &str,
    responses: u64,
) -> Vec<OptionCount> {
    let mut counts = vec![0u64; field.options.len()];
    for record in records {
        if let Some(text) = FieldValue::classify(record.data.get(key)).as_text() {
            if let Some(idx) = field.options.iter().position(|opt| opt == text) {
                counts[idx] += 1;
            }
        }
    }

    field
        .options
        .iter()
        .zip(counts)
        .map(|(option, count)| OptionCount {
            option: option.clone(),
            count,
            percentage: if responses > 0 {
                round1(count as f64 / responses as f64 * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

/// Mean character length of string answers under the resolved key.
///
/// Non-string values are skipped, not coerced. Returns 0 when no string
/// answers exist.
fn average_text_length(records: &[SubmissionRecord], key: &str) -> u64 {
    let mut total_length: u64 = 0;
    let mut count: u64 = 0;
    for record in records {
        if let Some(text) = FieldValue::classify(record.data.get(key)).as_text() {
            total_length += text.chars().count() as u64;
            count += 1;
        }
    }

    if count > 0 {
        ((total_length as f64) / (count as f64)).round() as u64
    } else {
        0
    }
}
