//! Field-identity resolution.
//!
//! A submission's `data` key for a field is not guaranteed to equal the
//! field's current id or label: forms get edited, labels renamed, ids
//! regenerated, and legacy submissions keep the keys that were current when
//! they were recorded. Resolution tries an explicit ordered list of
//! candidate keys so the heuristic stays auditable and testable.

use crate::types::{FieldDefinition, FieldValue, SubmissionRecord};

/// Replace every run of whitespace with `sep`.
fn collapse_whitespace(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(sep);
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Candidate submission-data keys for a field, in priority order.
///
/// 1. label, exactly as entered
/// 2. field id
/// 3. label lower-cased
/// 4. label with whitespace collapsed to `_`
/// 5. label with whitespace collapsed to `-`
///
/// Empty and duplicate candidates are dropped, preserving order, so ties in
/// batch resolution always break toward the earliest distinct candidate.
pub fn candidate_keys(field: &FieldDefinition) -> Vec<String> {
    let mut candidates = vec![field.label.clone()];
    if let Some(id) = &field.id {
        candidates.push(id.clone());
    }
    candidates.push(field.label.to_lowercase());
    candidates.push(collapse_whitespace(&field.label, '_'));
    candidates.push(collapse_whitespace(&field.label, '-'));

    let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !keys.contains(&candidate) {
            keys.push(candidate);
        }
    }
    keys
}

/// Resolve a field's value in a single record.
///
/// Tries each candidate key in order and returns the first present,
/// non-empty match. Absence is a normal outcome, never an error.
pub fn resolve<'a>(field: &FieldDefinition, record: &'a SubmissionRecord) -> FieldValue<'a> {
    for key in candidate_keys(field) {
        let value = FieldValue::classify(record.data.get(&key));
        if value.is_present() {
            return value;
        }
    }
    FieldValue::Absent
}

/// The winning key for a field across a whole submission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResolution {
    /// The candidate key that matched the most records
    pub key: String,
    /// Number of records with a non-empty value under that key
    pub matches: u64,
}

/// Pick the single candidate key that matches the most records.
///
/// Using one key for the whole batch keeps the per-field response count
/// well-defined and avoids mixing semantics across records within one
/// computation. Ties break toward the earliest candidate in the priority
/// list. Returns `None` when no candidate matches any record.
pub fn resolve_best_key(
    field: &FieldDefinition,
    records: &[SubmissionRecord],
) -> Option<BatchResolution> {
    let mut best: Option<BatchResolution> = None;

    for key in candidate_keys(field) {
        let matches = records
            .iter()
            .filter(|record| FieldValue::classify(record.data.get(&key)).is_present())
            .count() as u64;

        // Strict comparison: an earlier candidate keeps the win on ties.
        if matches > best.as_ref().map_or(0, |b| b.matches) {
            best = Some(BatchResolution { key, matches });
        }
    }

    if let Some(resolution) = &best {
        tracing::debug!(
            field = %field.label,
            field_type = %field.field_type,
            key = %resolution.key,
            matches = resolution.matches,
            "Resolved batch key for field"
        );
    }

    best
}
