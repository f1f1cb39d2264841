//! Drop-off estimation for required fields.

use serde::Serialize;

use crate::analytics::growth::round1;
use crate::types::{FieldValue, FormSchema, SubmissionRecord};

/// At most this many fields are reported, worst first.
const TOP_DROP_OFF_POINTS: usize = 5;

/// A required field and the share of submissions missing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOffPoint {
    /// Label of the required field
    pub field_label: String,
    /// Percentage of submissions with no value for it, 0-100
    pub drop_off_rate: f64,
}

/// Rank required fields by how often submissions skipped them.
///
/// Presence is checked under the field's id and its label independently per
/// record, unlike the batch-key resolution used for field analytics: drop-off
/// is a binary presence check, so accepting a value found under either key
/// cannot double-count anything, and it is more forgiving toward mixed-key
/// submission sets.
///
/// Fields nobody skipped are omitted. Returns at most the top
/// [`TOP_DROP_OFF_POINTS`] entries, sorted descending by rate.
pub fn estimate(schema: &FormSchema, records: &[SubmissionRecord]) -> Vec<DropOffPoint> {
    let total = records.len();
    if total == 0 {
        return Vec::new();
    }

    let mut points: Vec<DropOffPoint> = Vec::new();
    for field in schema.fields.iter().filter(|f| f.required) {
        let missing = records
            .iter()
            .filter(|record| {
                let under_id = field
                    .id
                    .as_deref()
                    .map(|id| FieldValue::classify(record.data.get(id)).is_present())
                    .unwrap_or(false);
                let under_label =
                    FieldValue::classify(record.data.get(&field.label)).is_present();
                !under_id && !under_label
            })
            .count();

        let drop_off_rate = round1(missing as f64 / total as f64 * 100.0);
        if drop_off_rate > 0.0 {
            points.push(DropOffPoint {
                field_label: field.label.clone(),
                drop_off_rate,
            });
        }
    }

    points.sort_by(|a, b| b.drop_off_rate.total_cmp(&a.drop_off_rate));
    points.truncate(TOP_DROP_OFF_POINTS);
    points
}
