//! Core domain types for formscope
//!
//! These types represent the canonical data model consumed by the analytics
//! engine: the form schema on one side, and the raw submission/view records
//! on the other.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Form** | A published job-application form; owns an ordered list of FieldDefinitions |
//! | **FieldDefinition** | One question on a form (label, type, required flag, options) |
//! | **SubmissionRecord** | One respondent's completed answers plus metadata |
//! | **ViewEvent** | One page view of the published form |
//! | **Resolved key** | The submission-data map key matched to a field by heuristic lookup |
//!
//! ### Labels vs ids
//!
//! Forms are edited over time: field ids get regenerated and labels get
//! renamed, while old submissions keep whatever keys were current when they
//! were recorded. The label is treated as the stable semantic key across
//! schema edits; ids may be absent entirely on legacy forms. Nothing in this
//! module assumes a submission's `data` keys line up with the current schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Form schema
// ============================================

/// Type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
    Select,
    File,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::File => "file",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "phone" => Ok(FieldType::Phone),
            "textarea" => Ok(FieldType::Textarea),
            "select" => Ok(FieldType::Select),
            "file" => Ok(FieldType::File),
            _ => Err(format!("unknown field type: {}", s)),
        }
    }
}

/// One question on a form.
///
/// `label` is the human-readable question text and doubles as the stable
/// semantic key across schema edits. `id` may be missing on legacy forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Builder-assigned identifier (absent on legacy forms)
    #[serde(default)]
    pub id: Option<String>,
    /// Question text shown to respondents
    pub label: String,
    /// Type of field
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether respondents must answer
    #[serde(default)]
    pub required: bool,
    /// Declared choices, in display order (select fields only)
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldDefinition {
    /// Create a plain field with just a label and type.
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: None,
            label: label.into(),
            field_type,
            required: false,
            options: Vec::new(),
        }
    }
}

/// A form's identity plus its ordered field definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    /// Unique form identifier
    pub id: String,
    /// Form title
    pub title: String,
    /// Ordered field definitions
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Lightweight per-form row for dashboard-level aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSummary {
    /// Unique form identifier
    pub id: String,
    /// When the form was created
    pub created_at: DateTime<Utc>,
}

// ============================================
// Submissions and views
// ============================================

/// One completed response to a form.
///
/// `data` is an unordered key/value bag whose keys are NOT guaranteed to
/// match the current schema's field ids or labels. Immutable once created;
/// the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Unique submission identifier
    pub id: String,
    /// Form this submission belongs to
    pub form_id: String,
    /// When the submission was received
    pub submitted_at: DateTime<Utc>,
    /// Seconds from first view to submit, when tracked
    #[serde(default)]
    pub completion_time_seconds: Option<u32>,
    /// Raw answers keyed by whatever field key was current at submit time
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// One page view of a published form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEvent {
    /// Form that was viewed
    pub form_id: String,
    /// When the view happened
    pub timestamp: DateTime<Utc>,
}

/// View data as exposed by the record store.
///
/// The store may hand back either a pre-aggregated counter (a column on the
/// form row) or the raw view events. Growth over time is only computable
/// from events; with a counter the view/conversion growth figures stay 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewSource {
    /// Pre-aggregated view count
    Counter { count: u64 },
    /// Raw view events with timestamps
    Events { events: Vec<ViewEvent> },
}

impl ViewSource {
    /// Total number of views, whichever representation was supplied.
    pub fn total(&self) -> u64 {
        match self {
            ViewSource::Counter { count } => *count,
            ViewSource::Events { events } => events.len() as u64,
        }
    }

    /// The raw events, when the store supplied them.
    pub fn events(&self) -> Option<&[ViewEvent]> {
        match self {
            ViewSource::Counter { .. } => None,
            ViewSource::Events { events } => Some(events),
        }
    }
}

// ============================================
// Field values
// ============================================

/// A file uploaded through a file field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
}

impl FileDescriptor {
    /// Best display name for this file.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("file")
    }
}

/// Shape of a raw submission value at the point it is read for a field.
///
/// Submission payloads are arbitrary JSON; classifying them once here lets
/// each analytics branch match exhaustively and ignore shapes it does not
/// understand instead of coercing them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Key missing, null, empty string, or empty array
    Absent,
    /// Non-empty string answer
    Text(&'a str),
    /// Non-empty array (file-descriptor uploads)
    Files(&'a [serde_json::Value]),
    /// Nested object
    Nested(&'a serde_json::Map<String, serde_json::Value>),
    /// Number, boolean, or anything else present but unrecognized
    Other(&'a serde_json::Value),
}

impl<'a> FieldValue<'a> {
    /// Classify a raw lookup result.
    pub fn classify(value: Option<&'a serde_json::Value>) -> Self {
        use serde_json::Value;

        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::String(s)) if s.is_empty() => FieldValue::Absent,
            Some(Value::String(s)) => FieldValue::Text(s),
            Some(Value::Array(items)) if items.is_empty() => FieldValue::Absent,
            Some(Value::Array(items)) => FieldValue::Files(items),
            Some(Value::Object(map)) => FieldValue::Nested(map),
            Some(other) => FieldValue::Other(other),
        }
    }

    /// Whether the record answered at all (any non-empty shape).
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Absent)
    }

    /// The string content, for text-like analytics.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parsed file descriptors, for file fields.
    pub fn files(&self) -> Vec<FileDescriptor> {
        match self {
            FieldValue::Files(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_roundtrip() {
        for ty in [
            FieldType::Text,
            FieldType::Email,
            FieldType::Phone,
            FieldType::Textarea,
            FieldType::Select,
            FieldType::File,
        ] {
            assert_eq!(ty.as_str().parse::<FieldType>().unwrap(), ty);
        }
        assert!("checkbox".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_value_classification() {
        assert_eq!(FieldValue::classify(None), FieldValue::Absent);
        assert_eq!(FieldValue::classify(Some(&json!(null))), FieldValue::Absent);
        assert_eq!(FieldValue::classify(Some(&json!(""))), FieldValue::Absent);
        assert_eq!(FieldValue::classify(Some(&json!([]))), FieldValue::Absent);

        let text = json!("Remote");
        assert_eq!(
            FieldValue::classify(Some(&text)),
            FieldValue::Text("Remote")
        );

        let files = json!([{"name": "cv.pdf", "url": "https://example.com/cv.pdf"}]);
        assert!(FieldValue::classify(Some(&files)).is_present());

        let nested = json!({"street": "Main St"});
        assert!(matches!(
            FieldValue::classify(Some(&nested)),
            FieldValue::Nested(_)
        ));

        let number = json!(42);
        assert!(FieldValue::classify(Some(&number)).is_present());
    }

    #[test]
    fn test_file_descriptor_display_name() {
        let value = json!([{"name": "cv.pdf", "url": "https://example.com/cv.pdf", "size": 1024}]);
        let files = FieldValue::classify(Some(&value)).files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display_name(), "cv.pdf");

        let nameless = json!([{"url": "https://example.com/cv.pdf"}]);
        let files = FieldValue::classify(Some(&nameless)).files();
        assert_eq!(files[0].display_name(), "https://example.com/cv.pdf");
    }

    #[test]
    fn test_view_source_total() {
        let counter = ViewSource::Counter { count: 12 };
        assert_eq!(counter.total(), 12);
        assert!(counter.events().is_none());

        let events = ViewSource::Events {
            events: vec![ViewEvent {
                form_id: "form-1".to_string(),
                timestamp: Utc::now(),
            }],
        };
        assert_eq!(events.total(), 1);
        assert!(events.events().is_some());
    }

    #[test]
    fn test_schema_deserializes_with_defaults() {
        let schema: FormSchema = serde_json::from_value(json!({
            "id": "form-1",
            "title": "Backend Engineer",
            "fields": [
                {"label": "full name", "type": "text", "required": true},
                {"id": "f-loc", "label": "location", "type": "select",
                 "options": ["Remote", "Onsite"]}
            ]
        }))
        .unwrap();

        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields[0].id.is_none());
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[1].options.len(), 2);
        assert!(!schema.fields[1].required);
    }
}
