//! Record and page shapes exchanged with the API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to value mapping of a single row.
pub type Fields = BTreeMap<String, String>;

/// One row of a table.
///
/// A record with an empty `id` is a pending creation; a non-empty `id` refers
/// to a specific remote row. Empty values are left out of the JSON encoding.
///
/// # Examples
///
/// ```
/// use airtable_core::{Fields, Record};
///
/// let mut fields = Fields::new();
/// fields.insert("Name".to_string(), "Ada".to_string());
///
/// let pending = Record::new(fields.clone());
/// assert!(pending.is_pending());
///
/// let existing = Record::with_id("rec123", fields);
/// assert_eq!(existing.id(), "rec123");
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct Record {
    /// Remote identifier, empty until assigned by the service
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    /// Field values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: Fields,
    /// Server-assigned creation timestamp, empty until returned by a read
    #[serde(
        default,
        rename = "createdTime",
        skip_serializing_if = "String::is_empty"
    )]
    created_time: String,
}

impl Record {
    /// Record awaiting creation.
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Record referring to an existing remote row.
    pub fn with_id(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
            created_time: String::new(),
        }
    }

    /// Start building a record field by field.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// True when the service has not assigned an identifier yet.
    pub fn is_pending(&self) -> bool {
        self.id.is_empty()
    }

    /// Consume the record, keeping only its fields.
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

/// One page of a list response.
///
/// `offset` is the continuation cursor; it is surfaced for callers that page
/// manually and is never followed automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RecordPage {
    /// Records on this page, in server order
    #[serde(default)]
    records: Vec<Record>,
    /// Cursor for the next page, absent on the last one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<String>,
}

impl RecordPage {
    /// Assemble a page.
    pub fn new(records: Vec<Record>, offset: Option<String>) -> Self {
        Self { records, offset }
    }

    /// Consume the page, keeping only its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// True when the service reported more records after this page.
    pub fn has_more(&self) -> bool {
        self.offset.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Body of a create or update request: `{"records": [...]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordsPayload<'a> {
    /// Records to write
    pub records: &'a [Record],
}

impl<'a> RecordsPayload<'a> {
    /// Wrap a slice of records.
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pending_record_serializes_fields_only() {
        let record = Record::new(fields(&[("Name", "Ada")]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"fields": {"Name": "Ada"}}));
    }

    #[test]
    fn update_record_carries_identifier() {
        let record = Record::with_id("recA", fields(&[("Status", "Done")]));
        let payload = RecordsPayload::new(std::slice::from_ref(&record));
        let json = serde_json::to_value(payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"records": [{"id": "recA", "fields": {"Status": "Done"}}]})
        );
    }

    #[test]
    fn page_decodes_list_envelope() {
        let body = r#"{
            "records": [
                {"id": "rec1", "fields": {"Name": "Ada"}, "createdTime": "2024-01-01T00:00:00.000Z"},
                {"id": "rec2", "createdTime": "2024-01-02T00:00:00.000Z"}
            ],
            "offset": "itrXYZ/rec2"
        }"#;
        let page: RecordPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.records().len(), 2);
        assert_eq!(page.records()[0].created_time(), "2024-01-01T00:00:00.000Z");
        assert!(page.records()[1].fields().is_empty());
        assert_eq!(page.offset().as_deref(), Some("itrXYZ/rec2"));
        assert!(page.has_more());
    }

    #[test]
    fn page_without_offset_is_last() {
        let page: RecordPage = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(page.records().is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn builder_defaults_missing_parts() {
        let record = Record::builder()
            .id("rec9")
            .fields(fields(&[("k", "v")]))
            .build()
            .unwrap();
        assert_eq!(record.id(), "rec9");
        assert!(record.created_time().is_empty());
    }
}
