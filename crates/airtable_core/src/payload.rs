//! Command payloads consumed by batch tooling.

use crate::{Fields, Record, RequestTarget};
use serde::{Deserialize, Serialize};

/// A write command: which table to touch and the field maps to send.
///
/// ```json
/// {"base": "appXYZ", "table": "Tasks", "records": [{"Name": "Ada"}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Base identifier
    pub base: String,
    /// Table name or identifier
    pub table: String,
    /// One field map per record
    #[serde(default)]
    pub records: Vec<Fields>,
}

impl CommandPayload {
    /// Target addressed by the command.
    pub fn target(&self) -> RequestTarget {
        RequestTarget::new(&self.base, &self.table)
    }

    /// The field maps as pending records.
    pub fn pending_records(&self) -> Vec<Record> {
        self.records.iter().cloned().map(Record::new).collect()
    }
}

/// An update command: which table to touch and the records to patch.
///
/// ```json
/// {"base": "appXYZ", "table": "Tasks", "records": [{"id": "rec1", "fields": {"Status": "Done"}}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    /// Base identifier
    pub base: String,
    /// Table name or identifier
    pub table: String,
    /// Records with their remote identifiers
    #[serde(default)]
    pub records: Vec<Record>,
}

impl UpdatePayload {
    /// Target addressed by the command.
    pub fn target(&self) -> RequestTarget {
        RequestTarget::new(&self.base, &self.table)
    }

    /// Records lacking an identifier, which an update cannot address.
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }
}
