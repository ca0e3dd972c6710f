//! Addressing of a record collection.

use serde::{Deserialize, Serialize};

/// Query parameter carrying the server-side filter formula.
pub const FILTER_PARAM: &str = "filterByFormula";

/// Query parameter carrying the page cursor.
pub const OFFSET_PARAM: &str = "offset";

/// The (base, table, filter) triple addressing a collection of records.
///
/// Maps to the path `<base>/<table>` below the service base URL; the filter,
/// when non-empty, becomes the `filterByFormula` query parameter.
///
/// # Examples
///
/// ```
/// use airtable_core::RequestTarget;
///
/// let target = RequestTarget::new("appXYZ", "Tasks").with_filter("{Status} = 'Open'");
/// assert_eq!(target.path_segments(), ["appXYZ", "Tasks"]);
/// assert_eq!(target.query_pairs().len(), 1);
///
/// let unfiltered = RequestTarget::new("appXYZ", "Tasks").with_filter("");
/// assert!(unfiltered.query_pairs().is_empty());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct RequestTarget {
    /// Base (workspace) identifier
    base: String,
    /// Table name or identifier
    table: String,
    /// Filter formula, `None` when no filtering is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
}

impl RequestTarget {
    /// Address every record of `table` in `base`.
    pub fn new(base: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            table: table.into(),
            filter: None,
        }
    }

    /// Restrict the collection with a filter formula. An empty formula clears it.
    pub fn with_filter(mut self, formula: impl Into<String>) -> Self {
        let formula = formula.into();
        self.filter = (!formula.is_empty()).then_some(formula);
        self
    }

    /// Path segments appended to the service base URL.
    pub fn path_segments(&self) -> [&str; 2] {
        [self.base.as_str(), self.table.as_str()]
    }

    /// Query parameters, unencoded. Empty when there is no filter.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.filter
            .as_deref()
            .map(|formula| (FILTER_PARAM, formula))
            .into_iter()
            .collect()
    }
}

impl std::fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.table)
    }
}
