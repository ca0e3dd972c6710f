//! Record operations on a (base, table) collection.

use crate::{AirtableClientBuilder, AuthenticatedRequestExecutor, HttpMethod, HttpResponse};
use airtable_core::{
    AirtableConfig, BatchPlan, ClientCredentials, Fields, OFFSET_PARAM, Record, RecordPage,
    RecordsPayload, RequestTarget,
};
use airtable_error::{AirtableResult, ConfigError, SerializationError, UnexpectedStatusError};
use reqwest::Url;
use tracing::{debug, info, instrument};

/// Client for the records of Airtable tables.
///
/// Cheap to clone; clones share the rate limiter and HTTP connection pool,
/// so the request rate holds across every clone and task.
///
/// # Example
///
/// ```rust,ignore
/// use airtable_client::AirtableClient;
/// use airtable_core::{Fields, Record};
///
/// let client = AirtableClient::new(api_key, "https://api.airtable.com/v0")?;
///
/// let mut fields = Fields::new();
/// fields.insert("Name".into(), "Ada".into());
/// client.create_records("appXYZ", "People", vec![fields]).await?;
///
/// let people = client.get_records("appXYZ", "People", "").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AirtableClient {
    executor: AuthenticatedRequestExecutor,
    base_url: Url,
    batch_size: usize,
    strict_writes: bool,
}

impl AirtableClient {
    /// Client for `base_url` authenticating with `api_key`, default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the key is empty or the URL is invalid.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> AirtableResult<Self> {
        Self::builder()
            .credentials(ClientCredentials::new(api_key, base_url)?)
            .build()
    }

    /// Client for the public service, key read from `AIRTABLE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the variable is unset or empty.
    pub fn from_env() -> AirtableResult<Self> {
        Self::builder()
            .credentials(ClientCredentials::from_env()?)
            .build()
    }

    /// Client configured from `config`, key read from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the key is missing or a setting is invalid.
    pub fn from_config(config: AirtableConfig) -> AirtableResult<Self> {
        let credentials = ClientCredentials::from_env_var(&config.api_key_env, &config.base_url)?;
        Self::builder().credentials(credentials).config(config).build()
    }

    /// Start a builder.
    pub fn builder() -> AirtableClientBuilder {
        AirtableClientBuilder::new()
    }

    pub(crate) fn from_parts(
        executor: AuthenticatedRequestExecutor,
        batch_size: usize,
        strict_writes: bool,
    ) -> AirtableResult<Self> {
        let base_url = Url::parse(executor.credentials().base_url()).map_err(|e| {
            ConfigError::new(format!(
                "Invalid base URL {}: {}",
                executor.credentials().base_url(),
                e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::new(format!("Base URL {} cannot carry a path", base_url)).into());
        }
        Ok(Self {
            executor,
            base_url,
            batch_size,
            strict_writes,
        })
    }

    /// Request executor shared by every operation.
    pub fn executor(&self) -> &AuthenticatedRequestExecutor {
        &self.executor
    }

    /// List the records of `base`/`table`, optionally filtered by a formula.
    ///
    /// An empty `filter` sends no `filterByFormula` parameter. Only the first
    /// page is returned; see [`get_records_page`](Self::get_records_page).
    ///
    /// # Errors
    ///
    /// - Unexpected status error when the response is not 200
    /// - Serialization error when the body is not a record list
    /// - Transport and retry exhausted errors from the executor
    pub async fn get_records(
        &self,
        base: &str,
        table: &str,
        filter: &str,
    ) -> AirtableResult<Vec<Record>> {
        let target = RequestTarget::new(base, table).with_filter(filter);
        let page = self.get_records_page(&target, None).await?;
        Ok(page.into_records())
    }

    /// Fetch one page of `target`, starting at `offset` when given.
    ///
    /// The returned page carries the cursor for the next one; it is never
    /// followed automatically.
    ///
    /// # Errors
    ///
    /// Same as [`get_records`](Self::get_records).
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn get_records_page(
        &self,
        target: &RequestTarget,
        offset: Option<&str>,
    ) -> AirtableResult<RecordPage> {
        let url = self.collection_url(target, offset);
        let response = self
            .executor
            .execute(HttpMethod::Get, url.as_str(), None)
            .await?;

        if response.status != 200 {
            return Err(UnexpectedStatusError::new("get_records", response.status, response.body).into());
        }

        let page: RecordPage = response.json()?;
        debug!(records = page.records().len(), has_more = page.has_more(), "Decoded record page");
        Ok(page)
    }

    /// Create one record per field map in a single POST.
    ///
    /// No batching is applied, so the service's per-request ceiling still
    /// applies to `records`.
    ///
    /// # Errors
    ///
    /// - Serialization error when the payload cannot be encoded
    /// - Transport and retry exhausted errors from the executor
    /// - Unexpected status error on a non-2xx response, strict mode only
    pub async fn create_records(
        &self,
        base: &str,
        table: &str,
        records: Vec<Fields>,
    ) -> AirtableResult<()> {
        self.create_records_at(&RequestTarget::new(base, table), records)
            .await
    }

    /// [`create_records`](Self::create_records) addressed by a target.
    ///
    /// The target's filter is ignored.
    #[instrument(skip(self, target, records), fields(target = %target, count = records.len()))]
    pub async fn create_records_at(
        &self,
        target: &RequestTarget,
        records: Vec<Fields>,
    ) -> AirtableResult<()> {
        let records: Vec<Record> = records.into_iter().map(Record::new).collect();
        let body = Self::encode(&records)?;
        let url = self.collection_url(&Self::unfiltered(target), None);

        info!("Sending to airtable {}", url);
        let response = self
            .executor
            .execute(HttpMethod::Post, url.as_str(), Some(body))
            .await?;
        self.check_write("create_records", response)
    }

    /// Update existing records, at most one batch per PATCH, in order.
    ///
    /// Stops at the first failing batch. Batches already sent stay applied.
    ///
    /// # Errors
    ///
    /// - Serialization error when a batch cannot be encoded
    /// - Transport and retry exhausted errors from the executor
    /// - Unexpected status error on a non-2xx response, strict mode only
    pub async fn update_records(
        &self,
        base: &str,
        table: &str,
        records: Vec<Record>,
    ) -> AirtableResult<()> {
        self.update_records_at(&RequestTarget::new(base, table), records)
            .await
    }

    /// [`update_records`](Self::update_records) addressed by a target.
    ///
    /// The target's filter is ignored.
    #[instrument(skip(self, target, records), fields(target = %target, count = records.len()))]
    pub async fn update_records_at(
        &self,
        target: &RequestTarget,
        records: Vec<Record>,
    ) -> AirtableResult<()> {
        let url = self.collection_url(&Self::unfiltered(target), None);
        let plan = BatchPlan::plan(records, self.batch_size)?;
        let batches = plan.len();

        for (index, batch) in plan.into_iter().enumerate() {
            debug!(batch = index + 1, batches, size = batch.len(), "Submitting update batch");
            let body = Self::encode(&batch)?;
            let response = self
                .executor
                .execute(HttpMethod::Patch, url.as_str(), Some(body))
                .await?;
            self.check_write("update_records", response)?;
        }
        Ok(())
    }

    fn unfiltered(target: &RequestTarget) -> RequestTarget {
        RequestTarget::new(target.base().as_str(), target.table().as_str())
    }

    /// `<base_url>/<base>/<table>` with the target's query and the cursor.
    fn collection_url(&self, target: &RequestTarget, offset: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(target.path_segments());
        }

        let mut pairs = target.query_pairs();
        if let Some(offset) = offset.filter(|o| !o.is_empty()) {
            pairs.push((OFFSET_PARAM, offset));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    fn encode(records: &[Record]) -> AirtableResult<Vec<u8>> {
        serde_json::to_vec(&RecordsPayload::new(records))
            .map_err(|e| SerializationError::from(e).into())
    }

    fn check_write(&self, operation: &'static str, response: HttpResponse) -> AirtableResult<()> {
        if self.strict_writes && !response.is_success() {
            return Err(UnexpectedStatusError::new(operation, response.status, response.body).into());
        }
        if !response.is_success() {
            debug!(operation, status = response.status, "Write returned a failure status");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AirtableClient {
        AirtableClient::new("key", base_url).unwrap()
    }

    #[test]
    fn url_joins_base_and_table() {
        let client = client("https://api.airtable.com/v0");
        let url = client.collection_url(&RequestTarget::new("appA", "Tasks"), None);
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appA/Tasks");
    }

    #[test]
    fn table_names_are_percent_encoded() {
        let client = client("https://api.airtable.com/v0");
        let url = client.collection_url(&RequestTarget::new("appA", "My Tasks"), None);
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appA/My%20Tasks");
    }

    #[test]
    fn filter_and_offset_become_query() {
        let client = client("https://api.airtable.com/v0");
        let target = RequestTarget::new("appA", "Tasks").with_filter("{Done} = 1");
        let url = client.collection_url(&target, Some("itr1/rec2"));
        assert_eq!(
            url.query(),
            Some("filterByFormula=%7BDone%7D+%3D+1&offset=itr1%2Frec2")
        );
    }

    #[test]
    fn empty_offset_is_dropped() {
        let client = client("https://api.airtable.com/v0");
        let url = client.collection_url(&RequestTarget::new("appA", "Tasks"), Some(""));
        assert_eq!(url.query(), None);
    }

    #[test]
    fn unparseable_base_url_is_config_error() {
        let err = AirtableClient::new("key", "not a url").unwrap_err();
        assert!(matches!(
            err.kind(),
            airtable_error::AirtableErrorKind::Config(_)
        ));
    }
}
