//! HTTP adapter for the remote record-table store.
//!
//! The store exposes one route shape per table:
//! `GET/POST {base}/table/{name}` and `PUT {base}/table/{name}/{id}`.
//! It supports no query parameters, so all filtering happens client-side
//! in the application layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::domain::Table;
use crate::error::{Error, Result};
use crate::port::TableStore;

/// Reqwest-backed [`TableStore`] implementation.
///
/// One timeout bounds every call. It is sized generously (default 60 s)
/// because store calls are issued from workflows that also hold an
/// inference call on the same user-facing deadline.
pub struct HttpTableStore {
    http: HttpClient,
    base_url: String,
}

impl HttpTableStore {
    /// Create a client with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(60))
    }

    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_timeout(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/table/{}", self.base_url.trim_end_matches('/'), table)
    }

    /// Surface non-2xx responses as [`Error::Upstream`] with the body
    /// attached, then parse the body as JSON.
    async fn read_json(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TableStore for HttpTableStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>> {
        let url = self.table_url(table);
        let response = self.http.get(&url).send().await?;
        let body = Self::read_json(response).await?;
        let records = extract_records(body);
        debug!(table = %table, count = records.len(), "Fetched table");
        Ok(records)
    }

    async fn create(&self, table: Table, record: &Value) -> Result<Value> {
        let url = self.table_url(table);
        let response = self.http.post(&url).json(record).send().await?;
        debug!(table = %table, "Created record");
        Self::read_json(response).await
    }

    async fn update(&self, table: Table, id: &str, partial: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.table_url(table), id);
        let response = self.http.put(&url).json(partial).send().await?;
        debug!(table = %table, id = %id, "Updated record");
        Self::read_json(response).await
    }
}

/// Normalize the store's response envelopes to a list of records.
///
/// Accepts a bare list or an object wrapping a `data` list. Any other
/// shape degrades to an empty list: never an error.
#[must_use]
pub fn extract_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
