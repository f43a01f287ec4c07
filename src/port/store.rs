//! Table-store port.
//!
//! The remote store is a plain record-table service: whole-table reads,
//! single-record creates, and id-addressed updates, nothing else. No
//! filtering, no server-side sequences, no transactions: every
//! consistency property this backend needs is layered on in the
//! application modules.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Table;
use crate::error::Result;

/// Client for the remote record-table store.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Records travel as raw JSON values; typing happens above this port
/// - `fetch_all` must normalize envelope variants (a bare list, or an
///   object wrapping a `data` list) and degrade any other shape to an
///   empty list rather than erroring
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &'static str;

    /// Fetch every record in a table.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-2xx responses.
    /// Unexpected response shapes are not errors; they normalize to an
    /// empty list.
    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>>;

    /// Create a record. Returns the store's response body as-is; callers
    /// that need the canonical row re-read the table.
    async fn create(&self, table: Table, record: &Value) -> Result<Value>;

    /// Update an existing record with a partial body containing only the
    /// fields to change.
    async fn update(&self, table: Table, id: &str, partial: &Value) -> Result<Value>;
}
