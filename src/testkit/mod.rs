//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! - [`InMemoryStore`]: a well-behaved [`TableStore`] fake that counts
//!   writes, so tests can assert the idempotent short-circuit and the
//!   zero-writes-on-failure properties.
//! - [`ScriptedInference`]: a [`StructuredInference`] fake that replays
//!   queued responses and records the requests it saw.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{record, Table};
use crate::error::{Error, Result};
use crate::port::{InferenceRequest, StructuredInference, TableStore};

/// In-memory [`TableStore`] with write counters.
///
/// `create` appends and echoes the record; `update` merges the partial
/// body into the matching row, like a well-behaved remote store. A table
/// can be armed to fail creates, for exercising mid-workflow failures.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_creates: Mutex<Option<Table>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with records, replacing any existing contents.
    pub fn seed(&self, table: Table, records: Vec<Value>) {
        self.tables.lock().unwrap().insert(table, records);
    }

    /// Snapshot of a table's records.
    #[must_use]
    pub fn records(&self, table: Table) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Total `create` calls across all tables.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Total `update` calls across all tables.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent `create` against `table` fail upstream.
    pub fn fail_creates_for(&self, table: Table) {
        *self.fail_creates.lock().unwrap() = Some(table);
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>> {
        Ok(self.records(table))
    }

    async fn create(&self, table: Table, record: &Value) -> Result<Value> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_creates.lock().unwrap() == Some(table) {
            return Err(Error::Upstream {
                status: 500,
                body: format!("create rejected for table {table}"),
            });
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table)
            .or_default()
            .push(record.clone());
        Ok(record.clone())
    }

    async fn update(&self, table: Table, id: &str, partial: &Value) -> Result<Value> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        let records = tables.entry(table).or_default();
        let Some(row) = records
            .iter_mut()
            .find(|r| record::id_matches(r, table.id_field(), id))
        else {
            return Err(Error::Upstream {
                status: 404,
                body: format!("no row {id} in table {table}"),
            });
        };
        if let (Value::Object(target), Value::Object(fields)) = (&mut *row, partial) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }
}

/// Scripted [`StructuredInference`] replaying queued argument payloads.
///
/// An exhausted queue answers with [`Error::InferenceContract`], which
/// doubles as the zero-structured-calls scenario.
#[derive(Default)]
pub struct ScriptedInference {
    responses: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedInference {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response payload (the structured call's arguments).
    #[must_use]
    pub fn with_response(self, args: Value) -> Self {
        self.responses.lock().unwrap().push_back(args);
        self
    }

    /// Requests captured so far, in invocation order.
    #[must_use]
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredInference for ScriptedInference {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn invoke(&self, request: &InferenceRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            Error::InferenceContract("response contained no structured call".into())
        })
    }
}
