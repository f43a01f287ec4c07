//! Medrelay - clinical record synchronization and workflow orchestration.
//!
//! This crate is the integration backend between a clinical front-end and
//! two external services: a remote record-table store (generic
//! GET/POST/PUT on named tables, with no filtering, sequences, or
//! transactions) and a structured-inference service that answers one
//! schema-constrained call per request.
//!
//! # Architecture
//!
//! The store is deliberately dumb, so every consistency property lives in
//! the application layer:
//!
//! - **`application::sequence`** - client-side identifier allocation by
//!   max-scan (the inherited read-then-write race is preserved, not hidden)
//! - **`application::reconcile`** - diff-based idempotent partial updates
//!   with a no-op short-circuit
//! - **`domain::geo`** - composite-address parsing and haversine ranking
//!   of facilities
//! - **`application::registry`** - explicit name-keyed tool registry with
//!   a uniform JSON-in/JSON-out dispatch contract
//! - **`application::workflow`** - the order-generation and
//!   order-completion workflows, each chaining remote reads, exactly one
//!   inference call, and remote writes
//!
//! # Modules
//!
//! - [`config`] - TOML configuration and logging setup
//! - [`domain`] - typed entities, raw-record helpers, geo math
//! - [`error`] - typed failure taxonomy
//! - [`port`] - traits for the two external collaborators
//! - [`adapter`] - reqwest implementations of the ports
//! - [`application`] - the synchronization and orchestration layer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use medrelay::adapter::{HttpTableStore, OpenAi};
//! use medrelay::application::{workflow, ToolRegistry};
//! use medrelay::config::Config;
//!
//! # fn main() -> medrelay::error::Result<()> {
//! let config = Config::load("medrelay.toml")?;
//! let store = Arc::new(HttpTableStore::from_config(&config.store));
//! let inference = Arc::new(OpenAi::from_env(&config.inference)?);
//!
//! let mut registry = ToolRegistry::new();
//! workflow::tools::register_defaults(&mut registry, store, inference);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
