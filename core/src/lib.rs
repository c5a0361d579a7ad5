//! Client library for the hosted RESTful record store.
//!
//! # Overview
//! A project holds named record lists; a record is a JSON object with a
//! service-assigned `id`. [`Database`] exposes fetch, create, replace,
//! update, exists and delete for one project, each mapped onto a single
//! HTTP request.
//!
//! # Design
//! - [`DatabaseClient`] is sans-IO: `build_*` produces an [`HttpRequest`],
//!   `parse_*` consumes an [`HttpResponse`]. It holds only the project id
//!   and base URL.
//! - [`Transport`] performs the round-trip. [`UreqTransport`] is the default
//!   implementation (cargo feature `ureq`).
//! - [`Target`] selects the whole database, one list, or one record, in
//!   place of positional-argument overloading.
//! - A single-record fetch that fails yields `None`, never an error.
//!
//! ```no_run
//! use restful_db_core::Database;
//! use serde_json::json;
//!
//! # fn main() -> restful_db_core::Result<()> {
//! let db = Database::new("206fdabc-607a-47e0-aa06-2e6795b2633")?;
//! let user = db.create("users", &json!({"name": "Ken Mueller", "age": 13}))?;
//! assert!(db.exists("users", &user.id)?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::DatabaseClient;
pub use config::{ClientConfig, API_ROOT};
pub use database::Database;
pub use error::{DbError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Fetched, Record, Snapshot, Target};
