//! Domain types for the record-store API.
//!
//! # Design
//! A `Record` is an arbitrary JSON object whose only reserved key is `id`.
//! The client never interprets the other keys, so they are kept as a raw
//! `serde_json::Map` and flattened next to `id` on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Assigned by the service on creation.
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field names, `id` included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once("id").chain(self.fields.keys().map(String::as_str))
    }
}

/// The whole project: record-list name to the records in that list.
pub type Snapshot = BTreeMap<String, Vec<Record>>;

/// What a fetch or delete is aimed at.
///
/// Replaces positional-argument overloading: "no record id" is spelled
/// `List`, never an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Database,
    List(&'a str),
    Record(&'a str, &'a str),
}

/// Result of [`Database::fetch`](crate::Database::fetch), one variant per
/// target.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Database(Snapshot),
    List(Vec<Record>),
    /// `None` is the absence value: the record does not exist or could not
    /// be retrieved.
    Record(Option<Record>),
}
