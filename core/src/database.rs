//! The consumer-facing record-store handle.
//!
//! # Design
//! `Database` pairs a `DatabaseClient` with a `Transport`. Every operation is
//! `build_*`, one `Transport::execute`, then `parse_*`; `exists` is the only
//! operation that composes another. Nothing is cached or retried.
//!
//! The one intentional asymmetry: [`Database::fetch_record`] turns every
//! failure, not-found and transport errors included, into `Ok(None)`. All
//! other operations surface failures as `DbError`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::DatabaseClient;
use crate::error::{DbError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Fetched, Record, Snapshot, Target};

/// Handle on one project of the record store.
#[derive(Debug, Clone)]
pub struct Database<T> {
    client: DatabaseClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Database<crate::transport::UreqTransport> {
    /// Handle on `project_id` on the hosted API, using a default `ureq` agent.
    pub fn new(project_id: &str) -> Result<Self> {
        Ok(Self::with_transport(
            DatabaseClient::new(project_id)?,
            crate::transport::UreqTransport::new(),
        ))
    }
}

impl<T: Transport> Database<T> {
    pub fn with_transport(client: DatabaseClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DatabaseClient {
        &self.client
    }

    pub fn project_id(&self) -> &str {
        self.client.project_id()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.path, "dispatching request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "response received");
        Ok(response)
    }

    /// Fetch whatever `target` names.
    pub fn fetch(&self, target: Target<'_>) -> Result<Fetched> {
        match target {
            Target::Database => self.fetch_all().map(Fetched::Database),
            Target::List(list) => self.fetch_list(list).map(Fetched::List),
            Target::Record(list, id) => self.fetch_record(list, id).map(Fetched::Record),
        }
    }

    /// Every list in the project with its records.
    pub fn fetch_all(&self) -> Result<Snapshot> {
        let request = self.client.build_fetch(Target::Database)?;
        self.client.parse_snapshot(self.send(request)?)
    }

    /// Records of `list`; empty when the list does not exist.
    pub fn fetch_list(&self, list: &str) -> Result<Vec<Record>> {
        let request = self.client.build_fetch(Target::List(list))?;
        self.client.parse_list(self.send(request)?)
    }

    /// Look up a single record.
    ///
    /// Returns `Ok(None)` when the record does not exist **and** when the
    /// request fails for any other reason. Only empty arguments are errors.
    pub fn fetch_record(&self, list: &str, id: &str) -> Result<Option<Record>> {
        let request = self.client.build_fetch(Target::Record(list, id))?;
        match self.send(request) {
            Ok(response) => Ok(self.client.parse_record(response)),
            Err(e) => {
                debug!(error = %e, list, id, "record lookup failed, treating as absent");
                Ok(None)
            }
        }
    }

    /// Whether `fetch_record(list, id)` finds something.
    pub fn exists(&self, list: &str, id: &str) -> Result<bool> {
        self.fetch_record(list, id).map(|record| record.is_some())
    }

    /// Append a record to `list`; the service assigns its `id`.
    pub fn create<D: Serialize + ?Sized>(&self, list: &str, data: &D) -> Result<Record> {
        let request = self.client.build_create(list, data)?;
        self.client.parse_written(self.send(request)?)
    }

    /// Overwrite record `id` with `data`, discarding every previous field.
    /// Creates the record if it does not exist.
    pub fn replace<D: Serialize + ?Sized>(&self, list: &str, id: &str, data: &D) -> Result<Record> {
        let request = self.client.build_replace(list, id, data)?;
        self.client.parse_written(self.send(request)?)
    }

    /// Merge `data` into record `id`; absent fields keep their values.
    /// Creates the record from `data` if it does not exist.
    pub fn update<D: Serialize + ?Sized>(&self, list: &str, id: &str, data: &D) -> Result<Record> {
        let request = self.client.build_update(list, id, data)?;
        self.client.parse_written(self.send(request)?)
    }

    /// Delete whatever `target` names. `Target::Database` wipes the whole
    /// project and cannot be undone.
    ///
    /// Failures are reported as `DbError::Unknown`; the cause is its source.
    pub fn delete(&self, target: Target<'_>) -> Result<()> {
        let request = self.client.build_delete(target)?;
        let outcome = self
            .send(request)
            .map_err(DbError::unknown)
            .and_then(|response| self.client.parse_delete(response));
        if let Err(DbError::Unknown(cause)) = &outcome {
            warn!(error = %cause, what = ?target, "delete failed");
        }
        outcome
    }

    pub fn delete_all(&self) -> Result<()> {
        self.delete(Target::Database)
    }

    pub fn delete_list(&self, list: &str) -> Result<()> {
        self.delete(Target::List(list))
    }

    pub fn delete_record(&self, list: &str, id: &str) -> Result<()> {
        self.delete(Target::Record(list, id))
    }

    /// Alias of [`Database::create`].
    #[inline]
    pub fn post<D: Serialize + ?Sized>(&self, list: &str, data: &D) -> Result<Record> {
        self.create(list, data)
    }

    /// Alias of [`Database::replace`].
    #[inline]
    pub fn put<D: Serialize + ?Sized>(&self, list: &str, id: &str, data: &D) -> Result<Record> {
        self.replace(list, id, data)
    }

    /// Alias of [`Database::replace`].
    #[inline]
    pub fn set<D: Serialize + ?Sized>(&self, list: &str, id: &str, data: &D) -> Result<Record> {
        self.replace(list, id, data)
    }

    /// Alias of [`Database::update`].
    #[inline]
    pub fn patch<D: Serialize + ?Sized>(&self, list: &str, id: &str, data: &D) -> Result<Record> {
        self.update(list, id, data)
    }
}
