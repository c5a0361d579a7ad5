//! Stateless HTTP request builder and response parser for the record-store API.
//!
//! # Design
//! `DatabaseClient` holds only the project id and the derived base URL and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that validates arguments and produces an `HttpRequest`,
//! and a `parse_*` method that consumes an `HttpResponse`. Executing the
//! round-trip is left to a [`Transport`](crate::Transport).
//!
//! # Response normalization
//! - 5xx: `DbError::RemoteFault` carrying the body verbatim.
//! - Any other status: the body is the payload and is decoded as such.
//! - Single-record fetch is the exception. Any non-2xx status or an
//!   undecodable body yields `None` instead of an error, because callers
//!   routinely check for records that may not exist.
//! - Delete failures are re-signaled as `DbError::Unknown`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use urlencoding::encode;

use crate::config::ClientConfig;
use crate::error::{DbError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Record, Snapshot, Target};

/// Synchronous, stateless client for one project of the record store.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseClient {
    project_id: String,
    base_url: String,
}

impl DatabaseClient {
    /// Client for `project_id` on the hosted API.
    pub fn new(project_id: &str) -> Result<Self> {
        Self::with_config(project_id, &ClientConfig::default())
    }

    pub fn with_config(project_id: &str, config: &ClientConfig) -> Result<Self> {
        if project_id.is_empty() {
            return Err(DbError::invalid("project id cannot be empty"));
        }
        Ok(Self {
            project_id: project_id.to_string(),
            base_url: format!("{}/{}", config.api_root, encode(project_id)),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `<api_root>/<project_id>`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `target`, rejecting empty list names and record ids.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `#` inside a list
    /// name or id stay part of that segment.
    pub fn url(&self, target: Target<'_>) -> Result<String> {
        match target {
            Target::Database => Ok(self.base_url.clone()),
            Target::List(list) => {
                require_list(list)?;
                Ok(format!("{}/{}", self.base_url, encode(list)))
            }
            Target::Record(list, id) => {
                require_list(list)?;
                require_id(id)?;
                Ok(format!("{}/{}/{}", self.base_url, encode(list), encode(id)))
            }
        }
    }

    pub fn build_fetch(&self, target: Target<'_>) -> Result<HttpRequest> {
        Ok(bodyless(HttpMethod::Get, self.url(target)?))
    }

    pub fn build_create<T: Serialize + ?Sized>(&self, list: &str, data: &T) -> Result<HttpRequest> {
        with_body(HttpMethod::Post, self.url(Target::List(list))?, data)
    }

    pub fn build_replace<T: Serialize + ?Sized>(
        &self,
        list: &str,
        id: &str,
        data: &T,
    ) -> Result<HttpRequest> {
        with_body(HttpMethod::Put, self.url(Target::Record(list, id))?, data)
    }

    pub fn build_update<T: Serialize + ?Sized>(
        &self,
        list: &str,
        id: &str,
        data: &T,
    ) -> Result<HttpRequest> {
        with_body(HttpMethod::Patch, self.url(Target::Record(list, id))?, data)
    }

    pub fn build_delete(&self, target: Target<'_>) -> Result<HttpRequest> {
        Ok(bodyless(HttpMethod::Delete, self.url(target)?))
    }

    /// An empty or `null` body is an empty snapshot.
    pub fn parse_snapshot(&self, response: HttpResponse) -> Result<Snapshot> {
        decode_or_default(&normalize(response)?)
    }

    /// An empty or `null` body is an empty list.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Record>> {
        decode_or_default(&normalize(response)?)
    }

    /// Never fails: every unsuccessful lookup is the absence value `None`.
    pub fn parse_record(&self, response: HttpResponse) -> Option<Record> {
        if !response.is_success() {
            debug!(status = response.status, "record lookup answered with non-success status");
            return None;
        }
        match serde_json::from_str::<Option<Record>>(&response.body) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "record lookup returned an undecodable body");
                None
            }
        }
    }

    /// Decode the record returned by create, replace and update.
    pub fn parse_written(&self, response: HttpResponse) -> Result<Record> {
        let body = normalize(response)?;
        serde_json::from_str(&body).map_err(DbError::Deserialization)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        normalize(response).map(drop).map_err(DbError::unknown)
    }
}

fn require_list(list: &str) -> Result<()> {
    if list.is_empty() {
        return Err(DbError::invalid("record list cannot be empty"));
    }
    Ok(())
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DbError::invalid("record id cannot be empty"));
    }
    Ok(())
}

fn bodyless(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

/// `data` must serialize to a JSON object; primitives, arrays and null are
/// rejected before any request exists.
fn with_body<T: Serialize + ?Sized>(method: HttpMethod, path: String, data: &T) -> Result<HttpRequest> {
    let value = serde_json::to_value(data).map_err(DbError::Serialization)?;
    if !value.is_object() {
        return Err(DbError::invalid("data must be a JSON object"));
    }
    let body = serde_json::to_string(&value).map_err(DbError::Serialization)?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Split a response into payload or `RemoteFault`.
fn normalize(response: HttpResponse) -> Result<String> {
    if response.is_server_fault() {
        return Err(DbError::RemoteFault {
            status: response.status,
            body: response.body,
        });
    }
    Ok(response.body)
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(DbError::Deserialization)
}
