//! In-memory stand-in for the hosted record store.
//!
//! Routes mirror the hosted API under `/{project}`. Lists keep insertion
//! order; record ids are UUIDv4 strings assigned on create.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

/// A record as stored: a JSON object that always contains a string `id`.
pub type Record = Map<String, Value>;

/// Record lists of one project.
pub type Project = BTreeMap<String, Vec<Record>>;

/// Shared server state.
///
/// Requests for a project listed as faulty are answered with 500 and a JSON
/// diagnostic, without touching the data.
#[derive(Clone, Default)]
pub struct MockStore {
    projects: Arc<RwLock<HashMap<String, Project>>>,
    faulty: Arc<HashSet<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request for `project` fail with a server fault.
    pub fn with_faulty_project(mut self, project: &str) -> Self {
        Arc::make_mut(&mut self.faulty).insert(project.to_string());
        self
    }

    fn check(&self, project: &str) -> Result<(), ApiError> {
        if self.faulty.contains(project) {
            return Err(ApiError::Fault);
        }
        Ok(())
    }
}

/// Error responses produced by the handlers.
#[derive(Debug)]
enum ApiError {
    RecordNotFound,
    Fault,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::RecordNotFound => (
                StatusCode::NOT_FOUND,
                json!({"error": "not_found", "message": "record not found"}),
            ),
            ApiError::Fault => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "internal", "message": "injected fault"}),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_store(MockStore::new())
}

pub fn app_with_store(store: MockStore) -> Router {
    Router::new()
        .route("/{project}", get(get_project).delete(delete_project))
        .route(
            "/{project}/{list}",
            get(get_list).post(create_record).delete(delete_list),
        )
        .route(
            "/{project}/{list}/{id}",
            get(get_record)
                .put(replace_record)
                .patch(update_record)
                .delete(delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_store(listener, MockStore::new()).await
}

pub async fn run_with_store(listener: TcpListener, store: MockStore) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock record store listening");
    }
    axum::serve(listener, app_with_store(store)).await
}

async fn get_project(
    State(store): State<MockStore>,
    Path(project): Path<String>,
) -> Result<Json<Project>, ApiError> {
    store.check(&project)?;
    let projects = store.projects.read().await;
    Ok(Json(projects.get(&project).cloned().unwrap_or_default()))
}

async fn delete_project(
    State(store): State<MockStore>,
    Path(project): Path<String>,
) -> Result<StatusCode, ApiError> {
    store.check(&project)?;
    store.projects.write().await.remove(&project);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_list(
    State(store): State<MockStore>,
    Path((project, list)): Path<(String, String)>,
) -> Result<Json<Vec<Record>>, ApiError> {
    store.check(&project)?;
    let projects = store.projects.read().await;
    let records = projects
        .get(&project)
        .and_then(|lists| lists.get(&list))
        .cloned()
        .unwrap_or_default();
    Ok(Json(records))
}

async fn create_record(
    State(store): State<MockStore>,
    Path((project, list)): Path<(String, String)>,
    Json(mut data): Json<Record>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    store.check(&project)?;
    data.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    let mut projects = store.projects.write().await;
    projects
        .entry(project)
        .or_default()
        .entry(list)
        .or_default()
        .push(data.clone());
    Ok((StatusCode::CREATED, Json(data)))
}

async fn delete_list(
    State(store): State<MockStore>,
    Path((project, list)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    store.check(&project)?;
    if let Some(lists) = store.projects.write().await.get_mut(&project) {
        lists.remove(&list);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_record(
    State(store): State<MockStore>,
    Path((project, list, id)): Path<(String, String, String)>,
) -> Result<Json<Record>, ApiError> {
    store.check(&project)?;
    let projects = store.projects.read().await;
    projects
        .get(&project)
        .and_then(|lists| lists.get(&list))
        .and_then(|records| records.iter().find(|r| has_id(r, &id)))
        .cloned()
        .map(Json)
        .ok_or(ApiError::RecordNotFound)
}

async fn replace_record(
    State(store): State<MockStore>,
    Path((project, list, id)): Path<(String, String, String)>,
    Json(mut data): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    store.check(&project)?;
    data.insert("id".to_string(), Value::String(id.clone()));
    let mut projects = store.projects.write().await;
    let records = projects.entry(project).or_default().entry(list).or_default();
    match records.iter().position(|r| has_id(r, &id)) {
        Some(index) => records[index] = data.clone(),
        None => records.push(data.clone()),
    }
    Ok(Json(data))
}

async fn update_record(
    State(store): State<MockStore>,
    Path((project, list, id)): Path<(String, String, String)>,
    Json(data): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    store.check(&project)?;
    let mut projects = store.projects.write().await;
    let records = projects.entry(project).or_default().entry(list).or_default();
    let merged = match records.iter().position(|r| has_id(r, &id)) {
        Some(index) => {
            merge(&mut records[index], data, &id);
            records[index].clone()
        }
        None => {
            let mut created = Record::new();
            merge(&mut created, data, &id);
            records.push(created.clone());
            created
        }
    };
    Ok(Json(merged))
}

async fn delete_record(
    State(store): State<MockStore>,
    Path((project, list, id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    store.check(&project)?;
    let mut projects = store.projects.write().await;
    let records = projects
        .get_mut(&project)
        .and_then(|lists| lists.get_mut(&list))
        .ok_or(ApiError::RecordNotFound)?;
    let before = records.len();
    records.retain(|r| !has_id(r, &id));
    if records.len() == before {
        return Err(ApiError::RecordNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

fn has_id(record: &Record, id: &str) -> bool {
    record.get("id").and_then(Value::as_str) == Some(id)
}

/// Shallow merge of `patch` into `target`; `id` always stays `id`.
fn merge(target: &mut Record, patch: Record, id: &str) {
    for (key, value) in patch {
        target.insert(key, value);
    }
    target.insert("id".to_string(), Value::String(id.to_string()));
}
