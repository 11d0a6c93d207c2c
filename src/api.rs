//! HTTP surface for the address book.
//!
//! The router exposes the collection and item resources plus a metrics endpoint:
//!
//! - `GET /contacts` – List every person in insertion order. Safe and idempotent.
//! - `POST /contacts` – Create a person from `{ "name": ... }`. Every call allocates a fresh id,
//!   so repeated identical requests create distinct persons. Answers `201` with `Location`.
//! - `GET /contacts/person/{id}` – Fetch one person, `404` when absent.
//! - `PUT /contacts/person/{id}` – Rename an existing person. Idempotent; an absent target is a
//!   client error (`400`) and is never created.
//! - `DELETE /contacts/person/{id}` – Remove a person (`204`). Later deletes of the same id answer
//!   `404` and leave the book untouched, so the final state converges after the first call.
//! - `GET /metrics` – Mutation counters and the current person count.
//!
//! Bodies are JSON. Requests whose `Accept` header rules JSON out are refused with `406`.

use crate::contacts::{
    AddressBookResource, AddressBookStore, ContactsError, PersonDraft, PersonId, PersonResource,
};
use crate::metrics::{ContactsMetrics, MetricsSnapshot};
use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state handed to every handler.
struct AppState<S> {
    store: Arc<S>,
    metrics: Arc<ContactsMetrics>,
    base_url: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
            base_url: Arc::clone(&self.base_url),
        }
    }
}

/// Build the HTTP router exposing the contacts resources.
///
/// `base_url` is the public origin (e.g. `http://localhost:8282`) used to render `href` and
/// `Location` values.
pub fn create_router<S>(store: Arc<S>, base_url: &str) -> Router
where
    S: AddressBookStore + 'static,
{
    let state = AppState {
        store,
        metrics: Arc::new(ContactsMetrics::new()),
        base_url: Arc::from(base_url.trim_end_matches('/')),
    };
    Router::new()
        .route(
            "/contacts",
            get(list_persons::<S>).post(create_person::<S>),
        )
        .route(
            "/contacts/person/:id",
            get(get_person::<S>)
                .put(update_person::<S>)
                .delete(delete_person::<S>),
        )
        .route("/metrics", get(get_metrics::<S>))
        .layer(middleware::from_fn(require_json_acceptable))
        .with_state(state)
}

/// List the whole book.
async fn list_persons<S>(State(state): State<AppState<S>>) -> Json<AddressBookResource>
where
    S: AddressBookStore,
{
    let persons = state.store.list().await;
    tracing::debug!(count = persons.len(), "Listed persons");
    Json(AddressBookResource::from_persons(&persons, &state.base_url))
}

/// Create a person. Client-supplied `id`/`href` are ignored.
async fn create_person<S>(
    State(state): State<AppState<S>>,
    Json(draft): Json<PersonDraft>,
) -> Result<Response, AppError>
where
    S: AddressBookStore,
{
    let person = state.store.allocate_and_insert(draft.name).await?;
    state.metrics.record_created();
    let resource = PersonResource::from_person(&person, &state.base_url);
    tracing::info!(id = %person.id, href = %resource.href, "Created person");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, resource.href.clone())],
        Json(resource),
    )
        .into_response())
}

/// Fetch a single person.
async fn get_person<S>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<PersonResource>, AppError>
where
    S: AddressBookStore,
{
    let id = raw_id
        .parse::<PersonId>()
        .map_err(|err| AppError::new(StatusCode::NOT_FOUND, err.to_string()))?;
    let person = state.store.find(id).await?;
    tracing::debug!(%id, "Fetched person");
    Ok(Json(PersonResource::from_person(&person, &state.base_url)))
}

/// Rename an existing person; the id comes from the path, never from the body.
async fn update_person<S>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
    Json(draft): Json<PersonDraft>,
) -> Result<Json<PersonResource>, AppError>
where
    S: AddressBookStore,
{
    let id = raw_id
        .parse::<PersonId>()
        .map_err(|err| AppError::new(StatusCode::BAD_REQUEST, err.to_string()))?;
    let person = state
        .store
        .replace(id, draft.name)
        .await
        .map_err(|err| match err {
            ContactsError::NotFound(id) => ContactsError::InvalidTarget(id),
            other => other,
        })?;
    state.metrics.record_updated();
    tracing::info!(%id, name = %person.name, "Updated person");
    Ok(Json(PersonResource::from_person(&person, &state.base_url)))
}

/// Remove a person.
async fn delete_person<S>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: AddressBookStore,
{
    let id = raw_id
        .parse::<PersonId>()
        .map_err(|err| AppError::new(StatusCode::NOT_FOUND, err.to_string()))?;
    state.store.remove(id).await?;
    state.metrics.record_deleted();
    tracing::info!(%id, "Deleted person");
    Ok(StatusCode::NO_CONTENT)
}

/// Return mutation counters and the current person count.
async fn get_metrics<S>(State(state): State<AppState<S>>) -> Json<MetricsSnapshot>
where
    S: AddressBookStore,
{
    let stored = state.store.len().await;
    Json(state.metrics.snapshot(stored))
}

/// Refuse requests that cannot accept a JSON response before any handler runs.
async fn require_json_acceptable(request: Request, next: Next) -> Response {
    if accepts_json(request.headers()) {
        return next.run(request).await;
    }
    tracing::debug!(uri = %request.uri(), "Rejected request without acceptable media type");
    AppError::new(
        StatusCode::NOT_ACCEPTABLE,
        "only application/json representations are available",
    )
    .into_response()
}

/// Whether the `Accept` header (if any) admits `application/json`.
///
/// A matching range with `q=0` counts as a refusal; other weights only rank and are ignored.
fn accepts_json(headers: &HeaderMap) -> bool {
    let values: Vec<_> = headers.get_all(header::ACCEPT).iter().collect();
    if values.is_empty() {
        return true;
    }
    values
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|range| {
            let mut parts = range.split(';');
            let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
            let matches = matches!(
                media.as_str(),
                "application/json" | "application/*" | "*/*"
            );
            matches && !parts.any(is_zero_quality)
        })
}

/// `q=0`, `q=0.0`, `q=0.000` and so on.
fn is_zero_quality(param: &str) -> bool {
    match param.trim().split_once('=') {
        Some((key, value)) if key.trim().eq_ignore_ascii_case("q") => value
            .trim()
            .parse::<f32>()
            .is_ok_and(|quality| quality <= 0.0),
        _ => false,
    }
}

/// Error rendered as `{ "error": message }` with the carried status.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ContactsError> for AppError {
    fn from(inner: ContactsError) -> Self {
        let status = match inner {
            ContactsError::NotFound(_) => StatusCode::NOT_FOUND,
            ContactsError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ContactsError::DuplicateId(_) => StatusCode::CONFLICT,
            ContactsError::IdSpaceExhausted => StatusCode::INSUFFICIENT_STORAGE,
        };
        tracing::debug!(%status, error = %inner, "Request rejected");
        Self::new(status, inner.to_string())
    }
}
