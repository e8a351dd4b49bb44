use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use super::AppState;
use crate::api::ApiError;
use crate::models::{Location, LocationPayload, RecordDraft, Villager, VisitRecord};
use crate::records::{group_by_year, YearBucket};
use crate::search::{search_locations, MatchTier};
use crate::store::{Marker, VillagerIdCache};
use crate::tags::TagFilter;

type HandlerError = (StatusCode, String);

/// Map an archive API failure to a response
fn api_error(e: ApiError) -> HandlerError {
    let status = match &e {
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        ApiError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    if status == StatusCode::BAD_GATEWAY {
        error!("Archive API call failed: {}", e);
    } else {
        warn!("Rejected archive API call: {}", e);
    }
    (status, e.to_string())
}

fn internal(e: serde_json::Error) -> HandlerError {
    error!("Failed to encode response: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn location_not_found(id: i64) -> HandlerError {
    (StatusCode::NOT_FOUND, format!("location {} not found", id))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    locations: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        locations: state.store.read().await.len(),
    })
}

#[derive(Serialize)]
pub struct FilterView {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
}

impl From<TagFilter> for FilterView {
    fn from(filter: TagFilter) -> Self {
        Self {
            id: filter.id(),
            label: filter.label(),
            icon: filter.icon(),
        }
    }
}

/// Filter categories with at least one location
pub async fn filters(State(state): State<Arc<AppState>>) -> Json<Vec<FilterView>> {
    let store = state.store.read().await;
    Json(
        store
            .available_filters()
            .iter()
            .copied()
            .map(FilterView::from)
            .collect(),
    )
}

#[derive(Deserialize)]
pub struct LocationsQuery {
    /// Filter id, `all` when absent
    filter: Option<String>,
}

/// Markers for the locations passing the filter
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationsQuery>,
) -> Result<Json<Value>, HandlerError> {
    let filter = match params.filter.as_deref() {
        Some(id) => id
            .parse::<TagFilter>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => TagFilter::All,
    };

    let store = state.store.read().await;
    let markers = store.markers(filter);
    let body = serde_json::to_value(LocationsResponse {
        filter: filter.id(),
        total: markers.len(),
        locations: markers,
    })
    .map_err(internal)?;
    Ok(Json(body))
}

#[derive(Serialize)]
struct LocationsResponse<'a> {
    filter: &'static str,
    total: usize,
    locations: Vec<Marker<'a>>,
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, HandlerError> {
    let store = state.store.read().await;
    let location = store.get(id).ok_or_else(|| location_not_found(id))?;
    let body = serde_json::to_value(Marker::new(location)).map_err(internal)?;
    Ok(Json(body))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
pub struct SuggestionView {
    id: i64,
    name: String,
    tier: MatchTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

/// Autocomplete suggestions for the search box
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<SuggestionView>> {
    let store = state.store.read().await;
    let suggestions = search_locations(store.all(), &params.text)
        .into_iter()
        .map(|hit| SuggestionView {
            id: hit.location.id,
            name: hit.location.name.clone(),
            tier: hit.tier,
            score: hit.score,
        })
        .collect();
    Json(suggestions)
}

#[derive(Serialize)]
pub struct RecordGroupView {
    year: YearBucket,
    records: Vec<VisitRecord>,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    location_id: i64,
    total: usize,
    groups: Vec<RecordGroupView>,
}

/// Records of a location grouped by year
pub async fn location_records(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<RecordsResponse>, HandlerError> {
    if state.store.read().await.get(id).is_none() {
        return Err(location_not_found(id));
    }

    let records = state.client.fetch_records(id).await.map_err(api_error)?;
    state.villagers.lock().await.remember(&records);

    let groups = group_by_year(&records)
        .into_iter()
        .map(|group| RecordGroupView {
            year: group.year,
            records: group.records.into_iter().cloned().collect(),
        })
        .collect();

    Ok(Json(RecordsResponse {
        location_id: id,
        total: records.len(),
        groups,
    }))
}

pub async fn villager(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Villager>, HandlerError> {
    let villager = state
        .client
        .fetch_villager_details(id)
        .await
        .map_err(api_error)?;
    Ok(Json(villager))
}

#[derive(Deserialize)]
pub struct LookupQuery {
    name: String,
}

#[derive(Serialize)]
pub struct LookupResponse {
    name: String,
    id: Option<i64>,
}

/// Resolve a participant name to a villager id.
///
/// The shared cache is only locked for the hit check and the final merge;
/// the record scan runs against a private cache.
pub async fn villager_lookup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, HandlerError> {
    let cached = state.villagers.lock().await.get(params.name.trim());
    if let Some(id) = cached {
        return Ok(Json(LookupResponse {
            name: params.name,
            id: Some(id),
        }));
    }

    let mut seen = VillagerIdCache::new();
    let id = state
        .client
        .scan_villager_id(&params.name, &mut seen)
        .await
        .map_err(api_error)?;
    state.villagers.lock().await.merge(seen);

    Ok(Json(LookupResponse {
        name: params.name,
        id,
    }))
}

#[derive(Serialize)]
pub struct ReloadResponse {
    locations: usize,
}

pub async fn reload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, HandlerError> {
    let locations = state.reload().await.map_err(api_error)?;
    Ok(Json(ReloadResponse { locations }))
}

pub async fn create_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LocationPayload>,
) -> Result<(StatusCode, Json<Location>), HandlerError> {
    let location = state.client.add_location(&payload).await.map_err(api_error)?;
    state.store.write().await.insert(location.clone());
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<LocationPayload>,
) -> Result<Json<Location>, HandlerError> {
    let location = state
        .client
        .update_location(id, &payload)
        .await
        .map_err(api_error)?;

    let mut store = state.store.write().await;
    if !store.replace(location.clone()) {
        warn!("Updated location {} was not cached, inserting", location.id);
        store.insert(location.clone());
    }
    Ok(Json(location))
}

pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    state.client.delete_location(id).await.map_err(api_error)?;
    state.store.write().await.remove(id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<RecordDraft>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let payload = draft
        .create_payload()
        .map_err(|e| api_error(e.into()))?;
    let created = state
        .client
        .create_record(&payload)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit form state before and after editing
#[derive(Deserialize)]
pub struct RecordEdit {
    original: RecordDraft,
    draft: RecordDraft,
}

pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(edit): Json<RecordEdit>,
) -> Result<Json<Value>, HandlerError> {
    let changes = edit
        .draft
        .changes_since(&edit.original)
        .map_err(|e| api_error(e.into()))?;
    let updated = state
        .client
        .update_record(id, &changes)
        .await
        .map_err(api_error)?;
    Ok(Json(updated))
}

pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    state.client.delete_record(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
