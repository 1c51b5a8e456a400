//! HTTP handlers for search and the write path.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error};

use super::AppState;
use crate::error::{SearchError, StoreError};
use crate::models::{Entity, GeoPoint, Listing, NewEntity, NewListing, RecordKind};
use crate::search::{search, SearchHit, SearchParams};
use crate::store::RecordSource;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error response carrying `{"error": message}`
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        ApiError(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match &e {
            StoreError::InvalidLocation(_)
            | StoreError::Validation(_)
            | StoreError::IdOutOfRange { .. } => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        };
        ApiError(status, e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(rejection.status(), rejection.body_text())
    }
}

/// `Query` whose rejections render as `{"error": ...}`
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// JSON body whose rejections render as `{"error": ...}`
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Raw query string; parsed by hand so bad values get our error payload
#[derive(Debug, Deserialize)]
pub struct SearchQueryParams {
    /// Search text
    q: Option<String>,
    /// Center latitude
    lat: Option<String>,
    /// Center longitude
    lon: Option<String>,
    /// Radius in km
    radius: Option<String>,
}

/// One search result
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: Option<GeoPoint>,
    /// Kilometres from the center; only present for radius searches
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance: Option<f64>,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.record.id,
            name: hit.record.name,
            description: hit.record.description,
            location: hit.record.location,
            distance: hit.distance_km,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    entities: usize,
    listings: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (entities, listings) = state.store.stats();
    Json(HealthResponse {
        status: "ok",
        entities,
        listings,
    })
}

fn run_search(
    state: &AppState,
    kind: RecordKind,
    params: SearchQueryParams,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let search_params = SearchParams::from_params(
        params.q.as_deref(),
        params.lat.as_deref(),
        params.lon.as_deref(),
        params.radius.as_deref(),
        state.default_radius_km,
    )?;

    let center = search_params
        .center
        .as_ref()
        .map(|c| (c, search_params.radius_km));

    let records = state.store.fetch_candidates(kind, center).map_err(|e| {
        error!("Fetching {} records failed: {:#}", kind, e);
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let hits = search(records, &search_params)?;
    debug!("{} search returned {} results", kind, hits.len());

    Ok(Json(hits.into_iter().map(SearchResult::from).collect()))
}

/// Proximity search over entities
pub async fn search_entities(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQueryParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    run_search(&state, RecordKind::Entity, params)
}

/// Proximity search over listings
pub async fn search_listings(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQueryParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    run_search(&state, RecordKind::Listing, params)
}

pub async fn create_entity(
    State(state): State<Arc<AppState>>,
    ApiJson(new): ApiJson<NewEntity>,
) -> Result<(StatusCode, Json<Entity>), ApiError> {
    let entity = state.store.create_entity(new)?;
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    ApiJson(new): ApiJson<NewListing>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    let listing = state.store.create_listing(new)?;
    Ok((StatusCode::CREATED, Json(listing)))
}
