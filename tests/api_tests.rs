use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use padosi::models::{GeoPoint, NewEntity};
use padosi::server::{router, AppState, SearchResult};
use padosi::store::MemoryStore;

fn entity(id: u64, name: &str, deals_in: &[&str], lat: f64, lon: f64) -> NewEntity {
    NewEntity {
        id: Some(id),
        name: name.to_string(),
        description: format!("{} description", name),
        location: Some(GeoPoint::new(lat, lon).unwrap()),
        deals_in: deals_in.iter().map(|s| s.to_string()).collect(),
        is_active: true,
        ..Default::default()
    }
}

fn spawn_app() -> Router {
    let store = MemoryStore::new();
    // Roughly 0, 50 and 200 km north of the origin
    store.create_entity(entity(1, "Origin Grocers", &["groceries"], 0.0, 0.0)).unwrap();
    store.create_entity(entity(2, "Bean There", &["coffee shop"], 50.0 / 110.574, 0.0)).unwrap();
    store.create_entity(entity(3, "Far Hardware", &["tools"], 200.0 / 110.574, 0.0)).unwrap();
    store
        .create_entity(NewEntity {
            is_active: false,
            ..entity(4, "Closed Cafe", &["coffee shop"], 0.0, 0.0)
        })
        .unwrap();
    store
        .create_entity(NewEntity {
            location: None,
            ..entity(5, "Online Coffee", &[], 0.0, 0.0)
        })
        .unwrap();

    router(Arc::new(AppState::new(store, 10.0)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn ids(body: &Value) -> Vec<u64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entities"], 5);
}

#[tokio::test]
async fn test_radius_search_ranks_by_distance() {
    let app = spawn_app();
    let (status, body) = get(&app, "/v1/entities/search?lat=0&lon=0&radius=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2]);

    let results: Vec<SearchResult> = serde_json::from_value(body).unwrap();
    assert_eq!(results[0].distance, Some(0.0));
    assert!((results[1].distance.unwrap() - 50.0).abs() < 0.5);
    assert_eq!(results[0].location, Some(GeoPoint::new(0.0, 0.0).unwrap()));
}

#[tokio::test]
async fn test_default_radius_applies() {
    let app = spawn_app();
    let (status, body) = get(&app, "/v1/entities/search?lat=0&lon=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_text_search_matches_tags_without_distance() {
    let app = spawn_app();
    let (status, body) = get(&app, "/v1/entities/search?q=shop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
    assert!(body[0].get("distance").is_none());
    assert!(body[0].get("tags").is_none());
}

#[tokio::test]
async fn test_no_filters_returns_active_in_storage_order() {
    let app = spawn_app();
    let (_, body) = get(&app, "/v1/entities/search").await;
    assert_eq!(ids(&body), vec![1, 2, 3, 5]);
    assert!(body[3]["location"].is_null());
}

#[tokio::test]
async fn test_invalid_coordinates_rejected() {
    let app = spawn_app();
    for uri in [
        "/v1/entities/search?lat=91&lon=0",
        "/v1/entities/search?lat=0&lon=-181",
        "/v1/entities/search?lat=north&lon=0",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid coordinates"));
    }
}

#[tokio::test]
async fn test_invalid_radius_rejected() {
    let app = spawn_app();
    let (status, body) = get(&app, "/v1/entities/search?lat=1&lon=1&radius=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid radius"));

    // Without a center the radius is ignored
    let (status, _) = get(&app, "/v1/entities/search?radius=-5").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_no_match_is_empty_array() {
    let app = spawn_app();
    let (status, body) = get(&app, "/v1/entities/search?q=submarine&lat=0&lon=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_entity_rejects_bad_location() {
    let app = spawn_app();
    let (status, body) = post(
        &app,
        "/v1/entities",
        json!({"name": "Moon Base", "location": {"latitude": 100.0, "longitude": 0.0}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid location"));

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["entities"], 5);
}

#[tokio::test]
async fn test_created_records_are_searchable() {
    let app = spawn_app();
    let (status, created) = post(
        &app,
        "/v1/entities",
        json!({
            "name": "Corner Bakery",
            "location": {"latitude": 0.01, "longitude": 0.0},
            "deals_in": ["bread"],
            "created_by": 42
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["users"][0]["role"], "admin");
    let vendor = created["id"].as_u64().unwrap();

    let (status, _) = post(
        &app,
        "/v1/listings",
        json!({
            "vendor": vendor,
            "title": "Sourdough loaf",
            "price_cents": 450,
            "listing_type": "product",
            "location": {"latitude": 0.01, "longitude": 0.0},
            "expiry_date": "2999-01-01T00:00:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/v1/listings/search?q=sourdough&lat=0&lon=0&radius=5").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Sourdough loaf");

    let (status, _) = post(
        &app,
        "/v1/listings",
        json!({
            "vendor": 999,
            "title": "Ghost",
            "price_cents": 1,
            "listing_type": "product",
            "location": {"latitude": 0.0, "longitude": 0.0},
            "expiry_date": "2999-01-01T00:00:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repeated_search_is_identical() {
    let app = spawn_app();
    let uri = "/v1/entities/search?q=e&lat=0.5&lon=0&radius=300";
    let (_, first) = get(&app, uri).await;
    let (_, second) = get(&app, uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let app = spawn_app();

    let (status, body) = get(&app, "/v1/entities/search?lat=1&lat=2&lon=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = post_raw(&app, "/v1/entities", "{\"name\": ".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = post(&app, "/v1/entities", json!({"description": "no name"})).await;
    assert!(status.is_client_error());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_entity_rejects_max_id() {
    let app = spawn_app();
    let (status, body) = post(
        &app,
        "/v1/entities",
        json!({"id": u64::MAX, "name": "Edge", "location": {"latitude": 0.0, "longitude": 0.0}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["entities"], 5);
}
