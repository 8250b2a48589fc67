use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use mandir_core::TempleConfig;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(pool: PgPool, geocoder_url: &str) -> Router {
    let geocoder = Geocoder::new(NominatimClient::with_base_url(geocoder_url).expect("geocoder"));
    build_app(
        AppState {
            pool,
            geocoder: Arc::new(geocoder),
        },
        RateLimitState::new(100, Duration::from_secs(60)),
    )
}

fn temple_config(id: i64, city: &str, address: &str, coords: Option<(f64, f64)>) -> TempleConfig {
    TempleConfig {
        id,
        city: city.to_string(),
        address: address.to_string(),
        region: None,
        phone: None,
        fax: None,
        email: None,
        operating_hours: Some("9:00 AM - 7:30 PM".to_string()),
        operating_days: None,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    }
}

async fn seed(pool: &PgPool) {
    mandir_db::seed_temples(
        pool,
        &[
            temple_config(
                1,
                "Robbinsville",
                "112 N Main St, Robbinsville, NJ 08691",
                Some((40.2204, -74.5876)),
            ),
            temple_config(
                2,
                "Manhattan",
                "1 W 34th St, New York, NY 10001",
                Some((40.7506, -73.9972)),
            ),
            temple_config(
                3,
                "Lilburn",
                "460 Rockbridge Rd NW, Lilburn, GA 30047",
                Some((33.8704, -84.1326)),
            ),
            temple_config(4, "Houston", "1150 Brand Ln, Stafford, TX 77477", None),
        ],
    )
    .await
    .expect("seed temples");
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn search_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/temples/search")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

// -------------------------------------------------------------------------
// Error envelope (no DB)
// -------------------------------------------------------------------------

#[test]
fn search_faults_map_to_statuses() {
    let cases = [
        (SearchError::InvalidInput("zipcode".into()), StatusCode::BAD_REQUEST),
        (SearchError::LocationPermissionDenied, StatusCode::FORBIDDEN),
        (
            SearchError::LocationUnavailable,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (SearchError::GeocodingFailure, StatusCode::NOT_FOUND),
        (
            SearchError::NetworkError("timeout".into()),
            StatusCode::BAD_GATEWAY,
        ),
    ];
    for (error, status) in cases {
        let response = ApiError::from_search("req-1", &error).into_response();
        assert_eq!(response.status(), status, "{error:?}");
    }
}

#[test]
fn unknown_code_is_internal_error() {
    let response = ApiError::new("req-1", "internal_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// -------------------------------------------------------------------------
// Routes (with DB)
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn health_returns_ok(pool: PgPool) {
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "health-1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "health-1");
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "health-1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_temples_returns_all_active(pool: PgPool) {
    seed(&pool).await;
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/temples")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["region"], "NJ");
    assert!(data[3]["latitude"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_temple_returns_404_for_unknown_id(pool: PgPool) {
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/temples/999")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_temple_returns_detail(pool: PgPool) {
    seed(&pool).await;
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/temples/3")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["city"], "Lilburn");
    assert_eq!(json["data"]["region"], "GA");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_by_zip_ranks_nearest_first(pool: PgPool) {
    seed(&pool).await;
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("postalcode", "10001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "40.7506", "lon": "-73.9972" }
        ])))
        .expect(1)
        .mount(&geocoder)
        .await;

    let app = app_for(pool, &geocoder.uri());
    let response = app
        .oneshot(search_request(&serde_json::json!({ "zipcode": "10001" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let temples = json["data"]["temples"].as_array().expect("temples array");
    assert_eq!(temples.len(), 3, "temple without coordinates is excluded");
    assert_eq!(temples[0]["id"], 2);
    assert!(temples[0]["distance"].as_f64().expect("distance") < 0.01);
    assert_eq!(json["data"]["sort"], "distance");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_with_unknown_zip_is_404(pool: PgPool) {
    seed(&pool).await;
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&geocoder)
        .await;

    let app = app_for(pool, &geocoder.uri());
    let response = app
        .oneshot(search_request(&serde_json::json!({ "zipcode": "00000" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "geocoding_failure");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_with_bad_zip_is_400(pool: PgPool) {
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(&serde_json::json!({ "zipcode": "abc12" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_input");
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .contains("zip code"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_by_coordinates_sorted_by_name(pool: PgPool) {
    seed(&pool).await;
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(&serde_json::json!({
            "latitude": 40.0,
            "longitude": -74.0,
            "sort": "name"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let cities: Vec<&str> = json["data"]["temples"]
        .as_array()
        .expect("temples array")
        .iter()
        .map(|t| t["city"].as_str().expect("city"))
        .collect();
    assert_eq!(cities, vec!["Lilburn", "Manhattan", "Robbinsville"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_with_denied_location_is_403(pool: PgPool) {
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(
            &serde_json::json!({ "location_error": "permission_denied" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_with_malformed_body_is_400(pool: PgPool) {
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/temples/search")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_input");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_accepts_mixed_case_sort(pool: PgPool) {
    seed(&pool).await;
    let app = app_for(pool, "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(&serde_json::json!({
            "latitude": 40.0,
            "longitude": -74.0,
            "sort": "Name"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sort"], "name");
    assert_eq!(json["data"]["temples"][0]["city"], "Lilburn");
}

// -------------------------------------------------------------------------
// Validation before any database work
// -------------------------------------------------------------------------

fn unreachable_pool() -> PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool")
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected_without_database() {
    let app = app_for(unreachable_pool(), "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(
            &serde_json::json!({ "latitude": 1000.0, "longitude": 0.0 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_input");
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .contains("Latitude"));
}

#[tokio::test]
async fn unknown_sort_names_the_sort_field() {
    let app = app_for(unreachable_pool(), "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(
            &serde_json::json!({ "zipcode": "10001", "sort": "nearest" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_input");
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .starts_with("Sort must be"));
}

#[tokio::test]
async fn database_outage_after_valid_input_is_500() {
    let app = app_for(unreachable_pool(), "http://127.0.0.1:9");
    let response = app
        .oneshot(search_request(&serde_json::json!({ "zipcode": "10001" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "internal_error");
}
