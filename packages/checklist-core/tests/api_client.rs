use std::sync::{Arc, Mutex};
use std::time::Duration;

use checklist_core::{
    ApiClient, ApiEndpointConfig, ApiError, CheckStatus, MemoryTokenStore, Photo, Session,
    StatsPeriod, TokenStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(access: &str, refresh: Option<&str>) -> Session {
    Session {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        user: None,
    }
}

fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> ApiClient {
    let config = ApiEndpointConfig::new(format!("{}/api/v1", server.uri()));
    ApiClient::new(config, store).unwrap()
}

fn zones_body() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Lobby", "description": "Main entrance"},
        {"id": 2, "name": "Kitchen", "description": "Staff kitchen", "checklist_points": ["Sink empty"]}
    ])
}

fn check_body(id: i64, status: i64) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 4,
        "zone_id": 42,
        "status": status,
        "submitted_at": "2024-05-01T10:00:00Z",
        "created_at": "2024-05-01T10:00:01Z"
    })
}

#[tokio::test]
async fn test_list_zones_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zones_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", Some("refresh-1"))));
    let zones = client_for(&server, store).list_zones().await.unwrap();

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1].checklist_points.as_ref().unwrap()[0], "Sink empty");
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zones_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let zones = client_for(&server, store.clone()).list_zones().await.unwrap();

    assert_eq!(zones.len(), 2);
    let saved = store.load().unwrap();
    assert_eq!(saved.access_token, "fresh");
    // Refresh token kept when the server does not rotate it
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_refresh_rotates_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "fresh", "refresh_token": "refresh-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([check_body(1, 0)])))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let checks = client_for(&server, store.clone()).list_checks().await.unwrap();

    assert_eq!(checks[0].status, CheckStatus::Created);
    assert_eq!(store.load().unwrap().refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let err = client_for(&server, store.clone()).list_zones().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_rejected_refresh_token_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analysis/9"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("revoked"))));
    let err = client_for(&server, store.clone()).get_analysis(9).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_retry_unauthorized_does_not_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let err = client_for(&server, store.clone()).list_zones().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_retry_server_error_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let err = client_for(&server, store.clone()).list_zones().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_retry_decode_failure_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checks": "nope"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let err = client_for(&server, store.clone()).list_checks().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_refresh_timeout_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "fresh"}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let config = ApiEndpointConfig::new(format!("{}/api/v1", server.uri()))
        .with_timeout(Duration::from_millis(300));
    let client = ApiClient::new(config, store.clone()).unwrap();

    let err = client.list_zones().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", None)));
    let err = client_for(&server, store.clone()).list_zones().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_no_session_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zones_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server, Arc::new(MemoryTokenStore::new()))
        .list_zones()
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn test_other_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"errors": ["Zone is archived", "Try later"]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", Some("refresh-1"))));
    let err = client_for(&server, store.clone()).list_checks().await.unwrap_err();

    assert_eq!(err, ApiError::Server("Zone is archived, Try later".to_string()));
    assert_eq!(store.load().unwrap().access_token, "access-1");
}

#[tokio::test]
async fn test_concurrent_unauthorized_callers_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zones_body()))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("stale", Some("refresh-1"))));
    let client = client_for(&server, store);
    let other = client.clone();

    let (a, b) = tokio::join!(client.list_zones(), other.list_zones());
    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_check_requires_photo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let client = client_for(&server, store);

    let err = client.create_check(42, Some("101"), None).await.unwrap_err();
    assert_eq!(err, ApiError::MissingPhoto);

    let err = client
        .create_check(42, None, Some(Photo::jpeg(Vec::new())))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::MissingPhoto);
}

#[tokio::test]
async fn test_create_check_uploads_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checks"))
        .and(header("Authorization", "Bearer access-1"))
        .and(header_regex("Content-Type", "^multipart/form-data; boundary=.+$"))
        .and(body_string_contains("name=\"zone_id\"\r\n\r\n42\r\n"))
        .and(body_string_contains("name=\"room_number\"\r\n\r\n101\r\n"))
        .and(body_string_contains(
            "name=\"photo\"; filename=\"check_photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nfake-jpeg\r\n",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "check": check_body(77, 1),
            "message": "Check created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let check = client_for(&server, store)
        .create_check(42, Some("101"), Some(Photo::jpeg(b"fake-jpeg".to_vec())))
        .await
        .unwrap();

    assert_eq!(check.id, 77);
    assert_eq!(check.zone_id, 42);
    assert_eq!(check.status, CheckStatus::InProgress);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.trim_end().ends_with("--"));
}

#[tokio::test]
async fn test_create_check_unsuccessful_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": false,
            "check": check_body(78, 0),
            "message": "Photo is unreadable"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let err = client_for(&server, store)
        .create_check(42, None, Some(Photo::jpeg(vec![1, 2, 3])))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Server("Photo is unreadable".to_string()));
}

#[tokio::test]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"email": "admin@example.com", "password": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "access-1",
            "refresh_token": "refresh-1",
            "user": {
                "id": 1, "email": "admin@example.com", "first_name": "Anna",
                "last_name": "Petrova", "phone": null, "admin": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, store.clone());
    let result = client.login("admin@example.com", "password").await.unwrap();

    assert!(result.user.is_admin);
    assert_eq!(result.session.access_token, "access-1");
    assert!(client.is_logged_in());
    assert_eq!(client.current_user().unwrap().email, "admin@example.com");
    assert_eq!(store.load().unwrap().refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_login_rejection_does_not_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("old", Some("refresh-1"))));
    let err = client_for(&server, store.clone())
        .login("admin@example.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    // A failed login leaves whatever session existed untouched
    assert_eq!(store.load().unwrap().access_token, "old");
}

#[tokio::test]
async fn test_logout_without_session_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    assert!(!client.logout().await.unwrap());
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", Some("refresh-1"))));
    let client = client_for(&server, store.clone());

    assert!(!client.logout().await.unwrap());
    assert!(store.load().is_none());
}

/// Holds a session but refuses to delete it, like an unreachable keyring.
#[derive(Default)]
struct StuckStore {
    session: Mutex<Option<Session>>,
}

impl TokenStore for StuckStore {
    fn save(&self, session: &Session) -> Result<(), ApiError> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    fn clear(&self) -> Result<(), ApiError> {
        Err(ApiError::Storage("keyring unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_logout_succeeds_when_store_cannot_clear() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(StuckStore::default());
    store.save(&session("access-1", None)).unwrap();
    let client = ApiClient::new(
        ApiEndpointConfig::new(format!("{}/api/v1", server.uri())),
        store,
    )
    .unwrap();

    assert!(client.logout().await.unwrap());
}

#[tokio::test]
async fn test_logout_reports_server_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Logged out"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let client = client_for(&server, store.clone());

    assert!(client.logout().await.unwrap());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_personal_dashboard_without_admin_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/personal_stats"))
        .and(query_param("user_id", "4"))
        .and(query_param("period", "month"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stats": {
                "overview": {"total_checks": 3, "approved": 2, "rejected": 1, "pending": 0, "approval_rate": 66.7},
                "quality": {"average_score": 80.0, "checks_with_photo": 3, "photos_per_check": 1.0},
                "recent_checks": [],
                "timestamp": "2024-05-01T12:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let stats = client_for(&server, store)
        .fetch_dashboard_stats(StatsPeriod::Month, Some(4), false)
        .await
        .unwrap();

    assert!(stats.stats.users.is_none());
    assert!(stats.stats.leaderboard.is_empty());
}

#[tokio::test]
async fn test_admin_dashboard_exposes_leaderboard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/stats"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stats": {
                "overview": {"total_checks": 9, "approved": 7, "rejected": 1, "pending": 1, "approval_rate": 77.8},
                "quality": {"average_score": 84.0, "checks_with_photo": 9, "total_photos": 9, "photos_per_check": 1.0},
                "users": {"total_users": 3, "active_users": 2, "checks_per_user": 3.0},
                "leaderboard": [
                    {"id": 4, "full_name": "Olga Smirnova", "total_checks": 5, "rejected_count": 0, "quality_score": 96.0}
                ],
                "recent_checks": [],
                "timestamp": "2024-05-01T12:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let stats = client_for(&server, store)
        .fetch_dashboard_stats(StatsPeriod::Week, None, true)
        .await
        .unwrap();

    assert_eq!(stats.stats.users.unwrap().active_users, 2);
    assert_eq!(stats.stats.leaderboard[0].full_name, "Olga Smirnova");
}

#[tokio::test]
async fn test_find_check_filters_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([check_body(1, 0), check_body(2, 9)])),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let client = client_for(&server, store);

    let found = client.find_check(2).await.unwrap().unwrap();
    assert_eq!(found.status, CheckStatus::Unknown(9));
    assert!(client.find_check(3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_body_is_decoding_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"zones": []})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let err = client_for(&server, store).list_zones().await.unwrap_err();
    assert!(matches!(err, ApiError::Decoding(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 1
    let config = ApiEndpointConfig::new("http://127.0.0.1:1/api/v1");
    let store = Arc::new(MemoryTokenStore::with_session(session("access-1", None)));
    let client = ApiClient::new(config, store.clone()).unwrap();

    let err = client.list_zones().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(store.load().is_some());
}
