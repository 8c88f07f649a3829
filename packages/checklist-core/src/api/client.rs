use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::config::{ApiEndpointConfig, load_api_config};
use super::error::ApiError;
use super::request::{ApiRequest, JPEG_CONTENT_TYPE, MultipartForm};
use super::response;
use crate::auth::{Session, TokenStore, default_token_store};
use crate::models::{
    AnalysisResult, AuthResponse, Check, CheckCreateResponse, DashboardStats, LoginResponse, Photo,
    StatsPeriod, User, Zone,
};

const PHOTO_FILENAME: &str = "check_photo.jpg";

/// Client for the inspection API.
///
/// Cloning is cheap: clones share the HTTP connection pool, the token store
/// and the refresh guard.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ApiEndpointConfig,
    pub(crate) store: Arc<dyn TokenStore>,
    pub(crate) refresh_guard: Arc<Mutex<()>>,
}

/// Outcome of a successful [`ApiClient::login`].
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub session: Session,
    pub user: User,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ApiEndpointConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            store,
            refresh_guard: Arc::new(Mutex::new(())),
        })
    }

    /// Client using the resolved endpoint config and the default token store.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(load_api_config(), default_token_store()?)
    }

    pub fn config(&self) -> &ApiEndpointConfig {
        &self.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Send one request and decode its response. No refresh handling.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, "Sending request");

        let response = request
            .build(&self.http, &self.config.base_url)?
            .send()
            .await
            .map_err(response::transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(response::transport_error)?;
        tracing::debug!(%method, %path, status = status.as_u16(), "Received response");

        response::decode(status, &body)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange credentials for a session and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, ApiError> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest { email, password })?;
        let response: LoginResponse = self.send(request).await?;

        let session = Session {
            access_token: response.token,
            refresh_token: response.refresh_token,
            user: Some(response.user.clone()),
        };
        self.store.save(&session)?;

        tracing::info!("Signed in as {}", response.user.email);
        Ok(LoginResult {
            session,
            user: response.user,
        })
    }

    /// Sign out remotely (best effort) and always clear the local session.
    ///
    /// Returns the server's `success` flag; `false` when there was no
    /// session or the remote call failed.
    pub async fn logout(&self) -> Result<bool, ApiError> {
        let Some(session) = self.store.load() else {
            tracing::debug!("No stored session, nothing to sign out remotely");
            self.discard_session();
            return Ok(false);
        };

        let remote = self
            .send::<AuthResponse>(ApiRequest::post("/auth/logout").bearer(&session.access_token))
            .await;
        self.discard_session();

        match remote {
            Ok(resp) => {
                tracing::info!("Signed out");
                Ok(resp.success)
            }
            Err(e) => {
                tracing::warn!("Remote sign-out failed ({}), local session cleared", e);
                Ok(false)
            }
        }
    }

    /// Forget the local session. Storage failures are logged, not returned.
    pub(crate) fn discard_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.load().is_some()
    }

    /// User snapshot cached at login.
    pub fn current_user(&self) -> Option<User> {
        self.store.load().and_then(|s| s.user)
    }

    // ========================================================================
    // Zones and checks
    // ========================================================================

    pub async fn list_zones(&self) -> Result<Vec<Zone>, ApiError> {
        self.authorized(|token| self.send(ApiRequest::get("/zones").bearer(&token)))
            .await
    }

    /// All checks visible to the current user, in server order.
    pub async fn list_checks(&self) -> Result<Vec<Check>, ApiError> {
        self.authorized(|token| self.send(ApiRequest::get("/checks").bearer(&token)))
            .await
    }

    /// Look a check up by id. There is no single-check endpoint, so this
    /// lists and filters.
    pub async fn find_check(&self, check_id: i64) -> Result<Option<Check>, ApiError> {
        let checks = self.list_checks().await?;
        Ok(checks.into_iter().find(|c| c.id == check_id))
    }

    /// Submit a photographed zone for inspection.
    ///
    /// Fails with [`ApiError::MissingPhoto`] before touching the network when
    /// the photo is absent or empty.
    pub async fn create_check(
        &self,
        zone_id: i64,
        room_number: Option<&str>,
        photo: Option<Photo>,
    ) -> Result<Check, ApiError> {
        let photo = photo
            .filter(|p| !p.is_empty())
            .ok_or(ApiError::MissingPhoto)?;

        tracing::info!(zone_id, bytes = photo.len(), "Submitting check");
        let form = check_form(zone_id, room_number, photo, Utc::now());

        let created: CheckCreateResponse = self
            .authorized(|token| {
                self.send(
                    ApiRequest::post("/checks")
                        .multipart(form.clone())
                        .bearer(&token),
                )
            })
            .await?;

        if !created.success {
            let message = if created.message.is_empty() {
                "Server rejected the check".to_string()
            } else {
                created.message
            };
            return Err(ApiError::Server(message));
        }

        tracing::info!(check_id = created.check.id, "Check created");
        Ok(created.check)
    }

    pub async fn get_analysis(&self, check_id: i64) -> Result<AnalysisResult, ApiError> {
        let path = format!("/analysis/{}", check_id);
        self.authorized(|token| self.send(ApiRequest::get(path.as_str()).bearer(&token)))
            .await
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// System-wide statistics for admins, personal statistics otherwise.
    pub async fn fetch_dashboard_stats(
        &self,
        period: StatsPeriod,
        user_id: Option<i64>,
        is_admin: bool,
    ) -> Result<DashboardStats, ApiError> {
        let request = dashboard_request(period, user_id, is_admin);
        self.authorized(|token| self.send(request.clone().bearer(&token)))
            .await
    }
}

/// Multipart body for `POST /checks`.
pub(crate) fn check_form(
    zone_id: i64,
    room_number: Option<&str>,
    photo: Photo,
    submitted_at: DateTime<Utc>,
) -> MultipartForm {
    let mut form = MultipartForm::new()
        .text("zone_id", zone_id.to_string())
        .text(
            "submitted_at",
            submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );

    if let Some(room) = room_number.map(str::trim).filter(|r| !r.is_empty()) {
        form = form.text("room_number", room);
    }

    form.file("photo", PHOTO_FILENAME, JPEG_CONTENT_TYPE, photo.into_bytes())
}

pub(crate) fn dashboard_request(
    period: StatsPeriod,
    user_id: Option<i64>,
    is_admin: bool,
) -> ApiRequest {
    if is_admin {
        return ApiRequest::get("/dashboard/stats").query("period", period.as_str());
    }

    let mut request = ApiRequest::get("/dashboard/personal_stats");
    if let Some(id) = user_id {
        request = request.query("user_id", id.to_string());
    }
    request.query("period", period.as_str())
}
