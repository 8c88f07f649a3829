//! Refresh-and-retry policy for authenticated calls.
//!
//! Every authenticated operation runs through [`ApiClient::authorized`]:
//!
//! ```text
//! Idle -> Sent -> Success
//!              -> Unauthorized -> Refreshing -> Retried-Success
//!                                            -> Failed (session cleared)
//!              -> other error (returned as-is)
//! ```
//!
//! Once a refresh has been attempted, any failure of the refresh or of the
//! retried request clears the session and surfaces as `Unauthorized`.
//!
//! At most one refresh and one retry happen per call. Refreshes are
//! serialized by a shared guard; a caller that waited on the guard while
//! another caller rotated the token reuses the rotated token instead of
//! refreshing again.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::auth::Session;

/// Result of one attempt, split the way the coordinator acts on it.
#[derive(Debug)]
pub enum Attempt<T> {
    Ok(T),
    Unauthorized,
    Failed(ApiError),
}

impl<T> From<Result<T, ApiError>> for Attempt<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Attempt::Ok(value),
            Err(ApiError::Unauthorized) => Attempt::Unauthorized,
            Err(e) => Attempt::Failed(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(alias = "access_token")]
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Run `op` with the current access token, refreshing and retrying once
    /// if the server answers 401.
    pub(crate) async fn authorized<T, F, Fut>(&self, op: F) -> Result<T, ApiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(session) = self.store.load() else {
            tracing::debug!("No stored session, refusing authenticated request");
            return Err(ApiError::Unauthorized);
        };

        match Attempt::from(op(session.access_token.clone()).await) {
            Attempt::Ok(value) => return Ok(value),
            Attempt::Failed(e) => return Err(e),
            Attempt::Unauthorized => {}
        }

        tracing::info!("Access token rejected, attempting refresh");
        let token = match self.refresh_after_rejection(&session.access_token).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.discard_session();
                return Err(ApiError::Unauthorized);
            }
        };

        match Attempt::from(op(token).await) {
            Attempt::Ok(value) => Ok(value),
            Attempt::Unauthorized => {
                tracing::warn!("Refreshed token was rejected as well");
                self.discard_session();
                Err(ApiError::Unauthorized)
            }
            Attempt::Failed(e) => {
                tracing::warn!("Retry after refresh failed: {}", e);
                self.discard_session();
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Obtain a token to retry with after `rejected` was refused.
    async fn refresh_after_rejection(&self, rejected: &str) -> Result<String, ApiError> {
        let _guard = self.refresh_guard.lock().await;

        let session = self.store.load().ok_or(ApiError::Unauthorized)?;
        if session.access_token != rejected {
            tracing::debug!("Token already rotated by a concurrent refresh");
            return Ok(session.access_token);
        }

        let refresh_token = session
            .refresh_token
            .as_deref()
            .ok_or(ApiError::Unauthorized)?;

        let request = ApiRequest::post("/auth/refresh").json(&RefreshRequest { refresh_token })?;
        let response: RefreshResponse = self.send(request).await?;

        let rotated = Session {
            access_token: response.token,
            refresh_token: response.refresh_token.or(session.refresh_token),
            user: session.user,
        };
        self.store.save(&rotated)?;

        tracing::info!("Access token refreshed");
        Ok(rotated.access_token)
    }
}
