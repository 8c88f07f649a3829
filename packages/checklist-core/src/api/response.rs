//! Response classification and typed decoding.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Error envelope the server uses for failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    errors: Option<Vec<String>>,
}

/// Decode a raw response into `T`, classifying failures by status code.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(classify_failure(status, body));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(status = status.as_u16(), "Response body did not match expected shape: {}", e);
        ApiError::Decoding(e.to_string())
    })
}

/// Map a non-2xx response to an error.
///
/// 401 becomes `Unauthorized` regardless of body; other statuses surface the
/// server-supplied message when there is one.
pub fn classify_failure(status: StatusCode, body: &[u8]) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(message), .. }) => ApiError::Server(message),
        Ok(ErrorBody { errors: Some(errors), .. }) if !errors.is_empty() => {
            ApiError::Server(errors.join(", "))
        }
        _ => ApiError::InvalidResponse(status.as_u16()),
    }
}

/// Map a transport failure (connect, timeout, body read) to an error.
pub fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Network(format!("Request timed out: {}", err))
    } else if err.is_builder() {
        ApiError::InvalidUrl(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}
