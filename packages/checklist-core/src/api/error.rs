//! Error taxonomy for the inspection API client.

use thiserror::Error;

/// Errors surfaced by [`crate::api::ApiClient`] operations.
///
/// `Unauthorized` is kept distinct from every other status so the refresh
/// coordinator can intercept it; everything else reaches the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing, invalid or expired access token.
    #[error("Not authorized. Please sign in again.")]
    Unauthorized,

    /// Non-2xx status without a server-supplied message.
    #[error("Invalid response from server (status {0})")]
    InvalidResponse(u16),

    /// Body did not match the expected shape.
    #[error("Failed to decode server response: {0}")]
    Decoding(String),

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encoding(String),

    /// Connection failure, timeout, or an interrupted body read.
    #[error("Network error: {0}")]
    Network(String),

    /// 4xx/5xx carrying an `error`/`errors` message.
    #[error("{0}")]
    Server(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A check was submitted without photo bytes.
    #[error("A photo is required to submit a check")]
    MissingPhoto,

    /// Local session storage could not be written or removed.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
