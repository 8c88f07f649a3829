//! HTTP access to the inspection API.
//!
//! Provides the client, request construction, response decoding and
//! endpoint configuration.

mod client;
pub mod config;
mod error;
pub mod request;
pub mod response;

pub use client::{ApiClient, LoginResult};
pub use config::{load_api_config, ApiEndpointConfig, ConfigSource};
pub use error::ApiError;
pub use request::{ApiRequest, MultipartForm, RequestBody};
