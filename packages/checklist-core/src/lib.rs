//! Checklist Core Library
//!
//! This crate provides the client side of the cleaning-quality inspection
//! service:
//! - Authentication (login/logout, bearer tokens, refresh-and-retry on 401)
//! - Zones, checks with photo upload, AI analysis results
//! - Dashboard statistics, system-wide or personal
//! - Session storage (keyring with file fallback)
//!
//! # Features
//!
//! - `keyring-storage` (default): Use platform keyring for session storage
//! - `file-storage`: Use file-based session storage (for headless Linux)
//!
//! # Example
//!
//! ```no_run
//! use checklist_core::{ApiClient, Photo, StatsPeriod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), checklist_core::ApiError> {
//!     let client = ApiClient::from_env()?;
//!     let login = client.login("admin@example.com", "password").await?;
//!
//!     let zones = client.list_zones().await?;
//!     println!("{} zones available", zones.len());
//!
//!     let photo = Photo::jpeg(std::fs::read("lobby.jpg").unwrap_or_default());
//!     let check = client.create_check(zones[0].id, Some("101"), Some(photo)).await?;
//!     println!("Submitted check #{}", check.id);
//!
//!     let stats = client
//!         .fetch_dashboard_stats(StatsPeriod::Week, Some(login.user.id), login.user.is_admin)
//!         .await?;
//!     println!("Approval rate: {:.1}%", stats.stats.overview.approval_rate);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod models;

// Re-export commonly used types
pub use api::{ApiClient, ApiEndpointConfig, ApiError, ConfigSource, LoginResult};
pub use auth::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use models::{
    AnalysisResult, Check, CheckStatus, DashboardStats, Photo, StatsPeriod, User, Zone,
};
