//! Typed shapes of the inspection API payloads.
//!
//! Field names match the wire (snake_case); the few fields whose wire
//! names differ carry explicit `serde(rename)` attributes.

mod analysis;
mod check;
mod dashboard;
mod user;
mod zone;

pub use analysis::{AnalysisResult, DetectedObject};
pub use check::{sort_checks_newest_first, Check, CheckCreateResponse, CheckStatus, Photo};
pub use dashboard::{
    DashboardStats, LeaderboardUser, OverviewStats, QualityStats, RecentCheck, StatsData,
    StatsPeriod, UsersStats,
};
pub use user::{AuthResponse, LoginResponse, User};
pub use zone::{StandardObject, Zone};
