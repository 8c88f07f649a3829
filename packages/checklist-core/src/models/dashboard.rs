use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window the dashboard aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    #[default]
    Week,
    Month,
    All,
}

impl StatsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Day => "day",
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::All => "all",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(StatsPeriod::Day),
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            "all" => Ok(StatsPeriod::All),
            other => Err(format!("unknown period '{}' (expected day, week, month or all)", other)),
        }
    }
}

/// Aggregate statistics snapshot.
///
/// System-wide (admin) responses carry `users` and `leaderboard`; personal
/// responses omit both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub success: bool,
    pub stats: StatsData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsData {
    pub overview: OverviewStats,
    pub quality: QualityStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<UsersStats>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardUser>,
    #[serde(default)]
    pub recent_checks: Vec<RecentCheck>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_checks: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityStats {
    pub average_score: f64,
    pub checks_with_photo: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_photos: Option<i64>,
    pub photos_per_check: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersStats {
    pub total_users: i64,
    pub active_users: i64,
    pub checks_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardUser {
    pub id: i64,
    pub full_name: String,
    pub total_checks: i64,
    pub rejected_count: i64,
    pub quality_score: f64,
}

/// Row of the "recent checks" feed. `status` is the server's textual
/// status (`created`, `pending`, `approved`, `rejected`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCheck {
    pub id: i64,
    pub user_email: String,
    pub user_name: String,
    pub zone_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub has_photo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
