use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AnalysisResult, Zone};

/// Processing state of a submitted check.
///
/// Encoded on the wire as an integer. Codes outside 0..=3 decode to
/// `Unknown` and encode back to the same integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum CheckStatus {
    Created,
    InProgress,
    Approved,
    Rejected,
    Unknown(i64),
}

impl From<i64> for CheckStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => CheckStatus::Created,
            1 => CheckStatus::InProgress,
            2 => CheckStatus::Approved,
            3 => CheckStatus::Rejected,
            other => CheckStatus::Unknown(other),
        }
    }
}

impl From<CheckStatus> for i64 {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Created => 0,
            CheckStatus::InProgress => 1,
            CheckStatus::Approved => 2,
            CheckStatus::Rejected => 3,
            CheckStatus::Unknown(code) => code,
        }
    }
}

impl CheckStatus {
    /// The server has finished analysing the check.
    pub fn is_final(&self) -> bool {
        matches!(self, CheckStatus::Approved | CheckStatus::Rejected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Created => "created",
            CheckStatus::InProgress => "in progress",
            CheckStatus::Approved => "approved",
            CheckStatus::Rejected => "rejected",
            CheckStatus::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub zone_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub submitted_at: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<AnalysisResult>,
}

/// Body of a successful `POST /checks` (HTTP 201).
#[derive(Debug, Clone, Deserialize)]
pub struct CheckCreateResponse {
    pub success: bool,
    pub check: Check,
    #[serde(default)]
    pub message: String,
}

/// JPEG bytes attached to a new check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    data: Vec<u8>,
}

impl Photo {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Order checks newest first (highest id first), the convention used by
/// history listings. The server does not guarantee any order.
pub fn sort_checks_newest_first(checks: &mut [Check]) {
    checks.sort_by(|a, b| b.id.cmp(&a.id));
}
