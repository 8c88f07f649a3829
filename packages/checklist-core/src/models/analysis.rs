use serde::{Deserialize, Serialize};

/// Output of the server-side image analysis for one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: i64,
    pub check_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_objects: Option<Vec<DetectedObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(rename = "ml_model_version")]
    pub model_version: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    pub count: i64,
    pub confidence: f64,
}

impl AnalysisResult {
    /// Confidence as a whole percentage, e.g. `"87%"`, or `"N/A"`.
    pub fn confidence_percentage(&self) -> String {
        match self.confidence_score {
            Some(score) => format!("{}%", score.trunc() as i64),
            None => "N/A".to_string(),
        }
    }

    pub fn approved(&self) -> bool {
        self.is_approved == Some(true)
    }
}
