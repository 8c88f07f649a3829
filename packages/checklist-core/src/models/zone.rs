use serde::{Deserialize, Serialize};

/// An inspectable area together with its reference checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_items_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_objects: Option<Vec<StandardObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_points: Option<Vec<String>>,
}

/// An object the zone is expected to contain, with its expected count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardObject {
    pub name: String,
    pub count: i64,
}
