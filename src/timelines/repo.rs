use serde::{Deserialize, Serialize};

use crate::db::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub title: String,
    pub description: String,
    pub timeline: Period,
}

impl Document for Timeline {
    const COLLECTION: &'static str = "timelines";
}

/// Flat request body; `from` and `to` land in the nested period.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub(super) struct TimelinePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Period>,
}
