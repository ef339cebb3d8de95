use serde::{Deserialize, Serialize};

use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub title: String,
    pub proficiency: String,
}

impl Document for Skill {
    const COLLECTION: &'static str = "skills";
}

/// Request body for both add and update. Absent fields are left alone on
/// update.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SkillFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<String>,
}
