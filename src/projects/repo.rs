use serde::{Deserialize, Serialize};

use crate::{db::Document, storage::AssetRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub project_banner: AssetRef,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
}
