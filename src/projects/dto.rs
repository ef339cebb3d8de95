use serde::Serialize;

use crate::media::UploadForm;

/// Text fields of a project form. On create every field is required; on
/// update only the present ones are written.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repo_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed: Option<String>,
}

impl ProjectFields {
    pub fn from_form(form: &mut UploadForm) -> Self {
        Self {
            title: form.take_text("title"),
            description: form.take_text("description"),
            git_repo_link: form.take_text("gitRepoLink"),
            project_link: form.take_text("projectLink"),
            technologies: form.take_text("technologies"),
            stack: form.take_text("stack"),
            deployed: form.take_text("deployed"),
        }
    }
}
