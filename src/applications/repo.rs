use serde::{Deserialize, Serialize};

use crate::{db::Document, media::UploadForm, storage::AssetRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareApplication {
    pub name: String,
    pub svg: AssetRef,
}

impl Document for SoftwareApplication {
    const COLLECTION: &'static str = "software_applications";
}

#[derive(Debug, Default, Serialize)]
pub struct ApplicationFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApplicationFields {
    pub fn from_form(form: &mut UploadForm) -> Self {
        Self {
            name: form.take_text("name"),
        }
    }
}
