use std::{collections::HashMap, io::Write, path::Path};

use anyhow::Context;
use axum::extract::Multipart;
use tempfile::NamedTempFile;

use crate::error::AppError;

/// A file received in a multipart request, spooled to a temp file.
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl TempUpload {
    pub fn from_bytes(bytes: &[u8], content_type: &str) -> anyhow::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile()
            .context("create temp upload")?;
        file.write_all(bytes).context("write temp upload")?;
        file.flush().context("flush temp upload")?;
        Ok(Self {
            file,
            content_type: content_type.to_string(),
            file_name: None,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Text fields and files of a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, TempUpload>,
}

impl UploadForm {
    pub async fn from_multipart(mut mp: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(mut field) = mp.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert(name, text);
                continue;
            };

            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".into());
            let mut file = tempfile::Builder::new()
                .prefix("upload-")
                .tempfile()
                .context("create temp upload")?;
            let mut size = 0usize;
            while let Some(chunk) = field.chunk().await? {
                size += chunk.len();
                file.write_all(&chunk).context("write temp upload")?;
            }
            file.flush().context("flush temp upload")?;

            // browsers send an empty part for an untouched file input
            if size == 0 {
                continue;
            }
            form.files.insert(
                name,
                TempUpload {
                    file,
                    content_type,
                    file_name: Some(file_name),
                },
            );
        }
        Ok(form)
    }

    /// Takes a text field, treating blank values as absent.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<TempUpload> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    pub fn with_file(mut self, name: &str, upload: TempUpload) -> Self {
        self.files.insert(name.to_string(), upload);
        self
    }
}
