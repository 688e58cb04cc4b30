pub mod chanjing;
pub mod events;
pub mod jobs;
pub mod video;
pub mod voice_clone;

use std::collections::HashMap;

use axum::extract::Multipart;
use studio_vendors::http::UploadFile;

use crate::error::{AppError, AppResult};

/// A buffered multipart form: text fields and file parts by field name.
#[derive(Debug, Default)]
pub(crate) struct FormData {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadFile>,
}

impl FormData {
    /// Read every part of the form. Parts with a file name are files.
    pub(crate) async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    let mut file = UploadFile::new(file_name, bytes.to_vec());
                    if let Some(content_type) = content_type {
                        file = file.with_content_type(content_type);
                    }
                    form.files.insert(name, file);
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.texts.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A non-blank text field.
    pub(crate) fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn require_text(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }

    /// Take a non-empty file part out of the form.
    pub(crate) fn take_file(&mut self, name: &str) -> AppResult<UploadFile> {
        self.files
            .remove(name)
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }
}
