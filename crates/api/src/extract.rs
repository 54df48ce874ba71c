//! Form bodies submitted either urlencoded or as `multipart/form-data`.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;

use crate::error::AppError;
use crate::state::AppState;

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and file uploads of a submitted form.
///
/// An empty file input (no name, no content) is treated as no upload.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field value, empty when absent.
    pub fn value(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn file(&self, name: &str) -> Option<&Upload> {
        self.files.get(name)
    }
}

impl FromRequest<AppState> for FormData {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(FormData {
                fields,
                files: HashMap::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let mut data = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "Multipart read error");
            AppError::BadRequest(e.body_text())
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    if !file_name.is_empty() || !bytes.is_empty() {
                        data.files.insert(name, Upload { file_name, bytes });
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    data.fields.insert(name, text);
                }
            }
        }

        Ok(data)
    }
}
