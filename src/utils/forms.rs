use crate::error::ApiError;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::StreamExt;
use futures_util::future::LocalBoxFuture;
use std::collections::HashMap;
use tracing::error;

/// One uploaded file part: the form field it arrived under, the client
/// filename, and the raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Unified body extractor for the mutating endpoints. Accepts both
/// `application/x-www-form-urlencoded` and `multipart/form-data`;
/// text fields are first-occurrence-wins, file parts keep their order.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl FormData {
    /// Field value, or `""` when the field is absent.
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// First file uploaded under the given field name.
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn attach_file(
        &mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        data: Vec<u8>,
    ) {
        self.files.push(UploadedFile {
            field: field.into(),
            file_name: file_name.into(),
            data,
        });
    }
}

/// Parses an urlencoded body. Undecodable input reads as an empty form,
/// which the handlers then reject through their required-field checks.
fn from_urlencoded(body: &[u8]) -> FormData {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();

    let mut form = FormData::default();
    for (name, value) in pairs {
        form.insert_text(name, value);
    }
    form
}

async fn from_multipart(req: &HttpRequest, payload: Payload) -> Result<FormData, ApiError> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut form = FormData::default();

    while let Some(item) = multipart.next().await {
        let mut field = item.map_err(|e| {
            error!(error = %e, "Failed to read multipart field");
            ApiError::Internal
        })?;

        let name = field.name().to_string();
        let file_name = field
            .content_disposition()
            .get_filename()
            .map(str::to_string);

        let mut data = web::BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                error!(error = %e, field = %name, "Failed to read multipart chunk");
                ApiError::Internal
            })?;
            data.extend_from_slice(&chunk);
        }

        match file_name {
            // A part with a filename is a file; an empty filename means
            // the client submitted an empty file input.
            Some(file_name) if !file_name.is_empty() => {
                form.attach_file(name, file_name, data.to_vec());
            }
            _ => {
                form.insert_text(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Ok(form)
}

impl FromRequest for FormData {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let mut payload = payload.take();

        Box::pin(async move {
            let content_type = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            if content_type.starts_with("multipart/form-data") {
                return from_multipart(&req, payload).await;
            }

            let mut body = web::BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    error!(error = %e, "Failed to read request body");
                    ApiError::Internal
                })?;
                body.extend_from_slice(&chunk);
            }

            Ok(from_urlencoded(&body))
        })
    }
}
