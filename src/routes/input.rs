//! Request body decoding shared by the create and update handlers.
//!
//! Both accept either a JSON object or a multipart form carrying the same
//! fields, and both produce a `TaskSubmission`.

use actix_multipart::{Field, Multipart};
use actix_web::web::{Bytes, BytesMut};
use actix_web::{web, HttpMessage, HttpRequest};
use futures::{StreamExt, TryStreamExt};

use crate::error::AppError;
use crate::files::FileError;
use crate::models::TaskInput;

/// Cap on a single non-file form field.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// A file part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

/// The decoded task fields plus the optional uploaded file.
#[derive(Debug, Default)]
pub struct TaskSubmission {
    pub input: TaskInput,
    pub file: Option<UploadedFile>,
}

pub fn is_json(req: &HttpRequest) -> bool {
    req.content_type().eq_ignore_ascii_case("application/json")
}

/// Decodes the request body as JSON when the content type says so, otherwise as multipart.
pub async fn read_task_submission(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<TaskSubmission, AppError> {
    if is_json(req) {
        let body = read_body(payload, limit).await?;
        let input = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
        return Ok(TaskSubmission { input, file: None });
    }

    read_form(Multipart::new(req.headers(), payload), limit).await
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Bytes, AppError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Failed to read body: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::BadRequest("Request body too large".into()));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

fn form_error(error: impl std::fmt::Display) -> AppError {
    log::debug!("Rejecting multipart body: {}", error);
    AppError::BadRequest("Failed to parse form data".into())
}

async fn read_form(mut multipart: Multipart, limit: usize) -> Result<TaskSubmission, AppError> {
    let mut submission = TaskSubmission::default();

    while let Some(mut field) = multipart.try_next().await.map_err(form_error)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition
            .get_filename()
            .map(str::to_string)
            .unwrap_or_default();

        match name.as_str() {
            "file" => {
                let content = read_field(&mut field, limit)
                    .await?
                    .ok_or(FileError::TooLarge(limit))?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if !filename.is_empty() {
                    submission.file = Some(UploadedFile {
                        name: filename,
                        content,
                    });
                }
            }
            "name" | "date" | "description" | "taskStatus" | "taskCategory" => {
                let content = read_field(&mut field, TEXT_FIELD_LIMIT)
                    .await?
                    .ok_or_else(|| AppError::BadRequest(format!("Field {} is too long", name)))?;
                let value = String::from_utf8(content.to_vec())
                    .map_err(|_| AppError::BadRequest(format!("Field {} is not UTF-8", name)))?;
                let input = &mut submission.input;
                match name.as_str() {
                    "name" => input.name = value,
                    "date" => input.date = value,
                    "description" => input.description = value,
                    "taskStatus" => input.task_status = value,
                    _ => input.task_category = value,
                }
            }
            _ => {
                log::debug!("Ignoring unknown form field {:?}", name);
                while field.try_next().await.map_err(form_error)?.is_some() {}
            }
        }
    }

    Ok(submission)
}

/// Reads one part into memory; `None` once it grows past `limit`.
async fn read_field(field: &mut Field, limit: usize) -> Result<Option<Bytes>, AppError> {
    let mut content = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(form_error)? {
        if content.len() + chunk.len() > limit {
            return Ok(None);
        }
        content.extend_from_slice(&chunk);
    }
    Ok(Some(content.freeze()))
}
