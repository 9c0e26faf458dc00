use actix_web::{get, web, HttpResponse};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    files::{parse_file_id, FileError, DEFAULT_FILE_ID},
    state::AppState,
};

/// Streams a stored attachment back with a content type sniffed from its bytes.
///
/// `default` always resolves to the bundled placeholder. Any other identifier
/// must be a hex id (400 otherwise). Unless the service runs with
/// `FILES_PUBLIC=true`, it also needs a bearer token and must be referenced by
/// one of the caller's tasks.
#[get("/files/{id}")]
pub async fn serve_file(
    user: Option<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file_id = path.into_inner();
    if file_id != DEFAULT_FILE_ID {
        parse_file_id(&file_id)?;
    }

    if !state.config.files_public && !state.files.is_default(&file_id) {
        let user = user.ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;
        if !state.tasks.references_file(user.username(), &file_id).await? {
            return Err(FileError::NotFound.into());
        }
    }

    let file = state.files.retrieve(&file_id).await?;
    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .body(file.content))
}
