use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::Task,
    repository::parse_task_id,
    routes::input::{read_task_submission, TaskSubmission},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub task_status: String,
}

/// Creates a task for the authenticated user.
///
/// Accepts a JSON object or a multipart form with `name`, `date`, `description`,
/// `taskStatus`, `taskCategory` and an optional `file` part. Without a file the
/// task is attached to the shared placeholder image.
///
/// ## Responses:
/// - `200 OK`: `{"success": true, "message": "Data saved successfully", "fileUrl": ..., "newTask": {...}}`.
/// - `400 Bad Request`: unreadable body, oversized file or a field over its length limit.
/// - `401 Unauthorized`: missing or invalid token.
#[post("/saveUserData")]
pub async fn save_user_data(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<impl Responder, AppError> {
    let TaskSubmission { input, file } =
        read_task_submission(&req, payload, state.files.max_bytes()).await?;
    input.validate()?;

    let file_id = match file {
        Some(file) => state.files.upload(&file.name, file.content).await?,
        None => state.files.default_blob_id().await?,
    };

    let record = state
        .tasks
        .create(user.username(), input, &file_id.to_hex())
        .await?;
    let task = Task::from_record(record, &state.config);
    log::info!("Created task {} for {}", task.id, user.username());

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Data saved successfully",
        "fileUrl": task.file_url,
        "newTask": task
    })))
}

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): exact `taskStatus` to match; empty means no filter.
#[get("/getTask")]
pub async fn get_tasks(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, AppError> {
    let records = state
        .tasks
        .list(user.username(), query.status.as_deref())
        .await?;
    let tasks: Vec<Task> = records
        .into_iter()
        .map(|record| Task::from_record(record, &state.config))
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": tasks
    })))
}

/// Replaces the five editable fields of a task, and its file when one is uploaded.
#[put("/updateTask/{id}")]
pub async fn update_task(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<impl Responder, AppError> {
    let task_id = path.into_inner();
    parse_task_id(&task_id)?;

    let TaskSubmission { input, file } =
        read_task_submission(&req, payload, state.files.max_bytes()).await?;
    input.validate()?;

    let new_file_id = match file {
        Some(file) => Some(state.files.upload(&file.name, file.content).await?.to_hex()),
        None => None,
    };

    state
        .tasks
        .update_fields(user.username(), &task_id, input, new_file_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task updated successfully"
    })))
}

/// Sets `taskStatus` to one of `TO-DO`, `IN-PROGRESS` or `COMPLETED`.
#[put("/updateTaskStatus/{id}")]
pub async fn update_task_status(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    state
        .tasks
        .update_status(user.username(), &path, &body.task_status)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task status updated successfully"
    })))
}

#[delete("/deleteTask/{id}")]
pub async fn delete_task(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(user.username(), &path).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task deleted successfully"
    })))
}
