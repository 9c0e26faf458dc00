use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    state::AppState,
};

/// Creates a user account.
///
/// ## Request Body:
/// - `username`: 3 to 32 characters of letters, digits, `_`, `.` or `-`.
/// - `password`: at least 6 characters.
///
/// ## Responses:
/// - `200 OK`: `{"success": true, "message": "Registration successful"}`.
/// - `400 Bad Request`: validation failure or the username is already taken.
/// - `500 Internal Server Error`: hashing or store failure.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    state.accounts.register(&body.username, &body.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Registration successful"
    })))
}

/// Exchanges a username and password for a bearer token valid for 24 hours.
///
/// Unknown users and wrong passwords get the same `401` response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let token = state.accounts.login(&body.username, &body.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
    }))
}
