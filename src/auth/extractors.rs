use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::state::AppState;

/// The username of the caller, resolved from the `Authorization` header.
///
/// Declaring this as the first handler argument makes the identity check run
/// before any body parsing; a missing or bad token ends the request with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            let err = AppError::InternalServerError("AppState is not registered".into());
            return ready(Err(err.into()));
        };

        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let result: Result<Self, Self::Error> = state
            .accounts
            .extract_identity(header_value)
            .map(AuthenticatedUser)
            .map_err(|e| AppError::from(e).into());
        ready(result)
    }
}
