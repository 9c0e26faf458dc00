pub mod auth;
pub mod files;
pub mod health;
pub mod input;
pub mod tasks;

use actix_cors::Cors;
use actix_web::{http::header, web};

use crate::config::Config;
use crate::error::AppError;

/// Largest JSON body accepted by the `web::Json` extractors.
const JSON_LIMIT: usize = 64 * 1024;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| {
                AppError::BadRequest(format!("Invalid request payload: {}", err)).into()
            }),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }))
    .service(health::index)
    .service(health::health)
    .service(auth::register)
    .service(auth::login)
    .service(tasks::save_user_data)
    .service(tasks::get_tasks)
    .service(tasks::update_task)
    .service(tasks::update_task_status)
    .service(tasks::delete_task)
    .service(files::serve_file);
}

/// CORS policy for the single configured front-end origin.
pub fn cors(config: &Config) -> Cors {
    let cors = if config.cors_allowed_origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(&config.cors_allowed_origin)
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(12 * 60 * 60)
}
