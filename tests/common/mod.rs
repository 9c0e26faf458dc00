#![allow(dead_code)]

use actix_web::http::header;
use actix_web::{test, web};
use serde_json::json;
use std::sync::Arc;
use taskboard::store::MemoryStore;
use taskboard::{AppState, Config};

pub const SECRET: &str = "integration-test-secret";
pub const BOUNDARY: &str = "----taskboard-test-boundary";

/// Application state over a fresh in-memory store, with a cheap bcrypt cost.
pub fn test_state() -> web::Data<AppState> {
    test_state_with(|_| {})
}

pub fn test_state_with(customize: impl FnOnce(&mut Config)) -> web::Data<AppState> {
    let mut config = Config::with_secret(SECRET);
    config.bcrypt_cost = 4;
    customize(&mut config);
    web::Data::new(AppState::new(config, Arc::new(MemoryStore::new())))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers `username` through the API, logs in and returns the token.
pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    let credentials = json!({ "username": username, "password": password });

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "registration of {} failed", username);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(&credentials)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(app, req).await;
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: &'a str,
        content_type: &'a str,
        content: &'a [u8],
    },
}

/// Encodes `parts` as `multipart/form-data` using `BOUNDARY`.
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                filename,
                content_type,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}
