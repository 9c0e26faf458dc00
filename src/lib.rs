#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Accounts with bcrypt-hashed passwords and bearer tokens, owner-scoped task"]
#![doc = "records and file attachments, served over actix-web. The binary (`main.rs`)"]
#![doc = "reads the configuration, opens the store and runs the HTTP server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
