#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;

/// Everything a handler needs, built once at startup and shared through `web::Data`.
pub struct AppState {
    pub pool: db::Pool,
    pub verifier: auth::TokenVerifier,
}

impl AppState {
    pub fn new(pool: db::Pool, verifier: auth::TokenVerifier) -> AppState {
        AppState { pool, verifier }
    }
}
