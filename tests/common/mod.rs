#![allow(dead_code)]

use actix_web::web;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use ubeer_api::auth::TokenVerifier;
use ubeer_api::config::AuthConfig;
use ubeer_api::{db, AppState};

pub const AUDIENCE: &str = "https://api.ubeer.test";
pub const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/jwt_signing_key.pem");
pub const KEY_SET: &str = include_str!("../fixtures/jwks.json");
pub const KEY_ID: &str = "test-key";

pub fn issuer(jwks_base: &str) -> String {
    format!("{}/", jwks_base)
}

/// Application state over a fresh in-memory database.
pub fn state(auth: AuthConfig) -> web::Data<AppState> {
    let pool = db::connect(":memory:", 1).expect("in-memory pool");
    db::init_schema(&pool).expect("schema");

    web::Data::new(AppState::new(pool, TokenVerifier::new(&auth)))
}

/// Settings for a key set that is never reachable; enough for unguarded routes.
pub fn offline_auth() -> AuthConfig {
    AuthConfig {
        jwks_url: "http://127.0.0.1:9/.well-known/jwks.json".to_string(),
        issuer: "https://ubeer.test/".to_string(),
        audience: AUDIENCE.to_string(),
    }
}

pub fn sign(kid: &str, claims: &Value) -> String {
    sign_with(Some(kid), claims)
}

/// Sign with the fixture key, optionally naming it in the header's `kid`.
pub fn sign_with(kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);

    let key = EncodingKey::from_rsa_pem(SIGNING_KEY).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("signed token")
}

pub fn claims(issuer: &str, audience: &str, expires_in: i64) -> Value {
    json!({
        "sub": "auth0|customer",
        "iss": issuer,
        "aud": audience,
        "exp": Utc::now().timestamp() + expires_in,
        "scope": "read:orders",
    })
}
