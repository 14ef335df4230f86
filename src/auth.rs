//! Bearer-token verification against the identity provider's published key set.
//!
//! Keys are fetched on every verification; nothing is cached between requests.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::middleware::Next;
use actix_web::{web, HttpMessage, ResponseError};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::config::AuthConfig;
use crate::error::{AuthError, Error, Result};
use crate::AppState;

/// The only signature algorithm accepted from the identity provider.
const ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims of a verified token, available to guarded handlers as `web::ReqData<Claims>`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,

    /// Space-separated list of granted scopes.
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("<anonymous>")
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope
            .as_deref()
            .map_or(false, |granted| granted.split(' ').any(|s| s == scope))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> std::result::Result<&str, AuthError> {
    let header = authorization.ok_or_else(AuthError::header_missing)?;
    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            "Authorization header must start with Bearer",
        )),
        [_, token] => Ok(*token),
        [] | [_] => Err(AuthError::invalid_header("Token not found")),
        _ => Err(AuthError::invalid_header(
            "Authorization header must be Bearer token",
        )),
    }
}

/// Check whether `scope` was granted to `token`, without verifying the token.
///
/// Only call this on a token that already passed [`TokenVerifier::verify`].
/// An unreadable token has no scopes.
pub fn requires_scope(token: &str, scope: &str) -> bool {
    let mut validation = Validation::new(ALGORITHM);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims.has_scope(scope))
        .unwrap_or(false)
}

fn rejection(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::invalid_claims(),
        _ => AuthError::unparseable_token(),
    }
}

pub struct TokenVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> TokenVerifier {
        TokenVerifier {
            client: reqwest::Client::new(),
            jwks_url: config.jwks_url.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    async fn fetch_key_set(&self) -> Result<JwkSet> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match response {
            Ok(response) => Ok(response.json::<JwkSet>().await?),
            Err(e) => {
                warn!("Unable to fetch key set from {}: {}", self.jwks_url, e);
                Err(e.into())
            }
        }
    }

    /// Verify the token carried by an `Authorization` header value and return its claims.
    pub async fn verify(&self, authorization: Option<&str>) -> Result<Claims> {
        let token = bearer_token(authorization)?;
        let key_set = self.fetch_key_set().await?;

        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::unparseable_token())?;
        let key = header
            .kid
            .as_deref()
            .and_then(|kid| key_set.find(kid))
            .ok_or_else(|| AuthError::invalid_header("Unable to find appropriate key"))?;
        let key = DecodingKey::from_jwk(key).map_err(|_| AuthError::unparseable_token())?;

        let mut validation = Validation::new(ALGORITHM);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        match jsonwebtoken::decode::<Claims>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(rejection(e.kind()).into()),
        }
    }
}

async fn authorize(req: &ServiceRequest) -> Result<Claims> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(Error::Misconfigured("application state is not registered"))?;

    let authorization = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AuthError::invalid_header("Authorization header is not valid text"))?,
        ),
        None => None,
    };

    state.verifier.verify(authorization).await
}

/// Route guard: lets the request through only with a valid bearer token and
/// stores the verified [`Claims`] in the request extensions.
pub async fn require_token<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> std::result::Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let outcome = authorize(&req).await;

    match outcome {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(e) => {
            let response = e.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}
