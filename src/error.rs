use actix_web::error::{BlockingError, ResponseError};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use derive_more::Display;
use diesel::r2d2;
use diesel::result::Error as DieselError;
use std::convert::From;

pub type Result<T> = ::std::result::Result<T, Error>;

/// A single-field JSON reply, rendered as `{"message": ..}` or `{"error": ..}`.
#[derive(Debug, Display, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Notice {
    #[display(fmt = "{}", _0)]
    Message(String),
    #[display(fmt = "{}", _0)]
    Error(String),
}

impl Notice {
    pub fn message<S: Into<String>>(text: S) -> Notice {
        Notice::Message(text.into())
    }

    pub fn error<S: Into<String>>(text: S) -> Notice {
        Notice::Error(text.into())
    }
}

/// Rejection produced by the token verifier, rendered as `{"code", "description"}`.
#[derive(Debug, Display, Clone, PartialEq, Serialize)]
#[display(fmt = "{}: {}", code, description)]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
}

impl AuthError {
    pub fn new<S: Into<String>>(code: &'static str, description: S) -> AuthError {
        AuthError {
            code,
            description: description.into(),
        }
    }

    pub fn header_missing() -> AuthError {
        AuthError::new("authorization_header_missing", "Authorization header is expected")
    }

    pub fn invalid_header<S: Into<String>>(description: S) -> AuthError {
        AuthError::new("invalid_header", description)
    }

    pub fn unparseable_token() -> AuthError {
        AuthError::invalid_header("Unable to parse authentication token.")
    }

    pub fn token_expired() -> AuthError {
        AuthError::new("token_expired", "token is expired")
    }

    pub fn invalid_claims() -> AuthError {
        AuthError::new(
            "invalid_claims",
            "incorrect claims, please check the audience and issuer",
        )
    }
}

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "Not found: {}", _0)]
    NotFound(Notice),

    #[display(fmt = "Invalid reference: {}", _0)]
    InvalidReference(Notice),

    #[display(fmt = "Bad request: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Unauthorized: {}", _0)]
    Unauthorized(AuthError),

    #[display(fmt = "Database error: {}", _0)]
    Database(DieselError),

    #[display(fmt = "Connection pool error: {}", _0)]
    Pool(r2d2::PoolError),

    #[display(fmt = "Blocking task failed")]
    Blocking,

    #[display(fmt = "Unable to fetch key set: {}", _0)]
    KeySetFetch(reqwest::Error),

    #[display(fmt = "Server misconfigured: {}", _0)]
    Misconfigured(&'static str),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::KeySetFetch(e) => Some(e),
            Self::NotFound(_)
            | Self::InvalidReference(_)
            | Self::BadRequest(_)
            | Self::Unauthorized(_)
            | Self::Blocking
            | Self::Misconfigured(_) => None,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidReference(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_)
            | Self::Pool(_)
            | Self::Blocking
            | Self::KeySetFetch(_)
            | Self::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Self::NotFound(notice) | Self::InvalidReference(notice) => response.json(notice),
            Self::BadRequest(text) => response.json(Notice::error(text.as_str())),
            Self::Unauthorized(rejection) => {
                debug!("Rejected request: {}", rejection);
                response.json(rejection)
            }
            Self::Database(_)
            | Self::Pool(_)
            | Self::Blocking
            | Self::KeySetFetch(_)
            | Self::Misconfigured(_) => {
                error!("{}", self);
                response.json(Notice::error("internal server error"))
            }
        }
    }
}

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Error {
        Error::Database(e)
    }
}

impl From<r2d2::PoolError> for Error {
    fn from(e: r2d2::PoolError) -> Error {
        Error::Pool(e)
    }
}

impl From<BlockingError> for Error {
    fn from(_: BlockingError) -> Error {
        Error::Blocking
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::KeySetFetch(e)
    }
}

impl From<AuthError> for Error {
    fn from(e: AuthError) -> Error {
        Error::Unauthorized(e)
    }
}
