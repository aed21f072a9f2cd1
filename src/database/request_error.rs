use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Json};
use rocket::Request;
use thiserror::Error;

/// Failure reported by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// Raised by the in-memory stand-ins used in tests.
    #[cfg_attr(not(test), allow(dead_code))]
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a request, rendered as a `500` with a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No collection handle could be obtained.
    #[error("DB connection failed")]
    ConnectionFailed,

    /// The store rejected a read or a write.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = match self {
            Self::ConnectionFailed => json!({ "error": "DB connection failed" }),
            Self::Store(_) => json!({ "status": "error" }),
        };
        (Status::InternalServerError, Json(body)).respond_to(request)
    }
}

pub type RequestResult<T, E = ApiError> = std::result::Result<T, E>;
