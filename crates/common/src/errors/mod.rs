//! Error types for the Newsroom API
//!
//! Provides the error taxonomy and the normalizer that turns any failure
//! into exactly one `{msg}` response:
//! - Domain errors carry their own status and message
//! - Postgres constraint violations are classified from SQLSTATE and detail
//! - Everything else is logged and answered with a generic 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, RuntimeErr};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Postgres SQLSTATE for "invalid text representation"
pub const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Postgres SQLSTATE for "foreign key violation"
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Message used for every malformed caller-supplied value
pub const INVALID_INPUT: &str = "invalid input";

/// Message used for rejected query options
pub const BAD_REQUEST: &str = "bad request";

/// Message used for unmatched routes
pub const INVALID_URL: &str = "invalid URL";

/// Message returned for anything unclassified
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller errors
    InvalidInput,
    BadRequest,
    NotFound,
    RouteNotFound,

    // Database-enforced errors
    ConstraintViolation,

    // Server errors
    DatabaseError,
    ConnectionError,
    ConfigurationError,
    InternalError,
}

impl ErrorCode {
    /// Label used for metrics and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NotFound => "not_found",
            ErrorCode::RouteNotFound => "route_not_found",
            ErrorCode::ConstraintViolation => "constraint_violation",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::ConnectionError => "connection_error",
            ErrorCode::ConfigurationError => "configuration_error",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing caller-supplied value
    #[error("{message}")]
    InvalidInput { message: String },

    /// Query option outside its allow-list
    #[error("bad request")]
    BadRequest,

    /// Referenced entity is absent
    #[error("{message}")]
    NotFound { message: String },

    #[error("invalid URL")]
    RouteNotFound,

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// `InvalidInput` with the generic "invalid input" message
    pub fn invalid_input() -> Self {
        AppError::InvalidInput {
            message: INVALID_INPUT.to_string(),
        }
    }

    /// `NotFound` with the given message
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    /// Resolve this error to the status, code and message sent to the caller.
    ///
    /// Tiers are evaluated in order and the first match wins:
    /// 1. domain errors pass through with their own status and message
    /// 2. database errors carrying a recognised SQLSTATE are classified
    /// 3. anything else becomes a 500 with no internal detail
    pub fn normalize(&self) -> ErrorReply {
        if let Some(reply) = self.domain_reply() {
            return reply;
        }

        if let AppError::Database(err) = self {
            if let Some((code, detail)) = pg_error_parts(err) {
                if let Some(reply) = classify_pg_error(&code, detail.as_deref()) {
                    return reply;
                }
            }
        }

        let code = match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            _ => ErrorCode::InternalError,
        };

        ErrorReply::new(StatusCode::INTERNAL_SERVER_ERROR, code, INTERNAL_SERVER_ERROR)
    }

    fn domain_reply(&self) -> Option<ErrorReply> {
        let reply = match self {
            AppError::InvalidInput { message } => {
                ErrorReply::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, message.clone())
            }
            AppError::BadRequest => {
                ErrorReply::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, BAD_REQUEST)
            }
            AppError::NotFound { message } => {
                ErrorReply::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message.clone())
            }
            AppError::RouteNotFound => {
                ErrorReply::new(StatusCode::NOT_FOUND, ErrorCode::RouteNotFound, INVALID_URL)
            }
            _ => return None,
        };

        Some(reply)
    }
}

/// What the caller sees for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub msg: String,
}

impl ErrorReply {
    fn new(status: StatusCode, code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: String,
}

/// Classify a Postgres error by SQLSTATE and detail text.
///
/// Returns `None` for codes that have no caller-facing meaning, leaving them
/// to the generic 500 tier.
pub fn classify_pg_error(code: &str, detail: Option<&str>) -> Option<ErrorReply> {
    match code {
        PG_INVALID_TEXT_REPRESENTATION => Some(ErrorReply::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            INVALID_INPUT,
        )),
        PG_FOREIGN_KEY_VIOLATION => {
            let detail = detail.unwrap_or_default();
            let msg = if detail.contains("author") && detail.contains(r#"not present in table "users""#) {
                "username not found"
            } else if detail.contains("article_id")
                && detail.contains(r#"not present in table "articles""#)
            {
                "article id not found"
            } else {
                "not found"
            };

            Some(ErrorReply::new(
                StatusCode::NOT_FOUND,
                ErrorCode::ConstraintViolation,
                msg,
            ))
        }
        _ => None,
    }
}

/// Pull the SQLSTATE and detail text out of a sea-orm error, if it wraps a
/// database-side failure.
fn pg_error_parts(err: &DbErr) -> Option<(String, Option<String>)> {
    let runtime = match err {
        DbErr::Query(runtime) | DbErr::Exec(runtime) => runtime,
        _ => return None,
    };

    let RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) = runtime else {
        return None;
    };

    let code = db_err.code()?.into_owned();
    let detail = db_err
        .try_downcast_ref::<PgDatabaseError>()
        .and_then(|pg| pg.detail())
        .map(str::to_owned);

    Some((code, detail))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let reply = self.normalize();

        // Log the full error; the body only ever carries the reply message
        if reply.status.is_server_error() {
            tracing::error!(
                error = %self,
                code = reply.code.as_str(),
                status = reply.status.as_u16(),
                "Server error"
            );
        } else {
            tracing::warn!(
                error = %reply.msg,
                code = reply.code.as_str(),
                status = reply.status.as_u16(),
                "Client error"
            );
        }

        crate::metrics::record_error(reply.code);

        (reply.status, Json(ErrorBody { msg: reply.msg })).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}
