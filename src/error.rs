use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::abilities::CallerContext;

#[derive(Debug, ThisError)]
pub enum FormsError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ability not found: {0}")]
    AbilityNotFound(String),

    #[error("Caller {caller:?} is not allowed to run {ability}")]
    PermissionDenied {
        ability: String,
        caller: CallerContext,
    },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input for {ability}: {reason}")]
    InvalidInput { ability: String, reason: String },

    #[error("Invalid schema for {ability}: {reason}")]
    InvalidSchema { ability: String, reason: String },

    #[error("No route was found matching the URL and request method")]
    NoRoute,
}

impl IntoResponse for FormsError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            FormsError::DatabaseError(_)
            | FormsError::Json(_)
            | FormsError::InvalidSchema { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal server error occurred.".to_string(),
            ),
            FormsError::AbilityNotFound(_) => (
                StatusCode::NOT_FOUND,
                "rest_ability_not_found",
                "Ability not found.".to_string(),
            ),
            FormsError::PermissionDenied { caller, .. } => {
                let status = match caller {
                    CallerContext::Public => StatusCode::UNAUTHORIZED,
                    CallerContext::Administrative => StatusCode::FORBIDDEN,
                };
                (
                    status,
                    "rest_forbidden",
                    "Sorry, you are not allowed to do that.".to_string(),
                )
            }
            FormsError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "rest_invalid_credentials",
                "The provided username or application password is incorrect.".to_string(),
            ),
            FormsError::InvalidInput { reason, .. } => (
                StatusCode::BAD_REQUEST,
                "rest_ability_invalid_input",
                format!("Ability has invalid input. Reason: {reason}"),
            ),
            FormsError::NoRoute => (
                StatusCode::NOT_FOUND,
                "rest_no_route",
                "No route was found matching the URL and request method.".to_string(),
            ),
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
            data: ApiErrorData {
                status: status.as_u16(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized REST error body, `{"code", "message", "data": {"status"}}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub data: ApiErrorData,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorData {
    pub status: u16,
}

/// Errors raised by the bridge process.
#[derive(Debug, ThisError)]
pub enum BridgeError {
    #[error("Missing required env var: {0}")]
    MissingEnv(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Non-success HTTP status from either path; `message` is what the
    /// upstream body reported.
    #[error("{context}: {message}")]
    Transport { context: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
