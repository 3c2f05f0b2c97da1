use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failures of catalog operations. Everything except `Db` is an expected,
/// caller-triggerable condition.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("one or more actors not found")]
    InvalidReference { missing: Vec<i32> },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("validation failed")]
    ValidationFailed(Vec<String>),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl CatalogError {
    pub fn movie_not_found(id: &str) -> Self {
        Self::NotFound { entity: "movie", key: id.to_string() }
    }

    pub fn actor_not_found(id: i32) -> Self {
        Self::NotFound { entity: "actor", key: id.to_string() }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    errors: Vec<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: Vec::new() }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, message),
            CatalogError::Conflict(_) => Self::new(StatusCode::CONFLICT, message),
            CatalogError::InvalidReference { missing } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
                errors: missing.iter().map(|id| format!("actor {id} does not exist")).collect(),
            },
            CatalogError::InvalidArgument(_) => Self::new(StatusCode::BAD_REQUEST, message),
            CatalogError::ValidationFailed(errors) => {
                Self { status: StatusCode::BAD_REQUEST, message, errors }
            },
            CatalogError::Db(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        let body = ErrorBody { message: self.message, errors: self.errors };
        (self.status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
