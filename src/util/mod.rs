use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::DatabaseError;
use crate::util::image::ImageError;

pub mod config;
pub mod extract;
pub mod image;
pub mod log;
pub mod logging;
pub mod middleware;

/// 5xx 错误写入主日志，不能与访问日志 target 相同
const ERROR_TARGET: &str = "server.http";

/// 接口层错误，响应体为 `{"detail": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    StoreUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServerError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ServerError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::StoreUnavailable(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(target: ERROR_TARGET, status = status.as_u16(), error = %self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(DatabaseError::Unavailable(reason)) = err.downcast_ref::<DatabaseError>() {
            return ServerError::StoreUnavailable(format!("Database unavailable: {}", reason));
        }
        ServerError::Internal(format!("{:#}", err))
    }
}

impl From<ImageError> for ServerError {
    fn from(err: ImageError) -> Self {
        ServerError::Validation(err.to_string())
    }
}
