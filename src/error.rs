use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// 持久化协作方拒绝或不可用，可由操作员重试
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// 是否属于可由操作员自行修正的错误
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_) | AppError::NotFound(_) | AppError::Conflict(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StoreError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 用户可修正的错误只记 warn
        if self.is_user_correctable() {
            log::warn!("{self}");
        } else {
            log::error!("{self}");
        }

        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::StoreError(_) => ("STORE_ERROR", "Save failed, please retry".to_string()),
            AppError::ConfigError(_) => ("CONFIG_ERROR", "Server misconfigured".to_string()),
            _ => ("INTERNAL_ERROR", "Internal server error".to_string()),
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::error(error_code.to_string(), message))
    }
}
