//! Wordbook Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// 단어장 애플리케이션 에러
#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl VocabError {
    /// SQLite 기본키/UNIQUE 제약 위반 여부
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            VocabError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// HTTP 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    /// 실패한 작업 이름을 details에 기록
    pub fn during(mut self, operation: &str) -> Self {
        if self.details.is_none() {
            self.details = Some(operation.to_string());
        }
        self
    }
}

impl From<VocabError> for ApiError {
    fn from(error: VocabError) -> Self {
        let (status, code) = match &error {
            VocabError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
            VocabError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            VocabError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            VocabError::Duplicate(_) => (StatusCode::CONFLICT, "DUPLICATE"),
            VocabError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR"),
            VocabError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            VocabError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            VocabError::Lock(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LOCK_ERROR"),
        };

        ApiError {
            status,
            code: code.to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// 내부 작업 결과 타입
pub type VocabResult<T> = Result<T, VocabError>;

/// HTTP 핸들러 결과 타입
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let e = ApiError::from(VocabError::InvalidArgument("kind".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, "INVALID_ARGUMENT");

        let e = ApiError::from(VocabError::Provider("upstream 503".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        // 업스트림 메시지가 그대로 포함되어야 함
        assert!(e.message.contains("upstream 503"));
    }

    #[test]
    fn test_during_keeps_existing_details() {
        let mut e = ApiError::from(VocabError::Lock("poisoned".into()));
        e.details = Some("first".into());
        let e = e.during("second");
        assert_eq!(e.details.as_deref(), Some("first"));
    }
}
