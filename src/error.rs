//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 목록 조회 로직(services/)은 순수 함수이지만, 잘못된 페이지 파라미터처럼
//! 호출자 계약 위반은 `AppError::BadRequest`로 즉시 실패시킵니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 게시물을 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// 페이지 번호/크기 위반, 알 수 없는 카테고리 값, 빈 제목 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 비밀글 등 접근 권한이 없는 리소스 (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 원격 REST API 호출 실패
    /// `status`가 None이면 응답을 받지 못한 네트워크 오류입니다.
    #[error("Remote API error ({status:?}): {message}")]
    Remote { status: Option<u16>, message: String },

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 마이그레이션 실패 (HTTP 500)
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// 저장된 게시물 JSON을 읽거나 쓰지 못함 (HTTP 500)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// 원격 API가 404를 돌려준 경우인지 확인합니다.
    /// RemoteStore에서 "없음"을 `Ok(None)`으로 바꿀 때 사용합니다.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, AppError::Remote { status: Some(404), .. })
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Migrate, Json, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Remote {
                status: remote_status,
                ref message,
            } => {
                tracing::warn!("Remote API error ({:?}): {}", remote_status, message);
                // 원격 서버의 4xx는 그대로 전달하고, 그 외(5xx, 네트워크 오류)는 502로 바꿉니다.
                let status = remote_status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "remote_error", message.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Migrate(ref e) => {
                tracing::error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Json(ref e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_client_errors_keep_their_status() {
        let response = AppError::Remote {
            status: Some(409),
            message: "duplicate".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn remote_server_and_network_errors_become_bad_gateway() {
        let upstream = AppError::Remote {
            status: Some(503),
            message: "down".to_string(),
        }
        .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let network = AppError::Remote {
            status: None,
            message: "connection refused".to_string(),
        }
        .into_response();
        assert_eq!(network.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn only_remote_404_counts_as_missing() {
        assert!(AppError::Remote {
            status: Some(404),
            message: String::new()
        }
        .is_remote_not_found());
        assert!(!AppError::NotFound.is_remote_not_found());
    }
}
