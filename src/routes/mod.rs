//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `notices`: 공지사항 목록/상세 + 관리자 CRUD
//! - `inquiries`: 문의 목록/상세/등록 + 관리자 답변
//! - `faqs`: FAQ 목록/상세 + 관리자 CRUD
//!
//! 모든 게시판 경로는 `/scopes/{scope}/...` 아래에 있으며,
//! `{scope}`는 `main`(사이트 전체) 또는 대회 ID입니다.

pub mod faqs;
pub mod health;
pub mod inquiries;
pub mod notices;

pub use faqs::*;
pub use health::*;
pub use inquiries::*;
pub use notices::*;

use crate::db::Stores;
use crate::error::AppError;
use crate::models::{Scope, ThreadMode};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 저장소는 `Arc<dyn RecordStore<_>>`이므로 clone해도 같은 저장소를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    /// 관리자 JWT 검증용 비밀키
    pub jwt_secret: String,
    /// `size` 파라미터가 없을 때의 페이지 크기
    pub default_page_size: u32,
    /// 공개 문의 목록의 스레드 모드
    pub inquiry_threads: ThreadMode,
}

/// 경로의 `{scope}` 세그먼트를 해석합니다.
pub(crate) fn scope_of(raw: &str) -> Result<Scope, AppError> {
    Scope::parse(raw)
}

/// 필수 텍스트 필드가 비어 있지 않은지 확인합니다.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} cannot be empty")));
    }
    Ok(())
}
