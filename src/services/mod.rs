//! # 목록 로직 모듈
//!
//! 저장소와 HTTP 계층 사이에서 목록 화면의 규칙을 담당합니다.
//! - `collation`: 한국어 제목 비교
//! - `listing`: 필터/정렬, 페이지 자르기
//! - `threads`: 문의 답변 행 확장
//! - `query`: 위 단계를 묶은 조회 파사드

pub mod collation;
pub mod listing;
pub mod query;
pub mod threads;

pub use query::ListQuery;

use chrono::{FixedOffset, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// 한국 표준시(UTC+9) 기준 오늘 날짜 (`YYYY-MM-DD`)
///
/// 게시물 작성일은 서버 위치와 관계없이 한국 날짜로 기록합니다.
pub fn today() -> String {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => Utc::now().with_timezone(&kst).format("%Y-%m-%d").to_string(),
        None => Utc::now().format("%Y-%m-%d").to_string(),
    }
}
