//! # 데이터 모델 모듈
//!
//! 게시판에서 사용하는 데이터 구조체들을 정의합니다.
//! - `scope`: 게시물 파티션 키(`main` / 대회별)와 행 ID
//! - `notice`: 공지사항
//! - `inquiry`: 문의(질문 + 답변)
//! - `faq`: 자주 묻는 질문
//! - `listing`: 목록 조회 옵션, 페이지, 페이지 결과, 원격 API 봉투(envelope)
//!
//! 세 게시물 종류는 모두 [`Record`] 트레이트를 구현하므로
//! 저장소(db/)와 목록 로직(services/)은 종류와 무관하게 한 번만 작성됩니다.

pub mod faq;
pub mod inquiry;
pub mod listing;
pub mod notice;
pub mod scope;

pub use faq::*;
pub use inquiry::*;
pub use listing::*;
pub use notice::*;
pub use scope::*;

use serde::{de::DeserializeOwned, Serialize};

/// 목록 화면에 표시되는 게시물 한 행이 갖춰야 할 공통 동작
///
/// 필터/정렬 엔진은 이 트레이트의 접근자만 사용합니다.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// 저장소 안에서 게시물 종류를 구분하는 이름 (원격 API 경로에도 쓰임)
    const DOMAIN: &'static str;

    fn id(&self) -> RowId;

    /// 저장소가 새 행에 ID를 부여할 때 호출합니다.
    fn set_id(&mut self, id: RowId);

    fn title(&self) -> &str;

    /// `YYYY-MM-DD` 또는 `YYYY.MM.DD` 문자열 (사전순 비교 가능)
    fn date(&self) -> &str;

    fn views(&self) -> u64;

    /// 조회수 1 증가
    fn touch(&mut self);

    fn category(&self) -> Option<Category> {
        None
    }

    fn visibility(&self) -> Option<Visibility> {
        None
    }

    /// 상단 고정 여부. 고정 행은 정렬 기준과 관계없이 목록 맨 위에 옵니다.
    fn pinned(&self) -> bool {
        false
    }

    /// 화면 표시 번호를 받는 행인지 여부 (고정 행은 번호 없음)
    fn numbered(&self) -> bool {
        !self.pinned()
    }

    /// 검색어(`q`)와 대조할 필드들
    fn search_fields(&self) -> Vec<&str>;
}
