//! # 게시물 저장소 계층 (Record Store)
//!
//! 목록 로직(services/)이 게시물 행을 어디서 가져오는지 감추는 계층입니다.
//! 라우트 핸들러와 조회 파사드는 [`RecordStore`] 트레이트만 알고,
//! 실제 저장 위치는 설정(`STORE_BACKEND`)에 따라 아래 중 하나로 정해집니다.
//!
//! - `memory`: 프로세스 메모리 (테스트, 프론트엔드 데모)
//! - `sqlite`: 로컬 SQLite 파일 (`records` 테이블 하나에 JSON 본문 저장)
//! - `remote`: 원격 REST API (사용자 서버에서 읽고 관리자 서버로 쓰기)

pub mod memory;
pub mod remote;
pub mod sqlite;

pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use sqlite::SqliteStore;

use crate::config::RemoteConfig;
use crate::error::AppError;
use crate::models::{Faq, Inquiry, Notice, Record, RowId, Scope};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// 저장소에 요청하는 변경 작업
#[derive(Debug, Clone)]
pub enum Mutation<T> {
    /// 새 행 추가. 행의 `id`는 무시되고 스코프 안의 `최대 ID + 1`이 부여됩니다.
    Insert(T),
    /// 같은 ID의 행을 통째로 교체
    Replace(T),
    /// 행 삭제
    Delete(RowId),
    /// 조회수 1 증가
    Touch(RowId),
}

/// 스코프 단위로 게시물 행을 읽고 쓰는 저장소
///
/// - 알 수 없는 스코프는 에러가 아니라 빈 목록입니다.
/// - `get_by_scope`는 저장(등록) 순서를 유지합니다. 정렬은 services가 합니다.
/// - `mutate`는 대상 행이 없으면 `Ok(None)`을 돌려줍니다.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    async fn get_by_scope(&self, scope: &Scope) -> Result<Vec<T>, AppError>;

    async fn get(&self, scope: &Scope, id: RowId) -> Result<Option<T>, AppError>;

    async fn mutate(&self, scope: &Scope, mutation: Mutation<T>) -> Result<Option<T>, AppError>;
}

/// 세 게시판 저장소 묶음. `AppState`에 담겨 모든 핸들러가 공유합니다.
#[derive(Clone)]
pub struct Stores {
    pub notices: Arc<dyn RecordStore<Notice>>,
    pub inquiries: Arc<dyn RecordStore<Inquiry>>,
    pub faqs: Arc<dyn RecordStore<Faq>>,
}

impl Stores {
    pub fn memory() -> Self {
        Self {
            notices: Arc::new(MemoryStore::<Notice>::new()),
            inquiries: Arc::new(MemoryStore::<Inquiry>::new()),
            faqs: Arc::new(MemoryStore::<Faq>::new()),
        }
    }

    /// 마이그레이션이 끝난 풀을 받아 SQLite 저장소를 만듭니다.
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            notices: Arc::new(SqliteStore::<Notice>::new(pool.clone())),
            inquiries: Arc::new(SqliteStore::<Inquiry>::new(pool.clone())),
            faqs: Arc::new(SqliteStore::<Faq>::new(pool)),
        }
    }

    pub fn remote(config: &RemoteConfig) -> Self {
        let store = RemoteStore::new(config.clone());
        Self {
            notices: Arc::new(store.clone()),
            inquiries: Arc::new(store.clone()),
            faqs: Arc::new(store),
        }
    }
}
