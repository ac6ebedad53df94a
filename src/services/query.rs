//! # 목록 조회 파사드
//!
//! 저장소에서 스코프의 행을 읽어 필터/정렬/번호 매기기/페이지네이션을 한 번에 수행합니다.
//! 화면(라우트 핸들러)은 이 타입 하나만 호출하면 됩니다.

use crate::db::RecordStore;
use crate::error::AppError;
use crate::models::{Inquiry, ListOptions, Numbered, Page, Paged, Record, Scope, ThreadMode};
use crate::services::listing::{filter_and_sort, number_rows, paginate};
use crate::services::threads;
use std::sync::Arc;

pub struct ListQuery<T: Record> {
    store: Arc<dyn RecordStore<T>>,
}

impl<T: Record> ListQuery<T> {
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self { store }
    }

    /// 한 페이지를 조회합니다.
    ///
    /// 행이 없는 스코프는 `{ rows: [], total: 0 }`입니다.
    /// 표시 번호는 필터가 적용된 전체 목록 기준으로 매겨집니다.
    /// 저장소 오류는 그대로 전달되며, 이 함수는 재시도하지 않습니다.
    pub async fn query(
        &self,
        scope: &Scope,
        page: Page,
        options: &ListOptions,
    ) -> Result<Paged<Numbered<T>>, AppError> {
        let rows = self.store.get_by_scope(scope).await?;
        let paged = paginate(number_rows(filter_and_sort(&rows, options)), page);
        tracing::debug!(
            %scope,
            domain = T::DOMAIN,
            page = page.number(),
            total = paged.total,
            "List query"
        );
        Ok(paged)
    }
}

impl ListQuery<Inquiry> {
    /// 문의 목록을 조회합니다. 답변 행 처리 방식은 `mode`로 명시합니다.
    ///
    /// 필터와 정렬은 항상 질문 행에만 적용하고, 답변 행은 부모 질문 바로 뒤에 둡니다.
    /// `Expand`/`PreExpanded`에서는 답변 행도 `total`과 페이지 크기에 포함됩니다.
    pub async fn query_threads(
        &self,
        scope: &Scope,
        page: Page,
        options: &ListOptions,
        mode: ThreadMode,
    ) -> Result<Paged<Numbered<Inquiry>>, AppError> {
        let rows = self.store.get_by_scope(scope).await?;
        let (questions, replies) = threads::detach_replies(rows);
        let questions = filter_and_sort(&questions, options);

        let rows = match mode {
            // 저장된 답변 행은 버리고 질문의 answer로 다시 만듦
            ThreadMode::Expand => threads::expand(questions),
            ThreadMode::PreExpanded => threads::reattach(questions, replies),
            ThreadMode::Flat => questions,
        };

        let paged = paginate(number_rows(rows), page);
        tracing::debug!(
            %scope,
            ?mode,
            page = page.number(),
            total = paged.total,
            "Inquiry list query"
        );
        Ok(paged)
    }
}
