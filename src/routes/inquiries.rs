//! # 문의(Inquiry) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/scopes/{scope}/inquiries`                  → 공개 목록 (답변 행 포함)
//! - `POST   /api/v1/scopes/{scope}/inquiries`                  → 문의 등록
//! - `GET    /api/v1/scopes/{scope}/inquiries/{id}`             → 공개 상세 (비밀글은 관리자만)
//! - `GET    /api/v1/admin/scopes/{scope}/inquiries`            → 관리자 목록 (`threads` 선택)
//! - `GET    /api/v1/admin/scopes/{scope}/inquiries/{id}`       → 관리자 상세
//! - `DELETE /api/v1/admin/scopes/{scope}/inquiries/{id}`       → 삭제
//! - `PUT    /api/v1/admin/scopes/{scope}/inquiries/{id}/reply` → 답변 등록/교체
//! - `DELETE /api/v1/admin/scopes/{scope}/inquiries/{id}/reply` → 답변 삭제
//!
//! ## 비밀글
//! 공개 목록에서 비밀글은 제목/작성자/날짜만 보이고 본문·첨부·답변 본문은 비워집니다.
//! 상세는 유효한 관리자 Bearer 토큰이 있을 때만 열람할 수 있습니다 (없으면 403).

use super::{require_text, scope_of, AppState};
use crate::{
    db::Mutation,
    error::AppError,
    middleware::auth::{bearer_claims, AdminUser},
    models::*,
    services::{self, ListQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

/// `GET /scopes/{scope}/inquiries`: 공개 문의 목록
///
/// 스레드 모드는 서버 설정(`INQUIRY_THREADS`)을 따르며, 공개 API에서는 바꿀 수 없습니다.
pub async fn list_inquiries(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Inquiry>>>, AppError> {
    let scope = scope_of(&scope)?;
    let options = params.options()?;
    let page = params.page(state.default_page_size)?;

    let paged = ListQuery::new(state.stores.inquiries.clone())
        .query_threads(&scope, page, &options, state.inquiry_threads)
        .await?;
    let paged = Paged {
        rows: paged
            .rows
            .into_iter()
            .map(|Numbered { no, row }| Numbered {
                no,
                row: row.redacted(),
            })
            .collect(),
        total: paged.total,
    };
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

/// `POST /scopes/{scope}/inquiries`: 문의 등록
///
/// 제목/작성자/본문은 비어 있으면 안 됩니다.
pub async fn create_inquiry(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Json(req): Json<CreateInquiryRequest>,
) -> Result<(StatusCode, Json<Inquiry>), AppError> {
    let scope = scope_of(&scope)?;
    require_text("title", &req.title)?;
    require_text("author", &req.author)?;
    require_text("content", &req.content)?;

    let inquiry = state
        .stores
        .inquiries
        .mutate(&scope, Mutation::Insert(req.into_inquiry(services::today())))
        .await?
        .ok_or_else(|| AppError::Internal("Store returned no row for insert".to_string()))?;

    tracing::info!(%scope, id = %inquiry.id, secret = inquiry.secret, "Inquiry submitted");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// `GET /scopes/{scope}/inquiries/{id}`: 공개 문의 상세
///
/// 비밀글은 요청에 유효한 관리자 토큰이 있을 때만 보여줍니다. 열람하면 조회수가 오릅니다.
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<Inquiry>, AppError> {
    let scope = scope_of(&scope)?;
    let store = &state.stores.inquiries;

    let inquiry = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    if inquiry.secret && bearer_claims(&headers, &state.jwt_secret).is_err() {
        return Err(AppError::Forbidden(
            "This inquiry is only visible to its author and administrators".to_string(),
        ));
    }

    let touched = store
        .mutate(&scope, Mutation::Touch(inquiry.id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(touched))
}

/// `GET /admin/scopes/{scope}/inquiries`: 관리자 문의 목록
///
/// `threads=expand|pre-expanded|flat`로 답변 행 처리 방식을 고를 수 있습니다.
/// 관리자 목록은 비밀글도 가리지 않습니다.
pub async fn admin_list_inquiries(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Inquiry>>>, AppError> {
    let scope = scope_of(&scope)?;
    let options = params.options()?;
    let page = params.page(state.default_page_size)?;
    let mode = params.threads(state.inquiry_threads)?;

    let paged = ListQuery::new(state.stores.inquiries.clone())
        .query_threads(&scope, page, &options, mode)
        .await?;
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

pub async fn admin_get_inquiry(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Inquiry>, AppError> {
    let scope = scope_of(&scope)?;
    let inquiry = state
        .stores
        .inquiries
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(inquiry))
}

pub async fn admin_delete_inquiry(
    admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let scope = scope_of(&scope)?;
    state
        .stores
        .inquiries
        .mutate(&scope, Mutation::Delete(RowId(id)))
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(admin = %admin.admin_id, %scope, id, "Inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /admin/scopes/{scope}/inquiries/{id}/reply`: 답변 등록 또는 교체
///
/// 답변 날짜는 오늘로 기록되고, 질문의 `answered`가 true가 됩니다.
pub async fn admin_put_reply(
    admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<Inquiry>, AppError> {
    let scope = scope_of(&scope)?;
    require_text("content", &req.content)?;
    require_text("author", &req.author)?;

    let store = &state.stores.inquiries;
    let mut inquiry = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    if inquiry.is_reply() {
        return Err(AppError::BadRequest(
            "Replies can only be attached to questions".to_string(),
        ));
    }
    inquiry.set_answer(req.into_answer(services::today()));

    let updated = store
        .mutate(&scope, Mutation::Replace(inquiry))
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(admin = %admin.admin_id, %scope, id, "Inquiry answered");
    Ok(Json(updated))
}

/// `DELETE /admin/scopes/{scope}/inquiries/{id}/reply`: 답변 삭제
///
/// 답변이 없는 문의면 404입니다.
pub async fn admin_delete_reply(
    admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Inquiry>, AppError> {
    let scope = scope_of(&scope)?;
    let store = &state.stores.inquiries;
    let mut inquiry = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    if !inquiry.clear_answer() {
        return Err(AppError::NotFound);
    }

    let updated = store
        .mutate(&scope, Mutation::Replace(inquiry))
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(admin = %admin.admin_id, %scope, id, "Inquiry reply removed");
    Ok(Json(updated))
}
