//! # FAQ 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/scopes/{scope}/faqs`            → 공개 목록
//! - `GET    /api/v1/scopes/{scope}/faqs/{id}`       → 공개 상세 (조회수 +1)
//! - `GET    /api/v1/admin/scopes/{scope}/faqs`      → 관리자 목록
//! - `POST   /api/v1/admin/scopes/{scope}/faqs`      → 등록
//! - `GET    /api/v1/admin/scopes/{scope}/faqs/{id}` → 관리자 상세
//! - `PATCH  /api/v1/admin/scopes/{scope}/faqs/{id}` → 부분 수정
//! - `DELETE /api/v1/admin/scopes/{scope}/faqs/{id}` → 삭제

use super::{require_text, scope_of, AppState};
use crate::{
    db::Mutation,
    error::AppError,
    middleware::auth::AdminUser,
    models::*,
    services::{self, ListQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// `GET /scopes/{scope}/faqs`: 공개 FAQ 목록
///
/// 공개 화면은 `visibility` 파라미터와 관계없이 공개 FAQ만 보여줍니다.
pub async fn list_faqs(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Faq>>>, AppError> {
    let scope = scope_of(&scope)?;
    let options = ListOptions {
        visibility: Some(Visibility::Open),
        ..params.options()?
    };
    let page = params.page(state.default_page_size)?;

    let paged = ListQuery::new(state.stores.faqs.clone())
        .query(&scope, page, &options)
        .await?;
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

/// `GET /scopes/{scope}/faqs/{id}`: 공개 FAQ 상세
pub async fn get_faq(
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Faq>, AppError> {
    let scope = scope_of(&scope)?;
    let store = &state.stores.faqs;

    let faq = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    if faq.visibility == Some(Visibility::Closed) {
        return Err(AppError::NotFound);
    }

    let touched = store
        .mutate(&scope, Mutation::Touch(faq.id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(touched))
}

pub async fn admin_list_faqs(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Faq>>>, AppError> {
    let scope = scope_of(&scope)?;
    let options = params.options()?;
    let page = params.page(state.default_page_size)?;

    let paged = ListQuery::new(state.stores.faqs.clone())
        .query(&scope, page, &options)
        .await?;
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

pub async fn admin_create_faq(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Json(req): Json<CreateFaqRequest>,
) -> Result<(StatusCode, Json<Faq>), AppError> {
    let scope = scope_of(&scope)?;
    require_text("title", &req.title)?;
    require_text("author", &req.author)?;
    require_text("content", &req.content)?;

    let faq = state
        .stores
        .faqs
        .mutate(&scope, Mutation::Insert(req.into_faq(services::today())))
        .await?
        .ok_or_else(|| AppError::Internal("Store returned no row for insert".to_string()))?;

    tracing::info!(admin = %admin.admin_id, %scope, id = %faq.id, "FAQ created");
    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn admin_get_faq(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Faq>, AppError> {
    let scope = scope_of(&scope)?;
    let faq = state
        .stores
        .faqs
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(faq))
}

pub async fn admin_update_faq(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
    Json(req): Json<UpdateFaqRequest>,
) -> Result<Json<Faq>, AppError> {
    let scope = scope_of(&scope)?;
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }

    let store = &state.stores.faqs;
    let mut faq = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut faq);

    let updated = store
        .mutate(&scope, Mutation::Replace(faq))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}

pub async fn admin_delete_faq(
    admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let scope = scope_of(&scope)?;
    state
        .stores
        .faqs
        .mutate(&scope, Mutation::Delete(RowId(id)))
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(admin = %admin.admin_id, %scope, id, "FAQ deleted");
    Ok(StatusCode::NO_CONTENT)
}
