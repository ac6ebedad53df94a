//! # 공지사항(Notice) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/scopes/{scope}/notices`            → 공개 목록 (공개 글만)
//! - `GET    /api/v1/scopes/{scope}/notices/{id}`       → 공개 상세 (조회수 +1)
//! - `GET    /api/v1/admin/scopes/{scope}/notices`      → 관리자 목록 (비공개 포함)
//! - `POST   /api/v1/admin/scopes/{scope}/notices`      → 등록
//! - `GET    /api/v1/admin/scopes/{scope}/notices/{id}` → 관리자 상세 (조회수 변화 없음)
//! - `PATCH  /api/v1/admin/scopes/{scope}/notices/{id}` → 부분 수정
//! - `DELETE /api/v1/admin/scopes/{scope}/notices/{id}` → 삭제
//!
//! 목록 응답은 `PageEnvelope<Numbered<Notice>>`입니다. 고정 공지는 정렬과 관계없이 맨 위에 오고
//! 번호(`no`)가 null입니다.

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

/// `GET /scopes/{scope}/notices`: 공개 공지 목록
///
/// 공개 화면에서는 `visibility`가 항상 `open`입니다.
/// 비공개 글을 요청(`visibility=closed`)하면 400으로 거절합니다.
pub async fn list_notices(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Notice>>>, AppError> {
    let scope = scope_of(&scope)?;
    let mut options = params.options()?;
    if options.visibility == Some(Visibility::Closed) {
        return Err(AppError::BadRequest(
            "Closed notices are only listed on the admin API".to_string(),
        ));
    }
    options.visibility = Some(Visibility::Open);
    let page = params.page(state.default_page_size)?;

    let paged = ListQuery::new(state.stores.notices.clone())
        .query(&scope, page, &options)
        .await?;
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

/// `GET /scopes/{scope}/notices/{id}`: 공개 공지 상세
///
/// 읽을 때마다 조회수가 1 올라갑니다. 비공개 공지는 없는 글처럼 404입니다.
pub async fn get_notice(
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Notice>, AppError> {
    let scope = scope_of(&scope)?;
    let store = &state.stores.notices;

    let notice = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    if notice.visibility == Some(Visibility::Closed) {
        return Err(AppError::NotFound);
    }

    let touched = store
        .mutate(&scope, Mutation::Touch(notice.id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(touched))
}

/// `GET /admin/scopes/{scope}/notices`: 관리자 공지 목록
///
/// `visibility`를 지정하지 않으면 공개/비공개를 모두 보여줍니다.
pub async fn admin_list_notices(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PageEnvelope<Numbered<Notice>>>, AppError> {
    let scope = scope_of(&scope)?;
    let options = params.options()?;
    let page = params.page(state.default_page_size)?;

    let paged = ListQuery::new(state.stores.notices.clone())
        .query(&scope, page, &options)
        .await?;
    Ok(Json(PageEnvelope::from_paged(paged, page)))
}

/// `POST /admin/scopes/{scope}/notices`: 공지 등록
///
/// 작성일은 오늘(한국 시간), ID는 저장소가 부여합니다.
pub async fn admin_create_notice(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Json(req): Json<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<Notice>), AppError> {
    let scope = scope_of(&scope)?;
    require_text("title", &req.title)?;
    require_text("author", &req.author)?;

    let notice = state
        .stores
        .notices
        .mutate(&scope, Mutation::Insert(req.into_notice(services::today())))
        .await?
        .ok_or_else(|| AppError::Internal("Store returned no row for insert".to_string()))?;

    tracing::info!(admin = %admin.admin_id, %scope, id = %notice.id, "Notice created");
    Ok((StatusCode::CREATED, Json(notice)))
}

/// `GET /admin/scopes/{scope}/notices/{id}`: 관리자 상세 (조회수를 올리지 않음)
pub async fn admin_get_notice(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<Json<Notice>, AppError> {
    let scope = scope_of(&scope)?;
    let notice = state
        .stores
        .notices
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(notice))
}

/// `PATCH /admin/scopes/{scope}/notices/{id}`: 공지 부분 수정
///
/// 요청에 포함된 필드만 바꿉니다. `"visibility": null`은 공개 여부 값을 지웁니다.
pub async fn admin_update_notice(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
    Json(req): Json<UpdateNoticeRequest>,
) -> Result<Json<Notice>, AppError> {
    let scope = scope_of(&scope)?;
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }

    let store = &state.stores.notices;
    let mut notice = store
        .get(&scope, RowId(id))
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut notice);

    let updated = store
        .mutate(&scope, Mutation::Replace(notice))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}

/// `DELETE /admin/scopes/{scope}/notices/{id}`: 공지 삭제 (성공 시 204)
pub async fn admin_delete_notice(
    admin: AdminUser,
    State(state): State<AppState>,
    Path((scope, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let scope = scope_of(&scope)?;
    state
        .stores
        .notices
        .mutate(&scope, Mutation::Delete(RowId(id)))
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(admin = %admin.admin_id, %scope, id, "Notice deleted");
    Ok(StatusCode::NO_CONTENT)
}
