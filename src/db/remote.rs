//! # 원격 REST API 저장소
//!
//! 게시물이 별도의 API 서버에 있을 때 사용하는 저장소입니다.
//!
//! - 읽기(목록/상세/조회수)는 사용자 서버(`USER_API_BASE_URL`)로 보냅니다.
//! - 쓰기(등록/수정/삭제)는 관리자 서버(`ADMIN_API_BASE_URL`)로 보내고
//!   `Authorization: Bearer <ADMIN_API_TOKEN>`을 붙입니다.
//!
//! ## 경로 규칙
//! ```text
//! main 스코프   → {base}/api/v1/{domain}
//! 대회 스코프   → {base}/api/v1/events/{eventId}/{domain}
//! 단건          → …/{id}
//! 조회수 증가   → POST …/{id}/views
//! ```
//!
//! 목록은 페이지 봉투(`PageEnvelope`)로 내려오므로 마지막 페이지까지 이어서 읽습니다.
//! 네트워크 오류와 5xx는 `max_attempts`까지 재시도하고, 4xx는 바로 실패합니다.
//! 재시도는 멱등 메서드(GET, DELETE)에만 적용됩니다. POST/PATCH는 서버가 이미
//! 반영했을 수 있으므로 한 번만 보냅니다 (등록 중복, 조회수 이중 증가 방지).

use super::{Mutation, RecordStore};
use crate::config::RemoteConfig;
use crate::error::AppError;
use crate::models::{PageEnvelope, Record, RowId, Scope};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;

/// 목록을 읽을 때 한 번에 요청하는 행 수
const FETCH_PAGE_SIZE: u32 = 100;
/// 잘못된 봉투로 무한히 페이지를 넘기지 않도록 하는 상한
const MAX_FETCH_PAGES: u64 = 1_000;

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    config: Arc<RemoteConfig>,
}

/// 요청을 보낼 서버
#[derive(Debug, Clone, Copy)]
enum Side {
    User,
    Admin,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            config: Arc::new(config),
        }
    }

    fn base(&self, side: Side) -> &str {
        match side {
            Side::User => &self.config.user_base_url,
            Side::Admin => &self.config.admin_base_url,
        }
    }

    fn collection_url(&self, side: Side, scope: &Scope, domain: &str) -> String {
        let base = self.base(side);
        match scope {
            Scope::Main => format!("{base}/api/v1/{domain}"),
            Scope::Event(event_id) => format!("{base}/api/v1/events/{event_id}/{domain}"),
        }
    }

    fn item_url(&self, side: Side, scope: &Scope, domain: &str, id: RowId) -> String {
        format!("{}/{id}", self.collection_url(side, scope, domain))
    }

    /// 관리자 서버 요청에 Bearer 토큰을 붙입니다.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 요청을 보내고, 멱등 메서드의 일시적인 실패는 선형 백오프로 재시도합니다.
    ///
    /// 성공(2xx) 응답만 `Ok`로 돌려주며, 그 외 상태는 `AppError::Remote`입니다.
    #[tracing::instrument(name = "remote_send", skip(self, build))]
    async fn send_with_retry<F>(
        &self,
        method: Method,
        url: &str,
        build: F,
    ) -> Result<Response, AppError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let max_attempts = if method.is_idempotent() {
            self.config.max_attempts.max(1)
        } else {
            1
        };
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match build(&self.client).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_client_error() || attempt >= max_attempts {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(AppError::Remote {
                            status: Some(status.as_u16()),
                            message: format!("{method} {url} failed with {status}: {body}"),
                        });
                    }
                    tracing::warn!(attempt, %status, "Remote call failed, retrying");
                }
                Err(e) => {
                    if attempt >= max_attempts {
                        return Err(AppError::Remote {
                            status: None,
                            message: format!("{method} {url} failed: {e}"),
                        });
                    }
                    tracing::warn!(attempt, error = %e, "Remote call failed, retrying");
                }
            }
            tokio::time::sleep(Duration::from_millis(
                self.config.backoff_ms.saturating_mul(u64::from(attempt)),
            ))
            .await;
        }
    }

    async fn fetch_one<T: Record>(&self, side: Side, url: &str) -> Result<Option<T>, AppError> {
        let result = self
            .send_with_retry(Method::GET, url, |client| {
                let request = client.get(url);
                match side {
                    Side::User => request,
                    Side::Admin => self.authorize(request),
                }
            })
            .await;
        match not_found_as_none(result)? {
            Some(resp) => Ok(Some(decode(resp).await?)),
            None => Ok(None),
        }
    }
}

/// 원격 404를 "행 없음"으로 바꿉니다.
fn not_found_as_none<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_remote_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, AppError> {
    let url = resp.url().to_string();
    resp.json::<T>().await.map_err(|e| AppError::Remote {
        status: None,
        message: format!("invalid response body from {url}: {e}"),
    })
}

#[async_trait]
impl<T: Record> RecordStore<T> for RemoteStore {
    async fn get_by_scope(&self, scope: &Scope) -> Result<Vec<T>, AppError> {
        let url = self.collection_url(Side::User, scope, T::DOMAIN);
        let mut rows = Vec::new();
        let mut page: u64 = 0;

        loop {
            let result = self
                .send_with_retry(Method::GET, &url, |client| {
                    client
                        .get(&url)
                        .query(&[("page", page.to_string()), ("size", FETCH_PAGE_SIZE.to_string())])
                })
                .await;
            // 게시물이 한 번도 등록되지 않은 대회는 원격 서버가 404를 줄 수 있음
            let Some(resp) = not_found_as_none(result)? else {
                break;
            };
            let envelope: PageEnvelope<T> = decode(resp).await?;
            let done = envelope.last
                || envelope.content.is_empty()
                || page + 1 >= envelope.total_pages;
            rows.extend(envelope.content);
            page += 1;
            if done {
                break;
            }
            if page >= MAX_FETCH_PAGES {
                tracing::warn!(%url, "Stopped paging after {} pages", MAX_FETCH_PAGES);
                break;
            }
        }

        tracing::debug!(%scope, domain = T::DOMAIN, rows = rows.len(), "Fetched remote rows");
        Ok(rows)
    }

    async fn get(&self, scope: &Scope, id: RowId) -> Result<Option<T>, AppError> {
        let url = self.item_url(Side::User, scope, T::DOMAIN, id);
        self.fetch_one(Side::User, &url).await
    }

    async fn mutate(&self, scope: &Scope, mutation: Mutation<T>) -> Result<Option<T>, AppError> {
        match mutation {
            Mutation::Insert(row) => {
                let url = self.collection_url(Side::Admin, scope, T::DOMAIN);
                let resp = self
                    .send_with_retry(Method::POST, &url, |client| {
                        self.authorize(client.post(&url).json(&row))
                    })
                    .await?;
                Ok(Some(decode(resp).await?))
            }
            Mutation::Replace(row) => {
                let url = self.item_url(Side::Admin, scope, T::DOMAIN, row.id());
                let result = self
                    .send_with_retry(Method::PATCH, &url, |client| {
                        self.authorize(client.patch(&url).json(&row))
                    })
                    .await;
                match not_found_as_none(result)? {
                    Some(resp) => Ok(Some(decode(resp).await?)),
                    None => Ok(None),
                }
            }
            Mutation::Delete(id) => {
                let url = self.item_url(Side::Admin, scope, T::DOMAIN, id);
                let Some(existing) = self.fetch_one::<T>(Side::Admin, &url).await? else {
                    return Ok(None);
                };
                let result = self
                    .send_with_retry(Method::DELETE, &url, |client| self.authorize(client.delete(&url)))
                    .await;
                Ok(not_found_as_none(result)?.map(|_| existing))
            }
            Mutation::Touch(id) => {
                let url = format!("{}/views", self.item_url(Side::User, scope, T::DOMAIN, id));
                let result = self
                    .send_with_retry(Method::POST, &url, |client| client.post(&url))
                    .await;
                match not_found_as_none(result)? {
                    Some(resp) => Ok(Some(decode(resp).await?)),
                    None => Ok(None),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Notice, Page, Paged};
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 원격 API 흉내: main 스코프의 공지만 다룹니다.
    #[derive(Clone, Default)]
    struct Mock {
        rows: Arc<Mutex<Vec<Notice>>>,
        list_calls: Arc<AtomicUsize>,
        /// 남은 횟수만큼 목록 요청에 503을 돌려줌
        fail_next: Arc<AtomicUsize>,
        tokens: Arc<Mutex<Vec<String>>>,
        create_calls: Arc<AtomicUsize>,
        /// 남은 횟수만큼 등록을 반영한 뒤 503을 돌려줌
        commit_then_fail: Arc<AtomicUsize>,
    }

    fn notice(id: i64, title: &str) -> Notice {
        Notice {
            id: RowId(id),
            category: Category::Notice,
            title: title.to_string(),
            author: "사무국".to_string(),
            date: "2025-08-01".to_string(),
            views: 0,
            visibility: None,
            pinned: false,
            content: String::new(),
            files: Vec::new(),
        }
    }

    async fn list(
        State(mock): State<Mock>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Result<Json<PageEnvelope<Notice>>, StatusCode> {
        mock.list_calls.fetch_add(1, Ordering::SeqCst);
        if mock
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        let number: i64 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
        let size: i64 = q.get("size").and_then(|s| s.parse().ok()).unwrap_or(100);
        let rows = mock.rows.lock().unwrap().clone();
        let total = rows.len();
        let page = Page::new(number + 1, size).unwrap();
        let window = rows.into_iter().skip(page.offset()).take(size as usize).collect();
        Ok(Json(PageEnvelope::from_paged(Paged { rows: window, total }, page)))
    }

    async fn create(
        State(mock): State<Mock>,
        headers: HeaderMap,
        Json(mut row): Json<Notice>,
    ) -> Result<Json<Notice>, StatusCode> {
        mock.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            mock.tokens.lock().unwrap().push(auth.to_string());
        }
        {
            let mut rows = mock.rows.lock().unwrap();
            row.id = RowId(rows.len() as i64 + 1);
            rows.push(row.clone());
        }
        if mock
            .commit_then_fail
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        Ok(Json(row))
    }

    async fn item(
        State(mock): State<Mock>,
        Path(id): Path<i64>,
    ) -> Result<Json<Notice>, StatusCode> {
        let rows = mock.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.id.0 == id)
            .cloned()
            .map(Json)
            .ok_or(StatusCode::NOT_FOUND)
    }

    async fn remove(State(mock): State<Mock>, Path(id): Path<i64>) -> StatusCode {
        mock.rows.lock().unwrap().retain(|r| r.id.0 != id);
        StatusCode::NO_CONTENT
    }

    async fn views(
        State(mock): State<Mock>,
        Path(id): Path<i64>,
    ) -> Result<Json<Notice>, StatusCode> {
        let mut rows = mock.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id.0 == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        row.views += 1;
        Ok(Json(row.clone()))
    }

    async fn bad_request() -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    async fn spawn(mock: Mock) -> String {
        let app = Router::new()
            .route("/api/v1/notices", get(list).post(create))
            .route("/api/v1/notices/{id}", get(item).delete(remove))
            .route("/api/v1/notices/{id}/views", post(views))
            .route("/api/v1/events/{event}/notices", get(bad_request))
            .with_state(mock);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn store(base: &str, max_attempts: u32) -> RemoteStore {
        RemoteStore::new(RemoteConfig {
            user_base_url: base.to_string(),
            admin_base_url: base.to_string(),
            admin_token: Some("admin-token".to_string()),
            max_attempts,
            backoff_ms: 1,
        })
    }

    #[tokio::test]
    async fn reads_walk_every_envelope_page() {
        let mock = Mock::default();
        *mock.rows.lock().unwrap() = (1..=250).map(|i| notice(i, &format!("공지 {i}"))).collect();
        let base = spawn(mock.clone()).await;

        let rows: Vec<Notice> = store(&base, 3).get_by_scope(&Scope::Main).await.unwrap();
        assert_eq!(rows.len(), 250);
        assert_eq!(rows[249].id, RowId(250));
        assert_eq!(mock.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let mock = Mock::default();
        mock.rows.lock().unwrap().push(notice(1, "a"));
        mock.fail_next.store(2, Ordering::SeqCst);
        let base = spawn(mock.clone()).await;

        let rows: Vec<Notice> = store(&base, 3).get_by_scope(&Scope::Main).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(mock.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_give_up_after_max_attempts() {
        let mock = Mock::default();
        mock.fail_next.store(10, Ordering::SeqCst);
        let base = spawn(mock.clone()).await;

        let err = RecordStore::<Notice>::get_by_scope(&store(&base, 2), &Scope::Main)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Remote { status: Some(503), .. }));
        assert_eq!(mock.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let base = spawn(Mock::default()).await;
        let err = RecordStore::<Notice>::get_by_scope(
            &store(&base, 5),
            &Scope::Event("2025-seoul".to_string()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Remote { status: Some(400), .. }));
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let base = spawn(Mock::default()).await;
        let remote = store(&base, 3);
        let row: Option<Notice> = remote.get(&Scope::Main, RowId(9)).await.unwrap();
        assert!(row.is_none());
        let touched = RecordStore::<Notice>::mutate(&remote, &Scope::Main, Mutation::Touch(RowId(9)))
            .await
            .unwrap();
        assert!(touched.is_none());
    }

    #[tokio::test]
    async fn writes_go_to_admin_with_bearer_token() {
        let mock = Mock::default();
        let base = spawn(mock.clone()).await;
        let remote = store(&base, 3);

        let created = remote
            .mutate(&Scope::Main, Mutation::Insert(notice(0, "새 공지")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, RowId(1));
        assert_eq!(
            *mock.tokens.lock().unwrap(),
            vec!["Bearer admin-token".to_string()]
        );

        let touched: Notice = remote
            .mutate(&Scope::Main, Mutation::Touch(RowId(1)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(touched.views, 1);

        let removed: Option<Notice> = remote
            .mutate(&Scope::Main, Mutation::Delete(RowId(1)))
            .await
            .unwrap();
        assert_eq!(removed.map(|n| n.title), Some("새 공지".to_string()));
        assert!(mock.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_inserts_are_not_resent() {
        let mock = Mock::default();
        mock.commit_then_fail.store(1, Ordering::SeqCst);
        let base = spawn(mock.clone()).await;

        let err = store(&base, 5)
            .mutate(&Scope::Main, Mutation::Insert(notice(0, "중복 금지")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Remote { status: Some(503), .. }));
        assert_eq!(mock.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn paths_follow_scope() {
        let remote = store("https://api.example.com", 1);
        assert_eq!(
            remote.collection_url(Side::User, &Scope::Main, "faqs"),
            "https://api.example.com/api/v1/faqs"
        );
        assert_eq!(
            remote.item_url(Side::Admin, &Scope::Event("12".to_string()), "notices", RowId(3)),
            "https://api.example.com/api/v1/events/12/notices/3"
        );
    }
}
