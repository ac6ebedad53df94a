//! HTTP 통합 테스트
//!
//! 메모리 저장소로 실제 서버를 `127.0.0.1:0`에 띄우고 reqwest로 호출합니다.

use std::path::Path;

use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::create_router;
use crate::db::Stores;
use crate::middleware::auth::issue_test_token;
use crate::models::ThreadMode;
use crate::routes::AppState;

const SECRET: &str = "test-secret";

struct TestServer {
    client: Client,
    base_url: String,
    token: String,
}

impl TestServer {
    async fn new() -> Self {
        let state = AppState {
            stores: Stores::memory(),
            jwt_secret: SECRET.to_string(),
            default_page_size: 10,
            inquiry_threads: ThreadMode::Expand,
        };
        let app = create_router(state, Path::new("does-not-exist"));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            client: Client::new(),
            base_url: format!("http://{addr}/api/v1"),
            token: issue_test_token("admin", SECRET, Duration::minutes(15)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn admin_get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(&format!("/admin{path}")))
            .bearer_auth(&self.token)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn admin_send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self
            .client
            .request(method, self.url(&format!("/admin{path}")))
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let resp = request.send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn create_notice(&self, scope: &str, body: Value) -> Value {
        let (status, notice) = self
            .admin_send(
                reqwest::Method::POST,
                &format!("/scopes/{scope}/notices"),
                Some(body),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        notice
    }
}

fn titles(envelope: &Value) -> Vec<String> {
    envelope["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_scope_lists_empty_page() {
    let server = TestServer::new().await;
    let (status, body) = server.get("/scopes/999/notices?page=1&size=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], json!([]));
    assert_eq!(body["totalElements"], 0);
    assert_eq!(body["empty"], true);
}

#[tokio::test]
async fn test_invalid_page_parameters_are_rejected() {
    let server = TestServer::new().await;
    let (status, body) = server.get("/scopes/main/faqs?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, _) = server.get("/scopes/main/faqs?size=-3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/scopes/main/notices?category=party").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 알 수 없는 키와 정렬 값은 무시
    let (status, _) = server.get("/scopes/main/notices?sort=popular&utm=x").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let server = TestServer::new().await;
    let resp = server
        .client
        .post(server.url("/admin/scopes/main/notices"))
        .json(&json!({ "category": "notice", "title": "t", "author": "a", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "missing_token");

    let resp = server
        .client
        .get(server.url("/admin/scopes/main/notices"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notice_lifecycle() {
    let server = TestServer::new().await;
    server
        .create_notice(
            "main",
            json!({ "category": "notice", "title": "행사 안내", "author": "사무국", "content": "본문", "pinned": true }),
        )
        .await;
    server
        .create_notice(
            "main",
            json!({ "category": "match", "title": "코스 변경", "author": "사무국", "content": "본문" }),
        )
        .await;
    let hidden = server
        .create_notice(
            "main",
            json!({ "category": "event", "title": "내부 메모", "author": "사무국", "content": "본문", "visibility": "closed" }),
        )
        .await;
    assert_eq!(hidden["id"], 3);

    // 공개 목록: 비공개 글 제외, 고정 공지는 가나다순과 관계없이 맨 위에 번호 없이
    let (status, list) = server.get("/scopes/main/notices?sort=name").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["행사 안내", "코스 변경"]);
    assert_eq!(list["totalElements"], 2);
    assert_eq!(list["content"][0]["no"], Value::Null);
    assert_eq!(list["content"][1]["no"], 1);

    let (status, _) = server.get("/scopes/main/notices?visibility=closed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, filtered) = server.get("/scopes/main/notices?kind=match").await;
    assert_eq!(titles(&filtered), vec!["코스 변경"]);
    let (status, body) = server.get("/scopes/main/notices?kind=match&category=event").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());

    // 상세는 조회수를 올리고, 비공개 글은 404
    let (_, first) = server.get("/scopes/main/notices/2").await;
    assert_eq!(first["views"], 1);
    let (_, second) = server.get("/scopes/main/notices/2").await;
    assert_eq!(second["views"], 2);
    let (status, _) = server.get("/scopes/main/notices/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 관리자는 비공개 글도 봄
    let (_, admin_list) = server.admin_get("/scopes/main/notices").await;
    assert_eq!(admin_list["totalElements"], 3);

    // 공개로 전환하면 공개 목록에 나타남
    let (status, updated) = server
        .admin_send(
            reqwest::Method::PATCH,
            "/scopes/main/notices/3",
            Some(json!({ "visibility": null, "title": "운영 메모" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "운영 메모");
    let (_, list) = server.get("/scopes/main/notices?q=메모").await;
    assert_eq!(titles(&list), vec!["운영 메모"]);

    let (status, _) = server
        .admin_send(reqwest::Method::DELETE, "/scopes/main/notices/3", None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = server.admin_get("/scopes/main/notices/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scopes_are_isolated() {
    let server = TestServer::new().await;
    server
        .create_notice(
            "2025-seoul",
            json!({ "category": "event", "title": "서울 대회 공지", "author": "사무국", "content": "본문" }),
        )
        .await;

    let (_, main) = server.get("/scopes/main/notices").await;
    assert_eq!(main["totalElements"], 0);
    let (_, event) = server.get("/scopes/2025-seoul/notices").await;
    assert_eq!(titles(&event), vec!["서울 대회 공지"]);
    assert_eq!(event["content"][0]["id"], 1);
}

#[tokio::test]
async fn test_notice_pagination_envelope() {
    let server = TestServer::new().await;
    for i in 1..=25 {
        server
            .create_notice(
                "main",
                json!({ "category": "notice", "title": format!("공지 {i:02}"), "author": "사무국", "content": "본문" }),
            )
            .await;
    }

    let (_, page) = server.get("/scopes/main/notices?page=3&size=10&sort=name").await;
    assert_eq!(page["totalElements"], 25);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["number"], 2);
    assert_eq!(page["numberOfElements"], 5);
    assert_eq!(page["last"], true);
    assert_eq!(titles(&page)[0], "공지 21");
    assert_eq!(page["content"][0]["no"], 5);
    assert_eq!(page["content"][4]["no"], 1);

    let (_, beyond) = server.get("/scopes/main/notices?page=9&size=10").await;
    assert_eq!(beyond["content"], json!([]));
    assert_eq!(beyond["totalElements"], 25);
}

#[tokio::test]
async fn test_inquiry_threads_and_secrets() {
    let server = TestServer::new().await;
    let submit = |body: Value| {
        let client = server.client.clone();
        let url = server.url("/scopes/main/inquiries");
        async move { client.post(url).json(&body).send().await.unwrap() }
    };

    let resp = submit(json!({ "title": " ", "author": "김러너", "content": "?" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = submit(json!({ "title": "배번 수령", "author": "김러너", "content": "언제?" })).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = submit(
        json!({ "title": "환불 요청", "author": "이러너", "content": "계좌 123", "secret": true }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for id in [1, 2] {
        let (status, answered) = server
            .admin_send(
                reqwest::Method::PUT,
                &format!("/scopes/main/inquiries/{id}/reply"),
                Some(json!({ "content": "답변드립니다", "author": "운영팀" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(answered["answered"], true);
    }

    // 공개 목록: 답변 행이 질문 바로 뒤, 비밀글 본문은 가려짐
    let (_, list) = server.get("/scopes/main/inquiries?sort=name").await;
    assert_eq!(list["totalElements"], 4);
    assert_eq!(
        titles(&list),
        vec!["배번 수령", "RE: 배번 수령", "환불 요청", "RE: 환불 요청"]
    );
    assert_eq!(list["content"][1]["replyOf"], 1);
    assert_eq!(list["content"][1]["no"], Value::Null);
    assert_eq!(list["content"][0]["no"], 2);
    assert_eq!(list["content"][2]["no"], 1);
    assert_eq!(list["content"][2]["content"], "");
    assert_eq!(list["content"][3]["content"], "");

    // 비밀글 상세는 관리자 토큰이 있어야 열람 가능
    let (status, _) = server.get("/scopes/main/inquiries/2").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let resp = server
        .client
        .get(server.url("/scopes/main/inquiries/2"))
        .bearer_auth(&server.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(detail["content"], "계좌 123");

    // 관리자 목록: flat 모드는 질문만
    let (_, flat) = server.admin_get("/scopes/main/inquiries?threads=flat").await;
    assert_eq!(flat["totalElements"], 2);
    let (status, _) = server.admin_get("/scopes/main/inquiries?threads=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 답변 삭제 후에는 답변 행이 사라짐
    let (status, cleared) = server
        .admin_send(reqwest::Method::DELETE, "/scopes/main/inquiries/1/reply", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["answered"], false);
    let (status, _) = server
        .admin_send(reqwest::Method::DELETE, "/scopes/main/inquiries/1/reply", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = server.get("/scopes/main/inquiries").await;
    assert_eq!(list["totalElements"], 3);
}

#[tokio::test]
async fn test_faq_public_list_hides_closed() {
    let server = TestServer::new().await;
    for (title, visibility) in [("기념품은?", "open"), ("주차는?", "closed"), ("환불은?", "open")] {
        let (status, _) = server
            .admin_send(
                reqwest::Method::POST,
                "/scopes/main/faqs",
                Some(json!({
                    "category": "general",
                    "title": title,
                    "author": "사무국",
                    "content": format!("{title} 답변"),
                    "visibility": visibility,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = server.get("/scopes/main/faqs?visibility=closed&sort=name").await;
    assert_eq!(titles(&list), vec!["기념품은?", "환불은?"]);

    // FAQ 검색은 답변 본문까지 대상
    let (_, found) = server.get("/scopes/main/faqs?q=환불은? 답변").await;
    assert_eq!(titles(&found), vec!["환불은?"]);

    let (_, detail) = server.get("/scopes/main/faqs/1").await;
    assert_eq!(detail["views"], 1);
    let (status, _) = server.get("/scopes/main/faqs/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, admin) = server.admin_get("/scopes/main/faqs?visibility=closed").await;
    assert_eq!(titles(&admin), vec!["주차는?"]);
}
