//! # Runboard 웹 서버 진입점
//!
//! 마라톤 협회 사이트의 게시판(공지사항, 문의, FAQ) 목록/상세 API 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정에 따라 게시물 저장소(memory / sqlite / remote) 준비
//! 4. API 라우터 설정 (공개 + 관리자)
//! 5. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

#[cfg(test)]
mod tests;

use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use config::{Config, StoreBackend};
use db::Stores;
use routes::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 runboard, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runboard=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Runboard server on {}:{}", config.host, config.port);

    // ── 4단계: 저장소 준비 ──
    let stores = build_stores(&config.backend).await?;

    // ── 5단계: 애플리케이션 상태(State) 생성 ──
    let state = AppState {
        stores,
        jwt_secret: config.jwt_secret.clone(),
        default_page_size: config.default_page_size,
        inquiry_threads: config.inquiry_threads,
    };

    let app = create_router(state, Path::new(&config.frontend_dist));

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 설정된 백엔드로 세 게시판 저장소를 만듭니다.
///
/// SQLite는 파일이 없으면 새로 만들고 마이그레이션을 실행합니다.
async fn build_stores(backend: &StoreBackend) -> Result<Stores> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; posts are lost when the server stops");
            Ok(Stores::memory())
        }
        StoreBackend::Sqlite { database_url } => {
            // 연결 풀: 연결을 미리 만들어두고 요청마다 빌려 씁니다.
            let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?;

            // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시킵니다.
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            Ok(Stores::sqlite(pool))
        }
        StoreBackend::Remote(remote) => {
            tracing::info!(
                user = %remote.user_base_url,
                admin = %remote.admin_base_url,
                "Using remote REST store"
            );
            Ok(Stores::remote(remote))
        }
    }
}

/// API 라우터와 미들웨어, 프론트엔드 정적 파일 서빙을 조립합니다.
pub fn create_router(state: AppState, frontend_dist: &Path) -> Router {
    // 공개 게시판 API (인증 불필요)
    let public_routes = Router::new()
        .route("/scopes/{scope}/notices", get(list_notices))
        .route("/scopes/{scope}/notices/{id}", get(get_notice))
        .route(
            "/scopes/{scope}/inquiries",
            get(list_inquiries).post(create_inquiry),
        )
        .route("/scopes/{scope}/inquiries/{id}", get(get_inquiry))
        .route("/scopes/{scope}/faqs", get(list_faqs))
        .route("/scopes/{scope}/faqs/{id}", get(get_faq));

    // 관리자 API: 모든 핸들러가 AdminUser 추출기로 Bearer 토큰을 검증합니다.
    let admin_routes = Router::new()
        .route(
            "/scopes/{scope}/notices",
            get(admin_list_notices).post(admin_create_notice),
        )
        .route(
            "/scopes/{scope}/notices/{id}",
            get(admin_get_notice)
                .patch(admin_update_notice)
                .delete(admin_delete_notice),
        )
        .route("/scopes/{scope}/inquiries", get(admin_list_inquiries))
        .route(
            "/scopes/{scope}/inquiries/{id}",
            get(admin_get_inquiry).delete(admin_delete_inquiry),
        )
        .route(
            "/scopes/{scope}/inquiries/{id}/reply",
            put(admin_put_reply).delete(admin_delete_reply),
        )
        .route(
            "/scopes/{scope}/faqs",
            get(admin_list_faqs).post(admin_create_faq),
        )
        .route(
            "/scopes/{scope}/faqs/{id}",
            get(admin_get_faq)
                .patch(admin_update_faq)
                .delete(admin_delete_faq),
        );

    let api_routes = Router::new()
        .merge(public_routes)
        .nest("/admin", admin_routes)
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다 (SPA: 없는 경로는 index.html).
    if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", frontend_dist.display());
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));

        Router::new()
            .nest("/api/v1", api_routes)
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!(
            "Frontend dist directory {} not found, serving API only",
            frontend_dist.display()
        );

        Router::new()
            .nest("/api/v1", api_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }
}
