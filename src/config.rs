//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `STORE_BACKEND`: 게시물 저장소 종류 (`memory` | `sqlite` | `remote`, 기본값 `sqlite`)
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (`sqlite` 백엔드에서 필수)
//! - `USER_API_BASE_URL` / `ADMIN_API_BASE_URL`: 원격 API 주소 (`remote` 백엔드에서 필수)
//! - `ADMIN_API_TOKEN`: 원격 관리자 API 호출에 붙일 Bearer 토큰
//! - `REMOTE_MAX_ATTEMPTS` / `REMOTE_BACKOFF_MS`: 원격 호출 재시도 정책
//! - `ADMIN_JWT_SECRET`: 관리자 Bearer 토큰(JWT) 검증 비밀키 (필수)
//! - `DEFAULT_PAGE_SIZE`: `size` 파라미터가 없을 때의 페이지 크기
//! - `INQUIRY_THREADS`: 문의 목록이 답변 행을 직접 펼칠지(`expand`),
//!   이미 펼쳐진 데이터를 받는지(`pre-expanded`)
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 디렉토리
//! - `HOST` / `PORT`: 서버 바인딩 주소

use crate::models::ThreadMode;
use std::env;
use thiserror::Error;

/// 설정 로딩 실패
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수가 없음
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// 값을 해석할 수 없음
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 게시물 저장소 백엔드 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// 프로세스 메모리 (프론트엔드 데모/목업 경로)
    Memory,
    /// 로컬 SQLite 파일
    Sqlite { database_url: String },
    /// 원격 REST API (사용자 서버 + 관리자 서버)
    Remote(RemoteConfig),
}

/// 원격 REST API 접속 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// 사용자용(공개) 서버 주소
    pub user_base_url: String,
    /// 관리자 서버 주소
    pub admin_base_url: String,
    /// 관리자 서버 호출 시 붙일 Bearer 토큰
    pub admin_token: Option<String>,
    /// 최대 시도 횟수 (첫 요청 포함)
    pub max_attempts: u32,
    /// 재시도 간격 기본값 (밀리초, 시도 횟수만큼 곱해짐)
    pub backoff_ms: u64,
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    /// 관리자 JWT 검증 비밀키
    pub jwt_secret: String,
    /// 기본 페이지 크기
    pub default_page_size: u32,
    /// 문의 목록의 기본 스레드 모드
    pub inquiry_threads: ThreadMode,
    /// 프론트엔드 빌드 디렉토리
    pub frontend_dist: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `ADMIN_JWT_SECRET`은 항상 필수이고, 선택한 백엔드에 따라
    /// `DATABASE_URL` 또는 `USER_API_BASE_URL`/`ADMIN_API_BASE_URL`이 필수입니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 값 조회 함수를 받아 설정을 만듭니다.
    /// 테스트에서 전역 환경변수를 건드리지 않고 설정을 검증하기 위해 분리했습니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let backend = match var("STORE_BACKEND").as_deref().unwrap_or("sqlite") {
            "memory" => StoreBackend::Memory,
            "sqlite" => StoreBackend::Sqlite {
                database_url: required("DATABASE_URL")?,
            },
            "remote" => StoreBackend::Remote(RemoteConfig {
                user_base_url: required("USER_API_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                admin_base_url: required("ADMIN_API_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                admin_token: var("ADMIN_API_TOKEN"),
                max_attempts: parse_or(var("REMOTE_MAX_ATTEMPTS"), "REMOTE_MAX_ATTEMPTS", 3)?,
                backoff_ms: parse_or(var("REMOTE_BACKOFF_MS"), "REMOTE_BACKOFF_MS", 200)?,
            }),
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let default_page_size: u32 =
            parse_or(var("DEFAULT_PAGE_SIZE"), "DEFAULT_PAGE_SIZE", 10)?;
        if default_page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_PAGE_SIZE",
                value: "0".to_string(),
            });
        }

        let inquiry_threads = match var("INQUIRY_THREADS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "INQUIRY_THREADS",
                value: raw,
            })?,
            None => ThreadMode::Expand,
        };

        Ok(Self {
            backend,
            jwt_secret: required("ADMIN_JWT_SECRET")?,
            default_page_size,
            inquiry_threads,
            frontend_dist: var("FRONTEND_DIST").unwrap_or_else(|| "../frontend/dist".to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            // 포트 번호는 파싱 실패 시 기본값 3000
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
        })
    }
}

/// 숫자 설정값을 파싱합니다. 값이 없으면 기본값, 잘못된 값이면 에러입니다.
fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
