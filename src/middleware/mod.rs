//! # 요청 미들웨어/추출기
//!
//! - `auth`: 관리자 Bearer 토큰(JWT) 검증

pub mod auth;
