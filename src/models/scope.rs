//! # 스코프(Scope)와 행 ID
//!
//! 게시물은 사이트 전체(`main`)와 대회(event)별로 나뉘어 저장됩니다.
//! 두 스코프의 게시물은 한 조회에서 절대 섞이지 않습니다.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 사이트 전체 스코프를 나타내는 경로 값
pub const MAIN_SCOPE: &str = "main";

/// 게시물 파티션 키
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    /// 사이트 전체 게시판
    Main,
    /// 특정 대회의 게시판 (대회 ID)
    Event(String),
}

impl Scope {
    /// 경로 세그먼트를 스코프로 변환합니다.
    ///
    /// `"main"`은 전체 게시판, 그 외 비어 있지 않은 문자열은 대회 ID입니다.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::BadRequest("Scope cannot be empty".to_string()));
        }
        if raw == MAIN_SCOPE {
            Ok(Scope::Main)
        } else {
            Ok(Scope::Event(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scope::Main => MAIN_SCOPE,
            Scope::Event(id) => id,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Scope {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Scope::parse(&value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

/// 스코프 안에서 고유한 게시물 ID
///
/// 서로 다른 스코프에는 같은 ID 값이 독립적으로 존재할 수 있습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_and_event_scopes_parse() {
        assert_eq!(Scope::parse("main").unwrap(), Scope::Main);
        assert_eq!(
            Scope::parse("2025-seoul").unwrap(),
            Scope::Event("2025-seoul".to_string())
        );
        assert!(Scope::parse("  ").is_err());
    }

    #[test]
    fn scope_serializes_as_plain_string() {
        let json = serde_json::to_string(&Scope::Event("999".to_string())).unwrap();
        assert_eq!(json, "\"999\"");
        let back: Scope = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(back, Scope::Main);
    }
}
