//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 저장소에 접근하지 않으므로 원격 API가 느리거나 내려가 있어도 즉시 응답합니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버 프로세스가 요청을 받을 수 있는지 확인합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
