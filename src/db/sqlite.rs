//! # SQLite 게시물 저장소
//!
//! 세 종류의 게시물을 `records` 테이블 하나에 저장합니다.
//! `(domain, scope, id)`가 행을 식별하고, 행 전체는 `body` 컬럼에 JSON으로 들어갑니다.
//! 목록은 `seq` 순서(등록 순서)로 읽습니다.

use super::{Mutation, RecordStore};
use crate::error::AppError;
use crate::models::{Record, RowId, Scope};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::marker::PhantomData;

pub struct SqliteStore<T> {
    pool: SqlitePool,
    // fn() -> T: T를 소유하지 않으므로 T와 무관하게 Send + Sync
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteStore<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

fn decode<T: Record>(body: &str) -> Result<T, AppError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl<T: Record> RecordStore<T> for SqliteStore<T> {
    async fn get_by_scope(&self, scope: &Scope) -> Result<Vec<T>, AppError> {
        let bodies: Vec<String> = sqlx::query_scalar(
            "SELECT body FROM records WHERE domain = ? AND scope = ? ORDER BY seq",
        )
        .bind(T::DOMAIN)
        .bind(scope.as_str())
        .fetch_all(&self.pool)
        .await?;

        bodies.iter().map(|body| decode(body)).collect()
    }

    async fn get(&self, scope: &Scope, id: RowId) -> Result<Option<T>, AppError> {
        let body: Option<String> = sqlx::query_scalar(
            "SELECT body FROM records WHERE domain = ? AND scope = ? AND id = ?",
        )
        .bind(T::DOMAIN)
        .bind(scope.as_str())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        body.as_deref().map(decode).transpose()
    }

    async fn mutate(&self, scope: &Scope, mutation: Mutation<T>) -> Result<Option<T>, AppError> {
        // 읽고-고쳐-쓰는 작업이 섞이지 않도록 트랜잭션 안에서 처리
        let mut tx = self.pool.begin().await?;

        let result = match mutation {
            Mutation::Insert(mut row) => {
                let next: i64 = sqlx::query_scalar(
                    "SELECT COALESCE(MAX(id), 0) + 1 FROM records WHERE domain = ? AND scope = ?",
                )
                .bind(T::DOMAIN)
                .bind(scope.as_str())
                .fetch_one(&mut *tx)
                .await?;

                row.set_id(RowId(next));
                sqlx::query("INSERT INTO records (domain, scope, id, body) VALUES (?, ?, ?, ?)")
                    .bind(T::DOMAIN)
                    .bind(scope.as_str())
                    .bind(next)
                    .bind(serde_json::to_string(&row)?)
                    .execute(&mut *tx)
                    .await?;
                Some(row)
            }
            Mutation::Replace(row) => {
                let updated = sqlx::query(
                    r#"
                    UPDATE records
                    SET body = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                    WHERE domain = ? AND scope = ? AND id = ?
                    "#,
                )
                .bind(serde_json::to_string(&row)?)
                .bind(T::DOMAIN)
                .bind(scope.as_str())
                .bind(row.id().0)
                .execute(&mut *tx)
                .await?;
                (updated.rows_affected() > 0).then_some(row)
            }
            Mutation::Delete(id) => {
                let body: Option<String> = sqlx::query_scalar(
                    "DELETE FROM records WHERE domain = ? AND scope = ? AND id = ? RETURNING body",
                )
                .bind(T::DOMAIN)
                .bind(scope.as_str())
                .bind(id.0)
                .fetch_optional(&mut *tx)
                .await?;
                body.as_deref().map(decode).transpose()?
            }
            Mutation::Touch(id) => {
                let body: Option<String> = sqlx::query_scalar(
                    "SELECT body FROM records WHERE domain = ? AND scope = ? AND id = ?",
                )
                .bind(T::DOMAIN)
                .bind(scope.as_str())
                .bind(id.0)
                .fetch_optional(&mut *tx)
                .await?;

                match body {
                    Some(body) => {
                        let mut row: T = decode(&body)?;
                        row.touch();
                        sqlx::query(
                            "UPDATE records SET body = ? WHERE domain = ? AND scope = ? AND id = ?",
                        )
                        .bind(serde_json::to_string(&row)?)
                        .bind(T::DOMAIN)
                        .bind(scope.as_str())
                        .bind(id.0)
                        .execute(&mut *tx)
                        .await?;
                        Some(row)
                    }
                    None => None,
                }
            }
        };

        tx.commit().await?;
        Ok(result)
    }
}
