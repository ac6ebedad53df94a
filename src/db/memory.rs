use super::{Mutation, RecordStore};
use crate::error::AppError;
use crate::models::{Record, RowId, Scope};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 프로세스 메모리 저장소
///
/// 서버가 꺼지면 내용이 사라집니다. 쓰기는 RwLock 쓰기 잠금으로 직렬화됩니다.
pub struct MemoryStore<T> {
    rows: RwLock<HashMap<Scope, Vec<T>>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// 미리 채워진 저장소 (테스트/데모 데이터)
    pub fn with_rows(seed: impl IntoIterator<Item = (Scope, Vec<T>)>) -> Self {
        Self {
            rows: RwLock::new(seed.into_iter().collect()),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn get_by_scope(&self, scope: &Scope) -> Result<Vec<T>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.get(scope).cloned().unwrap_or_default())
    }

    async fn get(&self, scope: &Scope, id: RowId) -> Result<Option<T>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(scope)
            .and_then(|rows| rows.iter().find(|row| row.id() == id))
            .cloned())
    }

    async fn mutate(&self, scope: &Scope, mutation: Mutation<T>) -> Result<Option<T>, AppError> {
        let mut all = self.rows.write().await;

        if let Mutation::Insert(mut row) = mutation {
            let rows = all.entry(scope.clone()).or_default();
            let next = rows.iter().map(|r| r.id().0).max().unwrap_or(0) + 1;
            row.set_id(RowId(next));
            rows.push(row.clone());
            return Ok(Some(row));
        }

        // 나머지 작업은 기존 행이 있어야 하므로 스코프를 새로 만들지 않음
        let Some(rows) = all.get_mut(scope) else {
            return Ok(None);
        };

        let result = match mutation {
            Mutation::Insert(_) => None,
            Mutation::Replace(row) => rows
                .iter_mut()
                .find(|r| r.id() == row.id())
                .map(|slot| {
                    *slot = row.clone();
                    row
                }),
            Mutation::Delete(id) => rows
                .iter()
                .position(|r| r.id() == id)
                .map(|index| rows.remove(index)),
            Mutation::Touch(id) => rows.iter_mut().find(|r| r.id() == id).map(|row| {
                row.touch();
                row.clone()
            }),
        };

        Ok(result)
    }
}
