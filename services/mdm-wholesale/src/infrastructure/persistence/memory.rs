//! 内存仓储实现

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use domain_core::Entity;
use errors::{AppError, AppResult};
use ports::Repository;
use tokio::sync::RwLock;
use tracing::debug;

type KeyFn<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;
type ScopeFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// 唯一约束：同一作用域内键值不重复
struct UniqueKey<T> {
    name: &'static str,
    scope: Option<ScopeFn<T>>,
    key: KeyFn<T>,
}

impl<T> UniqueKey<T> {
    fn same_scope(&self, a: &T, b: &T) -> bool {
        self.scope.as_ref().is_none_or(|scope| scope(a) == scope(b))
    }
}

/// 内存仓储
///
/// 按 ID 保存记录，保存时检查唯一约束，违反时返回 `AppError::Conflict`
pub struct InMemoryRepository<T: Entity> {
    kind: &'static str,
    rows: RwLock<HashMap<T::Id, T>>,
    unique_keys: Vec<UniqueKey<T>>,
}

impl<T> InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync,
    T::Id: Clone + Eq + Hash + Send + Sync,
{
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            rows: RwLock::new(HashMap::new()),
            unique_keys: Vec::new(),
        }
    }

    /// 增加全局唯一约束；`key` 返回 `None` 的记录不参与该约束
    pub fn with_unique(
        mut self,
        name: &'static str,
        key: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.unique_keys.push(UniqueKey {
            name,
            scope: None,
            key: Box::new(key),
        });
        self
    }

    /// 增加作用域内唯一约束，如同一总部内
    pub fn with_unique_within(
        mut self,
        name: &'static str,
        scope: impl Fn(&T) -> String + Send + Sync + 'static,
        key: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.unique_keys.push(UniqueKey {
            name,
            scope: Some(Box::new(scope)),
            key: Box::new(key),
        });
        self
    }

    /// 满足条件的记录
    pub async fn find_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_unique(&self, rows: &HashMap<T::Id, T>, entity: &T) -> AppResult<()> {
        for unique in &self.unique_keys {
            let Some(key) = (unique.key)(entity) else {
                continue;
            };
            let taken = rows
                .values()
                .filter(|row| row.id() != entity.id() && unique.same_scope(row, entity))
                .any(|row| (unique.key)(row).as_deref() == Some(key.as_str()));
            if taken {
                return Err(AppError::conflict(format!(
                    "duplicate {} {}: {}",
                    self.kind, unique.name, key
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T, T::Id> for InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync,
    T::Id: Clone + Eq + Hash + Send + Sync,
{
    async fn find_by_id(&self, id: &T::Id) -> AppResult<Option<T>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn save(&self, entity: T) -> AppResult<T> {
        let mut rows = self.rows.write().await;
        self.check_unique(&rows, &entity)?;
        rows.insert(entity.id().clone(), entity.clone());
        debug!(kind = self.kind, rows = rows.len(), "Record saved");
        Ok(entity)
    }

    async fn delete(&self, id: &T::Id) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        code: Option<String>,
    }

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn row(id: u32, code: Option<&str>) -> Row {
        Row {
            id,
            code: code.map(str::to_string),
        }
    }

    fn repo() -> InMemoryRepository<Row> {
        InMemoryRepository::new("row").with_unique("code", |r: &Row| r.code.clone())
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo();
        repo.save(row(1, Some("A"))).await.unwrap();
        assert_eq!(repo.find_by_id(&1).await.unwrap(), Some(row(1, Some("A"))));
        assert!(repo.exists(&1).await.unwrap());
        assert!(!repo.exists(&2).await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_key_conflict() {
        let repo = repo();
        repo.save(row(1, Some("A"))).await.unwrap();

        let err = repo.save(row(2, Some("A"))).await.unwrap_err();
        assert_eq!(err, AppError::conflict("duplicate row code: A"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_resave_same_record_is_not_a_conflict() {
        let repo = repo();
        repo.save(row(1, Some("A"))).await.unwrap();
        repo.save(row(1, Some("A"))).await.unwrap();
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_scoped_key_allows_same_value_in_other_scope() {
        let repo = InMemoryRepository::new("row").with_unique_within(
            "code",
            |r: &Row| (r.id % 2).to_string(),
            |r: &Row| r.code.clone(),
        );
        repo.save(row(1, Some("A"))).await.unwrap();
        repo.save(row(2, Some("A"))).await.unwrap();

        let err = repo.save(row(3, Some("A"))).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_none_key_skips_constraint() {
        let repo = repo();
        repo.save(row(1, None)).await.unwrap();
        repo.save(row(2, None)).await.unwrap();
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let repo = repo();
        repo.save(row(1, None)).await.unwrap();
        assert!(repo.delete(&1).await.unwrap());
        assert!(!repo.delete(&1).await.unwrap());
        assert!(repo.is_empty().await);
    }
}
