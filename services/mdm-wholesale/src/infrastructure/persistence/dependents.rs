//! 删除约束查询实现

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use domain_core::Entity;
use errors::AppResult;
use ports::{DependentLookup, DependentRef};
use tokio::sync::RwLock;

use super::InMemoryRepository;

type MatchFn<T, ID> = Box<dyn Fn(&T, &ID) -> bool + Send + Sync>;
type LabelFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// 扫描另一个仓储，找出引用目标记录的依赖记录
pub struct ScanDependents<T: Entity, ID> {
    kind: &'static str,
    source: Arc<InMemoryRepository<T>>,
    references: MatchFn<T, ID>,
    label: Option<LabelFn<T>>,
}

impl<T, ID> ScanDependents<T, ID>
where
    T: Entity + Clone + Send + Sync,
    T::Id: Clone + Eq + Hash + Send + Sync,
{
    /// `references(row, id)` 判断 `row` 是否引用了 `id`
    pub fn new(
        kind: &'static str,
        source: Arc<InMemoryRepository<T>>,
        references: impl Fn(&T, &ID) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source,
            references: Box::new(references),
            label: None,
        }
    }

    /// 依赖记录的可读名称，用于失败原因
    pub fn labelled(mut self, label: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.label = Some(Box::new(label));
        self
    }
}

#[async_trait]
impl<T, ID> DependentLookup<ID> for ScanDependents<T, ID>
where
    T: Entity + Clone + Send + Sync,
    T::Id: Clone + Eq + Hash + Display + Send + Sync,
    ID: Send + Sync,
{
    async fn find_dependents(&self, id: &ID) -> AppResult<Vec<DependentRef>> {
        let rows = self.source.find_where(|row| (self.references)(row, id)).await;
        Ok(rows
            .iter()
            .map(|row| {
                let dependent = DependentRef::new(self.kind, row.id());
                match &self.label {
                    Some(label) => dependent.with_label(label(row)),
                    None => dependent,
                }
            })
            .collect())
    }
}

/// 其他上下文持有的依赖记录
///
/// 商品、库存、配送单不在本服务维护，由对应上下文登记和释放
pub struct ExternalDependents<ID> {
    kind: &'static str,
    entries: RwLock<HashMap<ID, Vec<DependentRef>>>,
}

impl<ID> ExternalDependents<ID>
where
    ID: Eq + Hash + Send + Sync,
{
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 登记一条引用 `id` 的依赖记录
    pub async fn register(&self, id: ID, dependent_id: impl ToString) {
        self.entries
            .write()
            .await
            .entry(id)
            .or_default()
            .push(DependentRef::new(self.kind, dependent_id));
    }

    /// 释放一条依赖记录，返回是否存在
    pub async fn release(&self, id: &ID, dependent_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let Some(dependents) = entries.get_mut(id) else {
            return false;
        };
        let before = dependents.len();
        dependents.retain(|d| d.id != dependent_id);
        let released = dependents.len() != before;
        if dependents.is_empty() {
            entries.remove(id);
        }
        released
    }
}

#[async_trait]
impl<ID> DependentLookup<ID> for ExternalDependents<ID>
where
    ID: Eq + Hash + Send + Sync,
{
    async fn find_dependents(&self, id: &ID) -> AppResult<Vec<DependentRef>> {
        Ok(self
            .entries
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

/// 依次查询多个来源并合并结果
pub struct CompositeDependents<ID> {
    lookups: Vec<Arc<dyn DependentLookup<ID>>>,
}

impl<ID> CompositeDependents<ID> {
    pub fn new(lookups: Vec<Arc<dyn DependentLookup<ID>>>) -> Self {
        Self { lookups }
    }
}

#[async_trait]
impl<ID: Sync> DependentLookup<ID> for CompositeDependents<ID> {
    async fn find_dependents(&self, id: &ID) -> AppResult<Vec<DependentRef>> {
        let mut dependents = Vec::new();
        for lookup in &self.lookups {
            dependents.extend(lookup.find_dependents(id).await?);
        }
        Ok(dependents)
    }
}
