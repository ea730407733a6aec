//! Repository trait 定义

use async_trait::async_trait;
use errors::AppResult;

/// 基础 Repository trait
///
/// 存储层的唯一约束冲突以 `AppError::Conflict` 返回，
/// 存储不可用以 `AppError::Unavailable` 返回
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存实体（新建或覆盖），返回持久化后的实体
    async fn save(&self, entity: T) -> AppResult<T>;

    /// 删除实体，记录不存在时返回 false
    async fn delete(&self, id: &ID) -> AppResult<bool>;

    /// 检查是否存在
    async fn exists(&self, id: &ID) -> AppResult<bool>
    where
        ID: Sync,
    {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
