//! 实体级批处理规则

use std::fmt;

use async_trait::async_trait;
use domain_core::{Entity, TenantScoped};
use errors::AppResult;
use ports::DependentRef;

use crate::{BatchContext, ItemError, ValidationError};

/// 实体级批处理规则
///
/// 协调器负责流程（顺序、结果归类、存储调用），
/// 规则负责一个实体的校验、默认值、字段映射和删除约束
#[async_trait]
pub trait BatchPolicy: Send + Sync {
    type Id: Clone + Eq + fmt::Display + Send + Sync + 'static;
    /// 请求中的原始字段
    type Fields: Send + Sync;
    /// 校验通过的字段
    type Draft: Send + Sync;
    type Record: Entity<Id = Self::Id> + TenantScoped + Clone + Send + Sync + 'static;
    /// 返回给调用方的记录形态
    type Response: Send;

    /// 实体名称，用于日志和指标
    const ENTITY: &'static str;

    /// 失败结果中展示的名称
    fn display_name(&self, fields: &Self::Fields) -> Option<String>;

    /// 已存在记录的名称（删除失败时展示）
    fn record_name(&self, record: &Self::Record) -> Option<String>;

    /// 校验必填字段和取值范围
    fn validate(&self, fields: Self::Fields) -> Result<Self::Draft, ValidationError>;

    /// 校验外键引用；`id` 为修改目标，新建时为 `None`
    async fn check_references(
        &self,
        _ctx: &BatchContext,
        _id: Option<&Self::Id>,
        _draft: &Self::Draft,
    ) -> Result<(), ItemError> {
        Ok(())
    }

    /// 由校验后的字段构造新记录（含默认值）
    fn create(&self, ctx: &BatchContext, draft: Self::Draft) -> Self::Record;

    /// 就地更新已有记录
    fn apply(&self, ctx: &BatchContext, record: &mut Self::Record, draft: Self::Draft);

    /// 阻止删除的依赖记录
    async fn find_dependents(&self, _record: &Self::Record) -> AppResult<Vec<DependentRef>> {
        Ok(Vec::new())
    }

    /// 记录到返回形态的映射
    fn to_response(&self, record: &Self::Record) -> Self::Response;
}
