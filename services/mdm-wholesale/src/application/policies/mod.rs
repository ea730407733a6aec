//! 各实体的批处理规则

mod catalog;
mod customer;
mod logistics;

pub use catalog::*;
pub use customer::*;
pub use logistics::*;

use batch_core::{BatchContext, ItemError, ValidationError};
use domain_core::TenantScoped;
use ports::Repository;

/// 引用的记录必须存在且属于当前总部
async fn ensure_reference<T, ID>(
    repository: &dyn Repository<T, ID>,
    ctx: &BatchContext,
    id: &ID,
    field: &str,
) -> Result<(), ItemError>
where
    T: TenantScoped,
    ID: Sync,
{
    match repository.find_by_id(id).await? {
        Some(record) if record.belongs_to(&ctx.tenant_id) => Ok(()),
        _ => Err(ValidationError::invalid_reference(field).into()),
    }
}
