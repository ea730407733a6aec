//! Domain layer

pub mod entities;
pub mod ids;

pub use entities::*;
pub use ids::*;

use common::UserId;
use domain_core::AggregateRoot;

/// 字段有变化时刷新审计信息，返回是否变化
///
/// 没有变化的修改不改动记录，重复提交同一修改得到相同的记录状态
pub(crate) fn touch<T: AggregateRoot>(
    record: &mut T,
    changed: bool,
    user_id: Option<UserId>,
) -> bool {
    if changed {
        record.audit_info_mut().update(user_id);
    }
    changed
}
