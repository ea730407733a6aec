//! 批量维护的主数据实体

/// 为带 `id`、`tenant_id`、`audit_info` 字段的实体实现领域 trait
macro_rules! impl_record {
    ($entity:ident, $id:ident) => {
        impl domain_core::Entity for $entity {
            type Id = $id;

            fn id(&self) -> &$id {
                &self.id
            }
        }

        impl domain_core::AggregateRoot for $entity {
            fn audit_info(&self) -> &common::AuditInfo {
                &self.audit_info
            }

            fn audit_info_mut(&mut self) -> &mut common::AuditInfo {
                &mut self.audit_info
            }
        }

        impl domain_core::TenantScoped for $entity {
            fn tenant_id(&self) -> &common::TenantId {
                &self.tenant_id
            }
        }
    };
}

mod brand;
mod customer_adjustment;
mod customer_deposit;
mod customer_user;
mod delivery_holiday;
mod distribution_center;
mod item_category;
mod role;
mod vehicle;
mod virtual_account;
mod warehouse;

pub use brand::*;
pub use customer_adjustment::*;
pub use customer_deposit::*;
pub use customer_user::*;
pub use delivery_holiday::*;
pub use distribution_center::*;
pub use item_category::*;
pub use role::*;
pub use vehicle::*;
pub use virtual_account::*;
pub use warehouse::*;
