//! 仓库实体

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{DistributionCenterId, WarehouseId, touch};

/// 仓库
///
/// 仓库名称在同一总部内唯一。车辆、配送休息日和库存都挂在仓库下，
/// 存在这些记录时仓库不能删除
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub tenant_id: TenantId,
    pub name: String,
    /// 所属物流中心
    pub distribution_center_id: Option<DistributionCenterId>,
    pub address: Option<String>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(Warehouse, WarehouseId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseFields {
    pub name: Option<String>,
    pub distribution_center_id: Option<DistributionCenterId>,
    pub address: Option<String>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct WarehouseDraft {
    pub name: String,
    pub distribution_center_id: Option<DistributionCenterId>,
    pub address: Option<String>,
    pub use_yn: Option<i16>,
}

impl WarehouseFields {
    pub fn validate(self) -> Result<WarehouseDraft, ValidationError> {
        Ok(WarehouseDraft {
            name: rules::required_text(self.name, "name")?,
            distribution_center_id: self.distribution_center_id,
            address: rules::optional_text(self.address),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl Warehouse {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: WarehouseDraft) -> Self {
        Self {
            id: WarehouseId::new(),
            tenant_id,
            name: draft.name,
            distribution_center_id: draft.distribution_center_id,
            address: draft.address,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: WarehouseDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.distribution_center_id, draft.distribution_center_id);
        changed |= rules::replace(&mut self.address, draft.address);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseResponse {
    pub id: WarehouseId,
    pub name: String,
    pub distribution_center_id: Option<DistributionCenterId>,
    pub address: Option<String>,
    pub use_yn: i16,
}

impl From<&Warehouse> for WarehouseResponse {
    fn from(warehouse: &Warehouse) -> Self {
        Self {
            id: warehouse.id,
            name: warehouse.name.clone(),
            distribution_center_id: warehouse.distribution_center_id,
            address: warehouse.address.clone(),
            use_yn: warehouse.use_yn,
        }
    }
}
