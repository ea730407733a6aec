//! 配送车辆实体

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{VehicleId, WarehouseId, touch};

/// 配送车辆
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub tenant_id: TenantId,
    /// 车牌号，同一总部内唯一
    pub vehicle_no: String,
    /// 所属仓库
    pub warehouse_id: WarehouseId,
    pub driver_name: Option<String>,
    /// 载重（kg）
    pub capacity_kg: Option<i32>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(Vehicle, VehicleId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFields {
    pub vehicle_no: Option<String>,
    pub warehouse_id: Option<WarehouseId>,
    pub driver_name: Option<String>,
    pub capacity_kg: Option<i32>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct VehicleDraft {
    pub vehicle_no: String,
    pub warehouse_id: WarehouseId,
    pub driver_name: Option<String>,
    pub capacity_kg: Option<i32>,
    pub use_yn: Option<i16>,
}

impl VehicleFields {
    pub fn validate(self) -> Result<VehicleDraft, ValidationError> {
        let vehicle_no = rules::required_text(self.vehicle_no, "vehicle_no")?;
        rules::max_chars(&vehicle_no, 20, "vehicle_no")?;
        let warehouse_id = rules::required(self.warehouse_id, "warehouse_id")?;
        if self.capacity_kg.is_some_and(|kg| kg <= 0) {
            return Err(ValidationError::invalid_value("capacity_kg"));
        }

        Ok(VehicleDraft {
            vehicle_no,
            warehouse_id,
            driver_name: rules::optional_text(self.driver_name),
            capacity_kg: self.capacity_kg,
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl Vehicle {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: VehicleDraft) -> Self {
        Self {
            id: VehicleId::new(),
            tenant_id,
            vehicle_no: draft.vehicle_no,
            warehouse_id: draft.warehouse_id,
            driver_name: draft.driver_name,
            capacity_kg: draft.capacity_kg,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: VehicleDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.vehicle_no, draft.vehicle_no);
        changed |= rules::replace(&mut self.warehouse_id, draft.warehouse_id);
        changed |= rules::replace(&mut self.driver_name, draft.driver_name);
        changed |= rules::replace(&mut self.capacity_kg, draft.capacity_kg);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: VehicleId,
    pub vehicle_no: String,
    pub warehouse_id: WarehouseId,
    pub driver_name: Option<String>,
    pub capacity_kg: Option<i32>,
    pub use_yn: i16,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_no: vehicle.vehicle_no.clone(),
            warehouse_id: vehicle.warehouse_id,
            driver_name: vehicle.driver_name.clone(),
            capacity_kg: vehicle.capacity_kg,
            use_yn: vehicle.use_yn,
        }
    }
}
