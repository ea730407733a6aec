//! 配送休息日

use batch_core::ValidationError;
use batch_core::rules;
use chrono::NaiveDate;
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{DeliveryHolidayId, WarehouseId, touch};

/// 配送休息日
///
/// `warehouse_id` 为空表示对总部下所有仓库生效；
/// 同一总部、同一仓库范围内日期唯一
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryHoliday {
    pub id: DeliveryHolidayId,
    pub tenant_id: TenantId,
    pub warehouse_id: Option<WarehouseId>,
    pub holiday_date: NaiveDate,
    pub name: String,
    pub audit_info: AuditInfo,
}

impl_record!(DeliveryHoliday, DeliveryHolidayId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryHolidayFields {
    pub warehouse_id: Option<WarehouseId>,
    pub holiday_date: Option<NaiveDate>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeliveryHolidayDraft {
    pub warehouse_id: Option<WarehouseId>,
    pub holiday_date: NaiveDate,
    pub name: String,
}

impl DeliveryHolidayFields {
    pub fn validate(self) -> Result<DeliveryHolidayDraft, ValidationError> {
        Ok(DeliveryHolidayDraft {
            warehouse_id: self.warehouse_id,
            holiday_date: rules::required(self.holiday_date, "holiday_date")?,
            name: rules::required_text(self.name, "name")?,
        })
    }
}

impl DeliveryHoliday {
    pub fn create(
        tenant_id: TenantId,
        user_id: Option<UserId>,
        draft: DeliveryHolidayDraft,
    ) -> Self {
        Self {
            id: DeliveryHolidayId::new(),
            tenant_id,
            warehouse_id: draft.warehouse_id,
            holiday_date: draft.holiday_date,
            name: draft.name,
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: DeliveryHolidayDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.warehouse_id, draft.warehouse_id);
        changed |= rules::replace(&mut self.holiday_date, draft.holiday_date);
        changed |= rules::replace(&mut self.name, draft.name);
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryHolidayResponse {
    pub id: DeliveryHolidayId,
    pub warehouse_id: Option<WarehouseId>,
    pub holiday_date: NaiveDate,
    pub name: String,
}

impl From<&DeliveryHoliday> for DeliveryHolidayResponse {
    fn from(holiday: &DeliveryHoliday) -> Self {
        Self {
            id: holiday.id,
            warehouse_id: holiday.warehouse_id,
            holiday_date: holiday.holiday_date,
            name: holiday.name.clone(),
        }
    }
}
