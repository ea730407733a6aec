//! 物流中心、仓库、车辆、配送休息日

use std::sync::Arc;

use async_trait::async_trait;
use batch_core::{BatchContext, BatchPolicy, ItemError, ValidationError};
use errors::AppResult;
use ports::{DependentLookup, DependentRef, Repository};

use crate::domain::{
    DeliveryHoliday, DeliveryHolidayDraft, DeliveryHolidayFields, DeliveryHolidayId,
    DeliveryHolidayResponse, DistributionCenter, DistributionCenterDraft,
    DistributionCenterFields, DistributionCenterId, DistributionCenterResponse, Vehicle,
    VehicleDraft, VehicleFields, VehicleId, VehicleResponse, Warehouse, WarehouseDraft,
    WarehouseFields, WarehouseId, WarehouseResponse,
};

use super::ensure_reference;

// ========== 物流中心 ==========

pub struct DistributionCenterPolicy {
    dependents: Arc<dyn DependentLookup<DistributionCenterId>>,
}

impl DistributionCenterPolicy {
    pub fn new(dependents: Arc<dyn DependentLookup<DistributionCenterId>>) -> Self {
        Self { dependents }
    }
}

#[async_trait]
impl BatchPolicy for DistributionCenterPolicy {
    type Id = DistributionCenterId;
    type Fields = DistributionCenterFields;
    type Draft = DistributionCenterDraft;
    type Record = DistributionCenter;
    type Response = DistributionCenterResponse;

    const ENTITY: &'static str = "distribution_center";

    fn display_name(&self, fields: &DistributionCenterFields) -> Option<String> {
        fields.name.clone().or_else(|| fields.code.clone())
    }

    fn record_name(&self, record: &DistributionCenter) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(
        &self,
        fields: DistributionCenterFields,
    ) -> Result<DistributionCenterDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: DistributionCenterDraft) -> DistributionCenter {
        DistributionCenter::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(
        &self,
        ctx: &BatchContext,
        record: &mut DistributionCenter,
        draft: DistributionCenterDraft,
    ) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &DistributionCenter) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &DistributionCenter) -> DistributionCenterResponse {
        record.into()
    }
}

// ========== 仓库 ==========

pub struct WarehousePolicy {
    centers: Arc<dyn Repository<DistributionCenter, DistributionCenterId>>,
    dependents: Arc<dyn DependentLookup<WarehouseId>>,
}

impl WarehousePolicy {
    pub fn new(
        centers: Arc<dyn Repository<DistributionCenter, DistributionCenterId>>,
        dependents: Arc<dyn DependentLookup<WarehouseId>>,
    ) -> Self {
        Self {
            centers,
            dependents,
        }
    }
}

#[async_trait]
impl BatchPolicy for WarehousePolicy {
    type Id = WarehouseId;
    type Fields = WarehouseFields;
    type Draft = WarehouseDraft;
    type Record = Warehouse;
    type Response = WarehouseResponse;

    const ENTITY: &'static str = "warehouse";

    fn display_name(&self, fields: &WarehouseFields) -> Option<String> {
        fields.name.clone()
    }

    fn record_name(&self, record: &Warehouse) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(&self, fields: WarehouseFields) -> Result<WarehouseDraft, ValidationError> {
        fields.validate()
    }

    async fn check_references(
        &self,
        ctx: &BatchContext,
        _id: Option<&WarehouseId>,
        draft: &WarehouseDraft,
    ) -> Result<(), ItemError> {
        match &draft.distribution_center_id {
            Some(center_id) => {
                ensure_reference(self.centers.as_ref(), ctx, center_id, "distribution_center_id")
                    .await
            }
            None => Ok(()),
        }
    }

    fn create(&self, ctx: &BatchContext, draft: WarehouseDraft) -> Warehouse {
        Warehouse::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut Warehouse, draft: WarehouseDraft) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &Warehouse) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &Warehouse) -> WarehouseResponse {
        record.into()
    }
}

// ========== 车辆 ==========

pub struct VehiclePolicy {
    warehouses: Arc<dyn Repository<Warehouse, WarehouseId>>,
    dependents: Arc<dyn DependentLookup<VehicleId>>,
}

impl VehiclePolicy {
    pub fn new(
        warehouses: Arc<dyn Repository<Warehouse, WarehouseId>>,
        dependents: Arc<dyn DependentLookup<VehicleId>>,
    ) -> Self {
        Self {
            warehouses,
            dependents,
        }
    }
}

#[async_trait]
impl BatchPolicy for VehiclePolicy {
    type Id = VehicleId;
    type Fields = VehicleFields;
    type Draft = VehicleDraft;
    type Record = Vehicle;
    type Response = VehicleResponse;

    const ENTITY: &'static str = "vehicle";

    fn display_name(&self, fields: &VehicleFields) -> Option<String> {
        fields.vehicle_no.clone()
    }

    fn record_name(&self, record: &Vehicle) -> Option<String> {
        Some(record.vehicle_no.clone())
    }

    fn validate(&self, fields: VehicleFields) -> Result<VehicleDraft, ValidationError> {
        fields.validate()
    }

    async fn check_references(
        &self,
        ctx: &BatchContext,
        _id: Option<&VehicleId>,
        draft: &VehicleDraft,
    ) -> Result<(), ItemError> {
        ensure_reference(self.warehouses.as_ref(), ctx, &draft.warehouse_id, "warehouse_id").await
    }

    fn create(&self, ctx: &BatchContext, draft: VehicleDraft) -> Vehicle {
        Vehicle::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut Vehicle, draft: VehicleDraft) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &Vehicle) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &Vehicle) -> VehicleResponse {
        record.into()
    }
}

// ========== 配送休息日 ==========

pub struct DeliveryHolidayPolicy {
    warehouses: Arc<dyn Repository<Warehouse, WarehouseId>>,
}

impl DeliveryHolidayPolicy {
    pub fn new(warehouses: Arc<dyn Repository<Warehouse, WarehouseId>>) -> Self {
        Self { warehouses }
    }
}

#[async_trait]
impl BatchPolicy for DeliveryHolidayPolicy {
    type Id = DeliveryHolidayId;
    type Fields = DeliveryHolidayFields;
    type Draft = DeliveryHolidayDraft;
    type Record = DeliveryHoliday;
    type Response = DeliveryHolidayResponse;

    const ENTITY: &'static str = "delivery_holiday";

    fn display_name(&self, fields: &DeliveryHolidayFields) -> Option<String> {
        match (&fields.name, fields.holiday_date) {
            (Some(name), Some(date)) => Some(format!("{date} {name}")),
            (Some(name), None) => Some(name.clone()),
            (None, date) => date.map(|d| d.to_string()),
        }
    }

    fn record_name(&self, record: &DeliveryHoliday) -> Option<String> {
        Some(format!("{} {}", record.holiday_date, record.name))
    }

    fn validate(
        &self,
        fields: DeliveryHolidayFields,
    ) -> Result<DeliveryHolidayDraft, ValidationError> {
        fields.validate()
    }

    async fn check_references(
        &self,
        ctx: &BatchContext,
        _id: Option<&DeliveryHolidayId>,
        draft: &DeliveryHolidayDraft,
    ) -> Result<(), ItemError> {
        match &draft.warehouse_id {
            Some(warehouse_id) => {
                ensure_reference(self.warehouses.as_ref(), ctx, warehouse_id, "warehouse_id").await
            }
            None => Ok(()),
        }
    }

    fn create(&self, ctx: &BatchContext, draft: DeliveryHolidayDraft) -> DeliveryHoliday {
        DeliveryHoliday::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut DeliveryHoliday, draft: DeliveryHolidayDraft) {
        record.apply(draft, ctx.user_id);
    }

    fn to_response(&self, record: &DeliveryHoliday) -> DeliveryHolidayResponse {
        record.into()
    }
}
