//! 主数据批处理服务

use std::sync::Arc;

use batch_core::BatchReconciler;
use config::BatchConfig;
use ports::{DependentLookup, Repository};
use tracing::info;

use crate::domain::{
    Brand, BrandId, CustomerAdjustment, CustomerAdjustmentId, CustomerDeposit, CustomerDepositId,
    CustomerUser, CustomerUserId, DeliveryHoliday, DeliveryHolidayId, DistributionCenter,
    DistributionCenterId, ItemCategory, ItemCategoryId, Role, RoleId, Vehicle, VehicleId,
    VirtualAccount, VirtualAccountId, Warehouse, WarehouseId,
};

use super::policies::*;

/// 批处理服务依赖的存储端口
#[derive(Clone)]
pub struct MasterDataPorts {
    pub brands: Arc<dyn Repository<Brand, BrandId>>,
    pub brand_dependents: Arc<dyn DependentLookup<BrandId>>,
    pub distribution_centers: Arc<dyn Repository<DistributionCenter, DistributionCenterId>>,
    pub distribution_center_dependents: Arc<dyn DependentLookup<DistributionCenterId>>,
    pub warehouses: Arc<dyn Repository<Warehouse, WarehouseId>>,
    pub warehouse_dependents: Arc<dyn DependentLookup<WarehouseId>>,
    pub vehicles: Arc<dyn Repository<Vehicle, VehicleId>>,
    pub vehicle_dependents: Arc<dyn DependentLookup<VehicleId>>,
    pub roles: Arc<dyn Repository<Role, RoleId>>,
    pub role_dependents: Arc<dyn DependentLookup<RoleId>>,
    pub item_categories: Arc<dyn Repository<ItemCategory, ItemCategoryId>>,
    pub item_category_dependents: Arc<dyn DependentLookup<ItemCategoryId>>,
    pub customer_users: Arc<dyn Repository<CustomerUser, CustomerUserId>>,
    pub customer_deposits: Arc<dyn Repository<CustomerDeposit, CustomerDepositId>>,
    pub customer_adjustments: Arc<dyn Repository<CustomerAdjustment, CustomerAdjustmentId>>,
    pub delivery_holidays: Arc<dyn Repository<DeliveryHoliday, DeliveryHolidayId>>,
    pub virtual_accounts: Arc<dyn Repository<VirtualAccount, VirtualAccountId>>,
}

/// 主数据批处理服务
///
/// 每个实体一个协调器，批量上限取自配置
pub struct MasterDataService {
    brands: BatchReconciler<BrandPolicy>,
    distribution_centers: BatchReconciler<DistributionCenterPolicy>,
    warehouses: BatchReconciler<WarehousePolicy>,
    vehicles: BatchReconciler<VehiclePolicy>,
    roles: BatchReconciler<RolePolicy>,
    item_categories: BatchReconciler<ItemCategoryPolicy>,
    customer_users: BatchReconciler<CustomerUserPolicy>,
    customer_deposits: BatchReconciler<CustomerDepositPolicy>,
    customer_adjustments: BatchReconciler<CustomerAdjustmentPolicy>,
    delivery_holidays: BatchReconciler<DeliveryHolidayPolicy>,
    virtual_accounts: BatchReconciler<VirtualAccountPolicy>,
}

impl MasterDataService {
    pub fn new(ports: MasterDataPorts, batch: &BatchConfig) -> Self {
        let max = batch.max_items;
        info!(max_items = max, "Initializing master data batch service");

        Self {
            brands: BatchReconciler::new(BrandPolicy::new(ports.brand_dependents), ports.brands)
                .with_max_items(max),
            distribution_centers: BatchReconciler::new(
                DistributionCenterPolicy::new(ports.distribution_center_dependents),
                ports.distribution_centers.clone(),
            )
            .with_max_items(max),
            warehouses: BatchReconciler::new(
                WarehousePolicy::new(ports.distribution_centers, ports.warehouse_dependents),
                ports.warehouses.clone(),
            )
            .with_max_items(max),
            vehicles: BatchReconciler::new(
                VehiclePolicy::new(ports.warehouses.clone(), ports.vehicle_dependents),
                ports.vehicles,
            )
            .with_max_items(max),
            roles: BatchReconciler::new(RolePolicy::new(ports.role_dependents), ports.roles.clone())
                .with_max_items(max),
            item_categories: BatchReconciler::new(
                ItemCategoryPolicy::new(
                    ports.item_categories.clone(),
                    ports.item_category_dependents,
                ),
                ports.item_categories,
            )
            .with_max_items(max),
            customer_users: BatchReconciler::new(
                CustomerUserPolicy::new(ports.roles),
                ports.customer_users,
            )
            .with_max_items(max),
            customer_deposits: BatchReconciler::new(
                CustomerDepositPolicy,
                ports.customer_deposits,
            )
            .with_max_items(max),
            customer_adjustments: BatchReconciler::new(
                CustomerAdjustmentPolicy,
                ports.customer_adjustments,
            )
            .with_max_items(max),
            delivery_holidays: BatchReconciler::new(
                DeliveryHolidayPolicy::new(ports.warehouses),
                ports.delivery_holidays,
            )
            .with_max_items(max),
            virtual_accounts: BatchReconciler::new(VirtualAccountPolicy, ports.virtual_accounts)
                .with_max_items(max),
        }
    }

    pub fn brands(&self) -> &BatchReconciler<BrandPolicy> {
        &self.brands
    }

    pub fn distribution_centers(&self) -> &BatchReconciler<DistributionCenterPolicy> {
        &self.distribution_centers
    }

    pub fn warehouses(&self) -> &BatchReconciler<WarehousePolicy> {
        &self.warehouses
    }

    pub fn vehicles(&self) -> &BatchReconciler<VehiclePolicy> {
        &self.vehicles
    }

    pub fn roles(&self) -> &BatchReconciler<RolePolicy> {
        &self.roles
    }

    pub fn item_categories(&self) -> &BatchReconciler<ItemCategoryPolicy> {
        &self.item_categories
    }

    pub fn customer_users(&self) -> &BatchReconciler<CustomerUserPolicy> {
        &self.customer_users
    }

    pub fn customer_deposits(&self) -> &BatchReconciler<CustomerDepositPolicy> {
        &self.customer_deposits
    }

    pub fn customer_adjustments(&self) -> &BatchReconciler<CustomerAdjustmentPolicy> {
        &self.customer_adjustments
    }

    pub fn delivery_holidays(&self) -> &BatchReconciler<DeliveryHolidayPolicy> {
        &self.delivery_holidays
    }

    pub fn virtual_accounts(&self) -> &BatchReconciler<VirtualAccountPolicy> {
        &self.virtual_accounts
    }
}
