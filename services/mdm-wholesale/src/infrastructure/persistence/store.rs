//! 内存存储装配

use std::sync::Arc;

use ports::DependentLookup;

use crate::application::MasterDataPorts;
use crate::domain::{
    Brand, BrandId, CustomerAdjustment, CustomerDeposit, CustomerUser, DeliveryHoliday,
    DistributionCenter, DistributionCenterId, ItemCategory, ItemCategoryId, Role, RoleId, Vehicle,
    VehicleId, VirtualAccount, Warehouse, WarehouseId,
};

use super::{CompositeDependents, ExternalDependents, InMemoryRepository, ScanDependents};

/// 所有主数据的内存存储
///
/// 商品、库存、配送单由其他上下文维护，这里只保留对它们的引用登记
pub struct InMemoryStore {
    pub brands: Arc<InMemoryRepository<Brand>>,
    pub distribution_centers: Arc<InMemoryRepository<DistributionCenter>>,
    pub warehouses: Arc<InMemoryRepository<Warehouse>>,
    pub vehicles: Arc<InMemoryRepository<Vehicle>>,
    pub roles: Arc<InMemoryRepository<Role>>,
    pub item_categories: Arc<InMemoryRepository<ItemCategory>>,
    pub customer_users: Arc<InMemoryRepository<CustomerUser>>,
    pub customer_deposits: Arc<InMemoryRepository<CustomerDeposit>>,
    pub customer_adjustments: Arc<InMemoryRepository<CustomerAdjustment>>,
    pub delivery_holidays: Arc<InMemoryRepository<DeliveryHoliday>>,
    pub virtual_accounts: Arc<InMemoryRepository<VirtualAccount>>,

    /// 引用品牌的商品
    pub items_by_brand: Arc<ExternalDependents<BrandId>>,
    /// 引用商品分类的商品
    pub items_by_category: Arc<ExternalDependents<ItemCategoryId>>,
    /// 仓库中的库存
    pub inventory_by_warehouse: Arc<ExternalDependents<WarehouseId>>,
    /// 车辆的在途配送单
    pub deliveries_by_vehicle: Arc<ExternalDependents<VehicleId>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            brands: Arc::new(
                InMemoryRepository::new("brand").with_unique_within(
                    "name",
                    |b: &Brand| b.tenant_id.to_string(),
                    |b: &Brand| Some(b.name.clone()),
                ),
            ),
            distribution_centers: Arc::new(
                InMemoryRepository::new("distribution center").with_unique_within(
                    "code",
                    |c: &DistributionCenter| c.tenant_id.to_string(),
                    |c: &DistributionCenter| Some(c.code.clone()),
                ),
            ),
            warehouses: Arc::new(
                InMemoryRepository::new("warehouse").with_unique_within(
                    "name",
                    |w: &Warehouse| w.tenant_id.to_string(),
                    |w: &Warehouse| Some(w.name.clone()),
                ),
            ),
            vehicles: Arc::new(
                InMemoryRepository::new("vehicle").with_unique_within(
                    "number",
                    |v: &Vehicle| v.tenant_id.to_string(),
                    |v: &Vehicle| Some(v.vehicle_no.clone()),
                ),
            ),
            roles: Arc::new(
                InMemoryRepository::new("role").with_unique_within(
                    "code",
                    |r: &Role| r.tenant_id.to_string(),
                    |r: &Role| Some(r.code.clone()),
                ),
            ),
            item_categories: Arc::new(InMemoryRepository::new("item category")),
            customer_users: Arc::new(
                InMemoryRepository::new("customer user")
                    .with_unique("login id", |u: &CustomerUser| Some(u.login_id.clone())),
            ),
            customer_deposits: Arc::new(InMemoryRepository::new("customer deposit")),
            customer_adjustments: Arc::new(InMemoryRepository::new("customer adjustment")),
            delivery_holidays: Arc::new(
                InMemoryRepository::new("delivery holiday").with_unique_within(
                    "date",
                    |h: &DeliveryHoliday| match h.warehouse_id {
                        Some(warehouse_id) => format!("{}/{}", h.tenant_id, warehouse_id),
                        None => h.tenant_id.to_string(),
                    },
                    |h: &DeliveryHoliday| Some(h.holiday_date.to_string()),
                ),
            ),
            virtual_accounts: Arc::new(InMemoryRepository::new("virtual account").with_unique(
                "account",
                |a: &VirtualAccount| Some(format!("{} {}", a.bank_code, a.account_number)),
            )),

            items_by_brand: Arc::new(ExternalDependents::new("item")),
            items_by_category: Arc::new(ExternalDependents::new("item")),
            inventory_by_warehouse: Arc::new(ExternalDependents::new("inventory")),
            deliveries_by_vehicle: Arc::new(ExternalDependents::new("delivery")),
        }
    }

    /// 组装批处理服务使用的端口
    pub fn ports(&self) -> MasterDataPorts {
        let warehouses_in_center = ScanDependents::new(
            "warehouse",
            self.warehouses.clone(),
            |w: &Warehouse, id: &DistributionCenterId| w.distribution_center_id == Some(*id),
        )
        .labelled(|w| w.name.clone());

        let vehicles_in_warehouse = ScanDependents::new(
            "vehicle",
            self.vehicles.clone(),
            |v: &Vehicle, id: &WarehouseId| v.warehouse_id == *id,
        )
        .labelled(|v| v.vehicle_no.clone());
        let holidays_in_warehouse = ScanDependents::new(
            "delivery holiday",
            self.delivery_holidays.clone(),
            |h: &DeliveryHoliday, id: &WarehouseId| h.warehouse_id == Some(*id),
        )
        .labelled(|h| h.holiday_date.to_string());
        let warehouse_dependents: Vec<Arc<dyn DependentLookup<WarehouseId>>> = vec![
            Arc::new(vehicles_in_warehouse),
            Arc::new(holidays_in_warehouse),
            self.inventory_by_warehouse.clone(),
        ];

        let users_with_role = ScanDependents::new(
            "customer user",
            self.customer_users.clone(),
            |u: &CustomerUser, id: &RoleId| u.role_id == Some(*id),
        )
        .labelled(|u| u.login_id.clone());

        let child_categories = ScanDependents::new(
            "item category",
            self.item_categories.clone(),
            |c: &ItemCategory, id: &ItemCategoryId| c.parent_id == Some(*id),
        )
        .labelled(|c| c.name.clone());
        let category_dependents: Vec<Arc<dyn DependentLookup<ItemCategoryId>>> = vec![
            Arc::new(child_categories),
            self.items_by_category.clone(),
        ];

        MasterDataPorts {
            brands: self.brands.clone(),
            brand_dependents: self.items_by_brand.clone(),
            distribution_centers: self.distribution_centers.clone(),
            distribution_center_dependents: Arc::new(warehouses_in_center),
            warehouses: self.warehouses.clone(),
            warehouse_dependents: Arc::new(CompositeDependents::new(warehouse_dependents)),
            vehicles: self.vehicles.clone(),
            vehicle_dependents: self.deliveries_by_vehicle.clone(),
            roles: self.roles.clone(),
            role_dependents: Arc::new(users_with_role),
            item_categories: self.item_categories.clone(),
            item_category_dependents: Arc::new(CompositeDependents::new(category_dependents)),
            customer_users: self.customer_users.clone(),
            customer_deposits: self.customer_deposits.clone(),
            customer_adjustments: self.customer_adjustments.clone(),
            delivery_holidays: self.delivery_holidays.clone(),
            virtual_accounts: self.virtual_accounts.clone(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
