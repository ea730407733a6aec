//! 服务专属配置

use common::TenantId;
use config::ConfigError;
use serde::Deserialize;

use crate::domain::WarehouseId;
use crate::scheduler::PublicHoliday;

/// 公共休息日采集配置（`[collection]` 段）
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// 登记休息日的总部
    pub tenant_id: TenantId,
    /// 为空时对总部下所有仓库生效
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

impl CollectionConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(config::figment(config_dir).extract_inner("collection")?)
    }
}
