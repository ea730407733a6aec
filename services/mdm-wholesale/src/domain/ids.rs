//! 强类型 ID 定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// 定义基于 UUID v7 的 ID 类型
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
        #[display("{_0}")]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(
    /// 品牌 ID
    BrandId
);
define_id!(
    /// 物流中心 ID
    DistributionCenterId
);
define_id!(
    /// 仓库 ID
    WarehouseId
);
define_id!(
    /// 车辆 ID
    VehicleId
);
define_id!(
    /// 角色 ID
    RoleId
);
define_id!(
    /// 商品分类 ID
    ItemCategoryId
);
define_id!(
    /// 客户用户 ID
    CustomerUserId
);
define_id!(
    /// 客户入金 ID
    CustomerDepositId
);
define_id!(
    /// 客户余额调整 ID
    CustomerAdjustmentId
);
define_id!(
    /// 配送休息日 ID
    DeliveryHolidayId
);
define_id!(
    /// 虚拟账户 ID
    VirtualAccountId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_and_display() {
        let id = WarehouseId::new();
        let parsed: WarehouseId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(BrandId::new(), BrandId::new());
    }
}
