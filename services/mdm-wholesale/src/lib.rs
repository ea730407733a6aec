//! mdm-wholesale - 批发流通主数据服务
//!
//! 品牌、仓库、车辆、客户账号等主数据的批量维护，以及公共休息日采集任务

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod scheduler;
